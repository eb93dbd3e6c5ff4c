//! # Simple bus activity logger.
//!
//! A minimal subscriber that logs bus notifications through `tracing` at `info`.
//! Use it for debugging or demos.
//!
//! ## Example output
//! ```text
//! INFO bus="viewer" [channel-list-changed]
//! INFO bus="viewer" type_id=color name_id=fg payload="app::Rgb" [channel-changed]
//! INFO bus="viewer" type_id=refresh payload="none" [signal]
//! ```

use std::rc::Rc;

use tracing::info;

use crate::core::Bus;
use crate::id::Id;
use crate::payload::Payload;
use crate::subscribers::Subscription;

fn payload_name(data: Option<&dyn Payload>) -> &'static str {
    data.map_or("none", |d| d.type_name())
}

/// Logs channel-list, channel-changed and selected signal notifications.
#[derive(Debug)]
pub struct ChannelLogger {
    label: Rc<str>,
    subscriptions: Vec<Subscription>,
}

impl ChannelLogger {
    /// Starts logging channel notifications of `bus`.
    #[must_use]
    pub fn attach(bus: &Bus) -> Self {
        let label: Rc<str> = Rc::from(bus.label());

        let l = Rc::clone(&label);
        let list = bus.register_channel_list_callback(move || {
            info!(bus = %l, "[channel-list-changed]");
        });

        let l = Rc::clone(&label);
        let changed = bus.register_channel_changed_callback(move |type_id, name_id, data| {
            info!(
                bus = %l,
                type_id = %type_id,
                name_id = %name_id,
                payload = payload_name(data),
                "[channel-changed]"
            );
        });

        Self {
            label,
            subscriptions: vec![list, changed],
        }
    }

    /// Also logs signals of `type_id`.
    pub fn watch_signal(&mut self, bus: &Bus, type_id: &Id) {
        let l = Rc::clone(&self.label);
        let sub = bus.register_signal_callback(type_id, move |type_id, data| {
            info!(bus = %l, type_id = %type_id, payload = payload_name(data), "[signal]");
        });
        self.subscriptions.push(sub);
    }

    /// Number of active registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Stops logging; returns how many registrations were removed from `bus`.
    pub fn detach(self, bus: &Bus) -> usize {
        self.subscriptions
            .iter()
            .filter(|sub| bus.unregister(sub))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::SubscriptionKind;

    #[test]
    fn test_attach_and_detach() {
        let bus = Bus::new();
        let mut logger = ChannelLogger::attach(&bus);
        let click = Id::new("click");
        logger.watch_signal(&bus, &click);
        assert_eq!(logger.len(), 3);
        assert_eq!(bus.subscriber_count(&SubscriptionKind::ChannelChanged), 1);

        let h = bus.handle(&Id::new("color"), &Id::new("fg"));
        bus.set(&h, 3u8);
        bus.send_signal(&click, None);

        assert_eq!(logger.detach(&bus), 3);
        assert_eq!(bus.subscriber_count(&SubscriptionKind::ChannelList), 0);
        assert_eq!(bus.subscriber_count(&SubscriptionKind::Signal(click)), 0);
    }

    #[test]
    fn test_payload_name() {
        assert_eq!(payload_name(None), "none");
        let v: Box<dyn Payload> = Box::new(1i64);
        assert_eq!(payload_name(Some(&*v)), "i64");
    }
}
