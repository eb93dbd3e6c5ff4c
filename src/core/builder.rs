use crate::{
    core::{Bus, BusConfig},
    id::Id,
    payload::Payload,
};

type PendingList = Box<dyn Fn()>;
type PendingChanged = Box<dyn Fn(&Id, &Id, Option<&dyn Payload>)>;

/// Builder for constructing a [`Bus`] with callbacks already in place.
///
/// Callbacks added here are registered before any channel can exist, so they
/// observe every channel creation. They live as long as the bus.
pub struct BusBuilder {
    cfg: BusConfig,
    list_callbacks: Vec<PendingList>,
    changed_callbacks: Vec<PendingChanged>,
    channels: Vec<(Id, Id)>,
}

impl BusBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: BusConfig) -> Self {
        Self {
            cfg,
            list_callbacks: Vec::new(),
            changed_callbacks: Vec::new(),
            channels: Vec::new(),
        }
    }

    /// Adds a channel-list callback.
    pub fn with_channel_list_callback(mut self, callback: impl Fn() + 'static) -> Self {
        self.list_callbacks.push(Box::new(callback));
        self
    }

    /// Adds a channel-changed callback.
    pub fn with_channel_changed_callback(
        mut self,
        callback: impl Fn(&Id, &Id, Option<&dyn Payload>) + 'static,
    ) -> Self {
        self.changed_callbacks.push(Box::new(callback));
        self
    }

    /// Declares a channel to create when the bus is built.
    ///
    /// Invalid pairs are skipped, as with [`Bus::handle`].
    pub fn with_channel(mut self, type_id: Id, name_id: Id) -> Self {
        self.channels.push((type_id, name_id));
        self
    }

    /// Builds the bus.
    ///
    /// Order: callbacks are registered first, then the declared channels are
    /// created (so the channel-list callbacks see them).
    pub fn build(self) -> Bus {
        let bus = Bus::with_config(self.cfg);

        for callback in self.list_callbacks {
            // Lives for the bus lifetime.
            let _ = bus.register_channel_list_callback(callback);
        }
        for callback in self.changed_callbacks {
            // Lives for the bus lifetime.
            let _ = bus.register_channel_changed_callback(callback);
        }
        for (type_id, name_id) in &self.channels {
            bus.handle(type_id, name_id);
        }
        bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_builder_callbacks_see_declared_channels() {
        let created = Rc::new(Cell::new(0));
        let c = Rc::clone(&created);

        let bus = Bus::builder(BusConfig::default().with_label("built"))
            .with_channel_list_callback(move || c.set(c.get() + 1))
            .with_channel(Id::new("tool"), Id::new("active"))
            .with_channel(Id::new("tool"), Id::new("active"))
            .with_channel(Id::invalid(), Id::new("skipped"))
            .build();

        assert_eq!(bus.label(), "built");
        assert_eq!(bus.len(), 1);
        assert_eq!(created.get(), 1);
    }

    #[test]
    fn test_builder_changed_callback_is_registered() {
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);

        let bus = BusBuilder::new(BusConfig::default())
            .with_channel_changed_callback(move |_, _, _| h.set(h.get() + 1))
            .build();

        let tool = bus.handle(&Id::new("tool"), &Id::new("active"));
        bus.set(&tool, "brush");
        assert_eq!(hits.get(), 1);
    }
}
