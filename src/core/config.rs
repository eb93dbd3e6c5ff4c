//! # Bus configuration.
//!
//! Provides [`BusConfig`], the settings a [`Bus`](crate::Bus) is created with.
//!
//! ## Sentinel values
//! - `channel_capacity = 0` → the channel table allocates lazily

use std::borrow::Cow;

/// Settings for one bus instance.
///
/// ## Field semantics
/// - `label`: name recorded in every log event of this bus (tells buses apart)
/// - `channel_capacity`: channels to reserve room for up front (`0` = none)
/// - `log_dispatch`: emit a `trace!` event per dispatch with the fan-out count
///
/// All fields are public; start from [`BusConfig::default`] and override.
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Name recorded in log events.
    pub label: Cow<'static, str>,

    /// Initial capacity of the channel table.
    pub channel_capacity: usize,

    /// Trace every notification dispatch.
    ///
    /// Off by default: dispatch is the hot path of a busy UI.
    pub log_dispatch: bool,
}

impl BusConfig {
    /// Returns the channel capacity as an `Option`.
    ///
    /// - `None` → allocate lazily
    /// - `Some(n)` → reserve room for `n` channels
    #[inline]
    pub fn reserved_channels(&self) -> Option<usize> {
        if self.channel_capacity == 0 {
            None
        } else {
            Some(self.channel_capacity)
        }
    }

    /// Same configuration with a different label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }
}

impl Default for BusConfig {
    /// Default configuration:
    ///
    /// - `label = "bus"`
    /// - `channel_capacity = 0` (lazy)
    /// - `log_dispatch = false`
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("bus"),
            channel_capacity: 0,
            log_dispatch: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_means_lazy() {
        let cfg = BusConfig::default();
        assert_eq!(cfg.reserved_channels(), None);

        let cfg = BusConfig {
            channel_capacity: 64,
            ..BusConfig::default()
        };
        assert_eq!(cfg.reserved_channels(), Some(64));
    }

    #[test]
    fn test_with_label() {
        let cfg = BusConfig::default().with_label(String::from("viewer"));
        assert_eq!(cfg.label, "viewer");
        assert!(!cfg.log_dispatch);
    }
}
