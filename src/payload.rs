//! # Message payloads.
//!
//! [`Payload`] is the capability shared by every channel value and every signal
//! argument. It has no required members: any `'static` type is a payload.
//!
//! ## Ownership
//! - Payloads travel as `Box<dyn Payload>` and are **moved** into the bus.
//! - A channel keeps its payload until the next set replaces it or the bus is dropped.
//! - A signal payload is dropped right after the last subscriber returns.
//! - Subscribers only ever see `Option<&dyn Payload>` (read access, no ownership).
//!
//! ## Example
//! ```rust
//! use switchboard::Payload;
//!
//! #[derive(Debug, PartialEq)]
//! struct Selection(Vec<u32>);
//!
//! let boxed: Box<dyn Payload> = Box::new(Selection(vec![1, 2]));
//! assert!(boxed.is::<Selection>());
//! assert_eq!(boxed.downcast_ref::<Selection>(), Some(&Selection(vec![1, 2])));
//! assert!(boxed.downcast_ref::<String>().is_none());
//! ```

use std::any::Any;

/// Data carried by a channel or a signal.
///
/// Implemented for every `'static` type; do not implement it manually.
/// Note that a `Box<dyn Payload>` is itself `'static`, so boxing it again
/// produces a payload whose concrete type is the box.
pub trait Payload: Any + 'static {
    #[doc(hidden)]
    fn as_any(&self) -> &dyn Any;

    #[doc(hidden)]
    fn payload_type_name(&self) -> &'static str;
}

impl<T: Any> Payload for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn payload_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl dyn Payload {
    /// True if the concrete payload type is `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        Payload::as_any(self).is::<T>()
    }

    /// Borrows the payload as `T` if that is its concrete type.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        Payload::as_any(self).downcast_ref::<T>()
    }

    /// Rust type name of the concrete payload (for logs).
    #[inline]
    pub fn type_name(&self) -> &'static str {
        Payload::payload_type_name(self)
    }
}

impl std::fmt::Debug for dyn Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Payload<{}>", self.type_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Brightness(f32);

    #[test]
    fn test_downcast_to_concrete_type() {
        let p: Box<dyn Payload> = Box::new(Brightness(0.5));
        let b = p.downcast_ref::<Brightness>().map(|b| b.0);
        assert_eq!(b, Some(0.5));
        assert!(!p.is::<u32>());
    }

    #[test]
    fn test_type_name_is_concrete() {
        let p: Box<dyn Payload> = Box::new(7u32);
        assert_eq!(p.type_name(), "u32");
        assert_eq!(format!("{:?}", &*p), "Payload<u32>");
    }

    #[test]
    fn test_double_box_is_a_different_payload() {
        let inner: Box<dyn Payload> = Box::new(1u8);
        let outer: Box<dyn Payload> = Box::new(inner);
        assert!(!outer.is::<u8>());
        assert!(outer.is::<Box<dyn Payload>>());
    }
}
