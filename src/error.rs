//! Error types used when reading persisted channel references.
//!
//! Bus operations themselves never fail: an invalid token or a handle that
//! does not point at a live channel is a silent no-op (see [`Bus`](crate::Bus)).
//! The only fallible surface is decoding a [`ChannelState`](crate::ChannelState)
//! record strictly, which reports a [`StateError`].
//!
//! [`StateError`] provides helper methods (`as_label`, `as_message`) for logging.

use thiserror::Error;

/// # Errors produced while decoding a persisted channel reference.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum StateError {
    /// The document is not a JSON object.
    #[error("channel state must be an object")]
    NotAnObject,

    /// A required field is absent.
    #[error("channel state is missing field `{field}`")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field is present but does not hold a string.
    #[error("channel state field `{field}` is not a string")]
    NotAString {
        /// Name of the offending field.
        field: &'static str,
    },

    /// The input text is not valid JSON.
    #[error("invalid channel state document: {0}")]
    Json(#[from] serde_json::Error),
}

impl StateError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use switchboard::StateError;
    ///
    /// let err = StateError::MissingField { field: "typeID" };
    /// assert_eq!(err.as_label(), "state_missing_field");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StateError::NotAnObject => "state_not_an_object",
            StateError::MissingField { .. } => "state_missing_field",
            StateError::NotAString { .. } => "state_not_a_string",
            StateError::Json(_) => "state_invalid_json",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StateError::NotAnObject => "expected an object".to_string(),
            StateError::MissingField { field } => format!("missing: {field}"),
            StateError::NotAString { field } => format!("not a string: {field}"),
            StateError::Json(e) => format!("json: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(StateError::NotAnObject.as_label(), "state_not_an_object");
        assert_eq!(
            StateError::NotAString { field: "nameID" }.as_label(),
            "state_not_a_string"
        );
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(StateError::from(json).as_label(), "state_invalid_json");
    }

    #[test]
    fn test_display_names_the_field() {
        let err = StateError::MissingField { field: "nameID" };
        assert_eq!(err.to_string(), "channel state is missing field `nameID`");
        assert_eq!(err.as_message(), "missing: nameID");
    }
}
