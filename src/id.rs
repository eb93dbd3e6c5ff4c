//! # Interned identifier tokens.
//!
//! [`Id`] names both axes of a channel: the `typeID` (what kind of data the
//! channel carries) and the `nameID` (which instance of that kind).
//!
//! ## Rules
//! - Every distinct string is interned once per process; equal strings share storage.
//! - Equality and hashing are O(1): they compare the interned pointer.
//! - The empty string is the **invalid** token, same as [`Id::default`].
//!
//! ## Example
//! ```rust
//! use switchboard::Id;
//!
//! let a = Id::new("color");
//! let b = Id::from(String::from("color"));
//! assert_eq!(a, b);
//! assert!(a.is_valid());
//! assert!(!Id::new("").is_valid());
//! assert_eq!(a.to_string(), "color");
//! ```

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use serde::{Deserialize, Serialize};

/// Process-wide intern table.
static INTERNER: OnceLock<Mutex<HashSet<Arc<str>>>> = OnceLock::new();

fn interner() -> &'static Mutex<HashSet<Arc<str>>> {
    INTERNER.get_or_init(|| Mutex::new(HashSet::new()))
}

/// Interned, cheaply comparable name token.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Id(Option<Arc<str>>);

impl Id {
    /// Interns `name` and returns its token.
    ///
    /// An empty `name` yields the invalid token.
    pub fn new(name: &str) -> Self {
        if name.is_empty() {
            return Self(None);
        }

        // The table only ever grows, a poisoned lock still holds consistent data.
        let mut table = interner().lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = table.get(name) {
            return Self(Some(Arc::clone(existing)));
        }

        let interned: Arc<str> = Arc::from(name);
        table.insert(Arc::clone(&interned));
        Self(Some(interned))
    }

    /// The invalid token.
    #[inline]
    pub const fn invalid() -> Self {
        Self(None)
    }

    /// True unless this is the invalid token.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// String projection; `""` for the invalid token.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or("")
    }
}

impl PartialEq for Id {
    fn eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for Id {}

impl Hash for Id {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let addr = self.0.as_ref().map_or(0, |s| Arc::as_ptr(s) as *const u8 as usize);
        addr.hash(state);
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(s) => write!(f, "Id({s:?})"),
            None => f.write_str("Id(<invalid>)"),
        }
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl From<Id> for String {
    fn from(id: Id) -> Self {
        id.as_str().to_owned()
    }
}
