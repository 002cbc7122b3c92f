//! Model identity tokens used to key per-model configuration

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Identifies a model (or any unit of code bound to one database) for
/// configuration lookup
///
/// Keys are compared by name. [`ModelKey::of`] derives the name from a Rust
/// type so overrides can be keyed by type without string literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelKey(Cow<'static, str>);

impl ModelKey {
    const BASE: &'static str = "base";

    /// Key resolving to the default configuration
    pub const fn base() -> Self {
        Self(Cow::Borrowed(Self::BASE))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Key named after type `T`
    pub fn of<T: ?Sized>() -> Self {
        Self(Cow::Borrowed(std::any::type_name::<T>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_base(&self) -> bool {
        self.0 == Self::BASE
    }
}

impl Default for ModelKey {
    fn default() -> Self {
        Self::base()
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ModelKey {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModelKey {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
