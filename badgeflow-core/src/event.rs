//! Named store events

use std::borrow::Cow;
use std::fmt;

/// Name of an event emitted by a store after it changed.
///
/// Event names are the contract between stores and views. Scoped names such as
/// `DATA_UPDATED_earner_badges` are built with [`EventName::scoped`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventName(Cow<'static, str>);

impl EventName {
    /// Create an event name from a static string.
    pub const fn new(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// `{prefix}_{scope}`, e.g. `FORM_DATA_UPDATED` + `badge-create`.
    pub fn scoped(prefix: &str, scope: &str) -> Self {
        Self(Cow::Owned(format!("{}_{}", prefix, scope)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for EventName {
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl From<String> for EventName {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl AsRef<str> for EventName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for EventName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EventName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_name() {
        let name = EventName::scoped("DATA_UPDATED", "earner_badges");
        assert_eq!(name, "DATA_UPDATED_earner_badges");
        assert_eq!(name.to_string(), "DATA_UPDATED_earner_badges");
    }

    #[test]
    fn test_static_and_owned_compare_equal() {
        assert_eq!(
            EventName::new("ROUTE_CHANGED"),
            EventName::from(String::from("ROUTE_CHANGED"))
        );
    }
}
