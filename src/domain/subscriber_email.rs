//! src/domain/subscriber_email.rs
use serde::Serialize;

/// An address that passed validation: local part untouched, domain lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub(crate) fn from_parts(local_part: &str, domain: &str) -> Self {
        Self(format!("{}@{}", local_part, domain))
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
