//! src/domain/mod.rs
mod allowed_domains;
pub use allowed_domains::{AllowedDomains, Error as AllowedDomainsError};

pub mod levenshtein;

mod subscriber_email;
pub use subscriber_email::SubscriberEmail;

mod validation;
pub use validation::*;
