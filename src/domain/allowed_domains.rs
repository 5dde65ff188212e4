//! src/domain/allowed_domains.rs
use super::levenshtein;
use std::collections::BTreeSet;

const DEFAULT_DOMAINS: [&str; 19] = [
    "gmail.com",
    "yahoo.com",
    "yahoo.co.uk",
    "outlook.com",
    "hotmail.com",
    "live.com",
    "msn.com",
    "icloud.com",
    "me.com",
    "gmx.com",
    "proton.me",
    "protonmail.com",
    "yandex.ru",
    "ya.ru",
    "mail.ru",
    "bk.ru",
    "inbox.ru",
    "list.ru",
    "rambler.ru",
];

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("The allow-list of email domains must not be empty")]
    Empty,
}

/// Immutable set of lower-case mail-provider domains that subscriptions may use.
///
/// Domains are kept sorted, so lookups that scan the set (see [`closest`])
/// visit them in lexicographic order.
///
/// [`closest`]: AllowedDomains::closest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedDomains(BTreeSet<String>);

impl AllowedDomains {
    pub fn new<I, S>(domains: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains: BTreeSet<String> = domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        if domains.is_empty() {
            return Err(Error::Empty);
        }

        Ok(Self(domains))
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.0.contains(domain)
    }

    /// The allowed domain nearest to `domain` by edit distance, with that distance.
    ///
    /// Ties go to the lexicographically smallest domain.
    pub fn closest(&self, domain: &str) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;

        for candidate in &self.0 {
            let d = levenshtein::distance(domain, candidate);
            match best {
                Some((_, best_distance)) if best_distance <= d => {}
                _ => best = Some((candidate.as_str(), d)),
            }
        }

        best
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for AllowedDomains {
    fn default() -> Self {
        Self(DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect())
    }
}
