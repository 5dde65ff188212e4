//! src/domain/validation.rs
use super::{AllowedDomains, SubscriberEmail};

pub const DEFAULT_MAX_SUGGESTION_DISTANCE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NoAtSign,
    NonAscii,
    Malformed,
    BadDomainSyntax,
    UnsupportedDomain,
    Typo,
}

impl RejectReason {
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::NoAtSign => "NO_AT_SIGN",
            RejectReason::NonAscii => "NON_ASCII",
            RejectReason::Malformed => "MALFORMED",
            RejectReason::BadDomainSyntax => "BAD_DOMAIN_SYNTAX",
            RejectReason::UnsupportedDomain => "UNSUPPORTED_DOMAIN",
            RejectReason::Typo => "TYPO",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            RejectReason::NoAtSign | RejectReason::Malformed => "Invalid email",
            RejectReason::NonAscii => "Invalid email: non-ASCII characters are not allowed",
            RejectReason::BadDomainSyntax => "Invalid email domain",
            RejectReason::UnsupportedDomain => "Unsupported email domain",
            RejectReason::Typo => "Invalid email domain. Possible typo detected",
        };
        write!(f, "{}", message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted(SubscriberEmail),
    Rejected(RejectReason),
    RejectedWithSuggestion {
        reason: RejectReason,
        suggestion: SubscriberEmail,
    },
}

/// Classifies candidate addresses against an allow-list of mail providers.
///
/// Checks run in a fixed order and the first failing one decides the outcome:
///
/// 1. trimmed input contains an `@`
/// 2. every character is ASCII
/// 3. local part and domain (split at the last `@`) are both non-empty
/// 4. the lower-cased domain has a dot, no leading/trailing dot and no `..`
/// 5. the domain is allowed, or else within `max_suggestion_distance` edits of
///    an allowed one, in which case a corrected address is suggested
///
/// Holds no mutable state; one instance serves every request.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    domains: AllowedDomains,
    max_suggestion_distance: usize,
}

impl EmailValidator {
    pub fn new(domains: AllowedDomains, max_suggestion_distance: usize) -> Self {
        Self {
            domains,
            max_suggestion_distance,
        }
    }

    pub fn allowed_domains(&self) -> &AllowedDomains {
        &self.domains
    }

    pub fn validate(&self, raw: &str) -> ValidationResult {
        let email = raw.trim();

        if email.is_empty() || !email.contains('@') {
            return ValidationResult::Rejected(RejectReason::NoAtSign);
        }

        if !email.is_ascii() {
            return ValidationResult::Rejected(RejectReason::NonAscii);
        }

        let (local_part, domain) = match email.rsplit_once('@') {
            Some((local_part, domain)) if !local_part.is_empty() && !domain.is_empty() => {
                (local_part, domain)
            }
            _ => return ValidationResult::Rejected(RejectReason::Malformed),
        };

        let domain = domain.to_lowercase();

        if !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || domain.contains("..")
        {
            return ValidationResult::Rejected(RejectReason::BadDomainSyntax);
        }

        if self.domains.contains(&domain) {
            return ValidationResult::Accepted(SubscriberEmail::from_parts(local_part, &domain));
        }

        match self.domains.closest(&domain) {
            Some((closest, distance)) if distance <= self.max_suggestion_distance => {
                ValidationResult::RejectedWithSuggestion {
                    reason: RejectReason::Typo,
                    suggestion: SubscriberEmail::from_parts(local_part, closest),
                }
            }
            _ => ValidationResult::Rejected(RejectReason::UnsupportedDomain),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new(AllowedDomains::default(), DEFAULT_MAX_SUGGESTION_DISTANCE)
    }
}
