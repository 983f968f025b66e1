//! Mapping of provider failures onto [`ErrorKind`].
//!
//! The kinds are what callers depend on. How a given provider phrases its
//! failures is glue and lives behind [`ErrorClassifier`] so it can be swapped
//! per provider.

use std::sync::LazyLock;

use regex::Regex;

use crate::ErrorKind;

static API_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)api\s?key").expect("static regex"));
static QUOTA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)quota|resource_exhausted|rate.?limit").expect("static regex"));
static NOT_FOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)not\s?found").expect("static regex"));

pub trait ErrorClassifier: Send + Sync {
    /// `status` is the HTTP status when the failure came with one
    fn classify(&self, status: Option<u16>, message: &str) -> ErrorKind;
}

/// Pattern matching on Gemini style status codes and messages
#[derive(Debug, Default, Clone, Copy)]
pub struct ProviderMessageClassifier;

impl ErrorClassifier for ProviderMessageClassifier {
    fn classify(&self, status: Option<u16>, message: &str) -> ErrorKind {
        // Gemini answers a bad key with 400 INVALID_ARGUMENT, so the message wins over the code
        if API_KEY.is_match(message) || matches!(status, Some(401 | 403)) {
            return ErrorKind::Auth;
        }

        if status == Some(429) || QUOTA.is_match(message) {
            return ErrorKind::QuotaExceeded;
        }

        if status == Some(404) || NOT_FOUND.is_match(message) {
            return ErrorKind::ModelUnavailable;
        }

        ErrorKind::Unknown
    }
}
