//! Pure validation of shorten-URL jobs.

use thiserror::Error;
use url::Url;

use crate::domain::entities::ShortenJob;

/// Minimum plausible length for an original URL.
const MIN_URL_LENGTH: usize = 10;

/// Why a job was permanently rejected.
///
/// Both variants describe business rejections that can never succeed on
/// retry; the consumer acknowledges and drops such messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    #[error("malformed job: {0}")]
    MalformedJob(String),
    #[error("blocked domain: {0}")]
    BlockedDomain(String),
}

/// Validation settings supplied from configuration.
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    blocked_domains: Vec<String>,
}

impl ValidationPolicy {
    pub fn new(blocked_domains: Vec<String>) -> Self {
        Self { blocked_domains }
    }

    /// Returns the first deny-list entry contained in `url`, if any.
    fn blocked_domain_in(&self, url: &str) -> Option<&str> {
        self.blocked_domains
            .iter()
            .map(String::as_str)
            .find(|domain| url.contains(domain))
    }
}

/// Checks a job for well-formedness and URL acceptability.
///
/// Deterministic and free of side effects; the job itself is returned
/// unchanged to the caller on success.
///
/// # Rules
///
/// - Every field must be present and non-empty
/// - `original_url` must be at least 10 characters
/// - `original_url` must parse as an `http` or `https` URL
/// - `original_url` must not contain a deny-listed domain substring
///
/// # Errors
///
/// Returns [`RejectionReason::MalformedJob`] or
/// [`RejectionReason::BlockedDomain`]; both are permanent.
pub fn validate(job: &ShortenJob, policy: &ValidationPolicy) -> Result<(), RejectionReason> {
    let required = [
        ("request_id", &job.request_id),
        ("short_code", &job.short_code),
        ("original_url", &job.original_url),
        ("short_url", &job.short_url),
    ];

    for (name, value) in required {
        if value.is_empty() {
            return Err(RejectionReason::MalformedJob(format!(
                "missing or empty field: {name}"
            )));
        }
    }

    if job.created_at.is_none() {
        return Err(RejectionReason::MalformedJob(
            "missing or empty field: created_at".to_string(),
        ));
    }

    if job.original_url.len() < MIN_URL_LENGTH {
        return Err(RejectionReason::MalformedJob(format!(
            "original_url is too short ({} chars, minimum {})",
            job.original_url.len(),
            MIN_URL_LENGTH
        )));
    }

    let url = Url::parse(&job.original_url).map_err(|e| {
        RejectionReason::MalformedJob(format!("original_url is not a valid URL: {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(RejectionReason::MalformedJob(format!(
                "unsupported URL scheme: {other}"
            )));
        }
    }

    if let Some(domain) = policy.blocked_domain_in(&job.original_url) {
        return Err(RejectionReason::BlockedDomain(domain.to_string()));
    }

    Ok(())
}
