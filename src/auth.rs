use crate::config::AppConfig;
use crate::error::MockError;
use http::header::{HeaderName, AUTHORIZATION};
use rustc_hash::FxHashSet;

const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Compact key index used in hot-path authentication.
pub enum AllowedClientKeys {
    /// No keys configured: every request is accepted.
    Open,
    Single(Box<str>),
    Multiple(FxHashSet<String>),
}

impl AllowedClientKeys {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, AllowedClientKeys::Open)
    }
}

/// Extract the client key: `x-api-key` first, then `Authorization: Bearer <key>`.
///
/// # Errors
///
/// Returns `MockError::Auth` when neither header carries a key.
pub fn extract_api_key(headers: &http::HeaderMap) -> Result<&str, MockError> {
    headers
        .get(X_API_KEY)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .ok_or_else(|| MockError::Auth("Missing API key".to_string()))
}

/// Authenticate an incoming request against the pre-indexed `allowed_keys`.
///
/// # Errors
///
/// Returns `MockError::Auth` when the API key is missing or invalid.
pub fn authenticate(
    headers: &http::HeaderMap,
    allowed_keys: &AllowedClientKeys,
) -> Result<(), MockError> {
    let accepted = match allowed_keys {
        AllowedClientKeys::Open => return Ok(()),
        AllowedClientKeys::Single(key) => extract_api_key(headers)? == key.as_ref(),
        AllowedClientKeys::Multiple(allowed_set) => {
            allowed_set.contains(extract_api_key(headers)?)
        }
    };
    if accepted {
        Ok(())
    } else {
        Err(MockError::Auth("Invalid API key".to_string()))
    }
}

/// Build a hash-set index for allowed client keys.
#[must_use]
pub fn build_allowed_key_set(config: &AppConfig) -> AllowedClientKeys {
    let mut allowed_set: FxHashSet<String> = config
        .client_authentication
        .allowed_keys
        .iter()
        .cloned()
        .collect();

    match allowed_set.len() {
        0 => AllowedClientKeys::Open,
        1 => match allowed_set.drain().next() {
            Some(single_key) => AllowedClientKeys::Single(single_key.into_boxed_str()),
            None => AllowedClientKeys::Open,
        },
        _ => AllowedClientKeys::Multiple(allowed_set),
    }
}
