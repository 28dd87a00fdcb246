//! API credentials read from the environment.

use almanac_error::ConfigError;
use std::fmt;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable holding the optional organization id.
pub const ORGANIZATION_VAR: &str = "OPENAI_ORG_ID";

/// Credentials for the generation service.
///
/// The key never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ServiceCredentials {
    api_key: String,
    organization: Option<String>,
}

impl ServiceCredentials {
    /// Creates credentials from explicit values.
    pub fn new(api_key: impl Into<String>, organization: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            organization,
        }
    }

    /// Reads `OPENAI_API_KEY` and the optional `OPENAI_ORG_ID`.
    ///
    /// Callers load `.env` before this if they want it honoured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the key is unset or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::new(format!("{} is not set", API_KEY_VAR)))?;
        let organization = lookup(ORGANIZATION_VAR)
            .map(|org| org.trim().to_string())
            .filter(|org| !org.is_empty());
        Ok(Self::new(api_key, organization))
    }

    /// The API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Organization id sent with each request, if any.
    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }
}

impl fmt::Debug for ServiceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentials")
            .field("api_key", &"<redacted>")
            .field("organization", &self.organization)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_key() {
        let credentials = ServiceCredentials::new("sk-secret", Some("org-1".to_string()));
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("org-1"));
    }

    #[test]
    fn test_lookup_requires_key() {
        let err = ServiceCredentials::from_lookup(|_| None).unwrap_err();
        assert!(err.message.contains(API_KEY_VAR));

        let blank = ServiceCredentials::from_lookup(|name| {
            (name == API_KEY_VAR).then(|| "   ".to_string())
        });
        assert!(blank.is_err());
    }

    #[test]
    fn test_lookup_reads_organization() {
        let credentials = ServiceCredentials::from_lookup(|name| match name {
            API_KEY_VAR => Some("sk-1".to_string()),
            ORGANIZATION_VAR => Some(" org-9 ".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(credentials.api_key(), "sk-1");
        assert_eq!(credentials.organization(), Some("org-9"));
    }
}
