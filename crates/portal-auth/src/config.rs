//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Signature algorithm accepted for bearer tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenAlgorithm {
    /// HMAC with SHA-256 over a shared secret.
    #[default]
    Hs256,
    /// RSA signature verified against a public key PEM.
    Rs256,
}

/// Configuration for the identity-provider boundary.
///
/// Tokens are issued elsewhere; this only describes how to validate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether bearer-token validation is enforced on the API routes.
    #[serde(default)]
    pub enabled: bool,

    /// Expected `iss` claim.
    #[serde(default)]
    pub issuer: Option<String>,

    /// Expected `aud` claim.
    #[serde(default)]
    pub audience: Option<String>,

    /// Signature algorithm the provider uses.
    #[serde(default)]
    pub algorithm: TokenAlgorithm,

    /// Shared secret for HS256 validation.
    #[serde(default)]
    pub hmac_secret: Option<String>,

    /// Public key PEM for RS256 validation.
    #[serde(default)]
    pub rsa_public_key_pem: Option<String>,

    /// Allowed clock skew when checking expiry, in seconds.
    #[serde(default = "default_leeway_secs")]
    pub leeway_secs: u64,
}

fn default_leeway_secs() -> u64 {
    30
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            issuer: None,
            audience: None,
            algorithm: TokenAlgorithm::default(),
            hmac_secret: None,
            rsa_public_key_pem: None,
            leeway_secs: default_leeway_secs(),
        }
    }
}

impl AuthConfig {
    /// Checks the configuration is complete enough to validate tokens.
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        match self.algorithm {
            TokenAlgorithm::Hs256 => {
                if self.hmac_secret.as_deref().unwrap_or("").is_empty() {
                    return Err("auth.hmac_secret is required for HS256".into());
                }
            }
            TokenAlgorithm::Rs256 => {
                if self.rsa_public_key_pem.as_deref().unwrap_or("").is_empty() {
                    return Err("auth.rsa_public_key_pem is required for RS256".into());
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_config_is_valid() {
        assert!(AuthConfig::default().validate().is_ok());
    }

    #[test]
    fn test_enabled_hs256_requires_secret() {
        let config = AuthConfig {
            enabled: true,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AuthConfig {
            enabled: true,
            hmac_secret: Some("shared-secret".into()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enabled_rs256_requires_pem() {
        let config = AuthConfig {
            enabled: true,
            algorithm: TokenAlgorithm::Rs256,
            hmac_secret: Some("ignored".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_algorithm_wire_labels() {
        let config: AuthConfig =
            serde_json::from_str(r#"{"enabled":false,"algorithm":"RS256"}"#).unwrap();
        assert_eq!(config.algorithm, TokenAlgorithm::Rs256);
    }
}
