//! Bearer-token decoding and claim checks.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::config::{AuthConfig, TokenAlgorithm};
use crate::error::{AuthError, Result};

/// Claims carried by an externally issued access token.
///
/// Only the claims this service checks or logs are modeled; anything else
/// in the token is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the authenticated caller.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    /// Issuer, checked when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Audience, checked when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Space-separated OAuth scopes, if the provider sends them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

/// Validates bearer tokens against the configured provider parameters.
#[derive(Debug)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// Builds a verifier from the auth configuration.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Configuration` when the configured key material
    /// is missing or unparseable.
    pub fn from_config(config: &AuthConfig) -> Result<Self> {
        let (key, algorithm) = match config.algorithm {
            TokenAlgorithm::Hs256 => {
                let secret = config
                    .hmac_secret
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| AuthError::configuration("hmac_secret is not set"))?;
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            TokenAlgorithm::Rs256 => {
                let pem = config
                    .rsa_public_key_pem
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| AuthError::configuration("rsa_public_key_pem is not set"))?;
                let key = DecodingKey::from_rsa_pem(pem.as_bytes())
                    .map_err(|e| AuthError::configuration(format!("invalid RSA PEM: {e}")))?;
                (key, Algorithm::RS256)
            }
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway_secs;
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self { key, validation })
    }

    /// Decodes and validates a token, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::invalid_token(e.to_string()),
            }
        })?;
        Ok(data.claims)
    }
}
