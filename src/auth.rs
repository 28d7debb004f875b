use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
}

/// Extracts the caller's subject from a bearer credential
///
/// Tokens are issued and validated by the identity provider in front of this
/// service. When a shared secret is configured the HS256 signature and expiry
/// are checked as well, otherwise the claims are only decoded.
#[derive(Clone)]
pub struct TokenClaims {
    key: DecodingKey,
    validation: Validation,
}

impl TokenClaims {
    /// Decode claims without checking the signature
    pub fn unverified() -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(&[]),
            validation,
        }
    }

    /// Verify HS256 signatures and expiry with a shared secret
    pub fn with_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation.required_spec_claims.insert("exp".to_string());

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Strip the `Bearer ` prefix from an `Authorization` header value
    pub fn raw_token(bearer: &str) -> Option<&str> {
        bearer
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Subject claim of a bearer credential, `None` if missing or invalid
    pub fn subject_of(&self, bearer: &str) -> Option<String> {
        let token = Self::raw_token(bearer)?;

        match decode::<Claims>(token, &self.key, &self.validation) {
            Ok(data) => data.claims.sub.filter(|sub| !sub.is_empty()),
            Err(e) => {
                tracing::debug!("Rejected bearer token: {}", e);
                None
            }
        }
    }
}

impl Default for TokenClaims {
    fn default() -> Self {
        Self::unverified()
    }
}

impl std::fmt::Debug for TokenClaims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClaims")
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}
