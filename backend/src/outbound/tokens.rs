//! HS256 JWT adapter for the [`AccessTokens`] port.
//!
//! Expiry is checked against the caller-supplied `now` instead of the system
//! clock so services stay deterministic under a fixture clock.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::domain::TenantId;
use crate::domain::ports::{AccessClaims, AccessTokenError, AccessTokens};

const EPHEMERAL_SECRET_BYTES: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies tenant access tokens with a shared secret.
pub struct JwtAccessTokens {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtAccessTokens {
    /// Build an adapter from a shared secret.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Build an adapter with a random secret. Tokens do not survive a restart.
    pub fn ephemeral() -> Self {
        let mut secret = [0_u8; EPHEMERAL_SECRET_BYTES];
        rand::thread_rng().fill_bytes(&mut secret);
        Self::new(&secret)
    }
}

impl AccessTokens for JwtAccessTokens {
    fn issue(
        &self,
        tenant_id: &TenantId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AccessTokenError> {
        let claims = TokenClaims {
            sub: tenant_id.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|error| AccessTokenError::signing(error.to_string()))
    }

    fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, AccessTokenError> {
        let claims = decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|error| AccessTokenError::invalid(error.to_string()))?
            .claims;
        if claims.exp <= now.timestamp() {
            return Err(AccessTokenError::expired(format!(
                "expired at {}",
                claims.exp
            )));
        }
        let tenant_id = TenantId::new(claims.sub)
            .map_err(|error| AccessTokenError::invalid(error.to_string()))?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AccessTokenError::invalid("exp is out of range"))?;
        Ok(AccessClaims {
            tenant_id,
            expires_at,
        })
    }
}
