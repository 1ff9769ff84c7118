//! HS256 session-token validation.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use spmi_auth::{JwtValidator, SessionClaims, TokenValidationError, validate_claims};

/// Verifies HS256-signed tokens carrying [`SessionClaims`].
pub struct Hs256JwtValidator {
    key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The time window lives in `issued_at`/`expires_at` and is checked by
        // `validate_claims`, not by the registered `exp` claim.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            key: DecodingKey::from_secret(secret.as_ref()),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.key, &self.validation)
            .map_err(|e| TokenValidationError::Malformed(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};
    use spmi_core::{SessionId, UserId};

    use super::*;

    fn mint(secret: &str, claims: &SessionClaims) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn claims(ttl_minutes: i64) -> SessionClaims {
        let now = Utc::now();
        SessionClaims {
            sub: UserId::new(),
            sid: SessionId::new(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    #[test]
    fn valid_token_round_trips() {
        let claims = claims(10);
        let validator = Hs256JwtValidator::new("secret");
        let decoded = validator.validate(&mint("secret", &claims), Utc::now()).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn wrong_secret_is_malformed() {
        let validator = Hs256JwtValidator::new("secret");
        let err = validator.validate(&mint("other", &claims(10)), Utc::now()).unwrap_err();
        assert!(matches!(err, TokenValidationError::Malformed(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let validator = Hs256JwtValidator::new("secret");
        let err = validator
            .validate(&mint("secret", &claims(10)), Utc::now() + Duration::hours(1))
            .unwrap_err();
        assert_eq!(err, TokenValidationError::Expired);
    }
}
