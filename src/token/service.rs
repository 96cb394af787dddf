use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::core::error::{ConfigError, Error};
use crate::token::{Claims, Purpose};

#[derive(Serialize, Deserialize)]
struct Envelope {
    #[serde(flatten)]
    claims: Claims,
    iat: i64,
    exp: i64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct VerifiedToken {
    pub(crate) claims: Claims,
    pub(crate) expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub(crate) struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").finish_non_exhaustive()
    }
}

impl TokenService {
    pub(crate) fn new(secret: &str) -> Result<Self, ConfigError> {
        if secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is compared against the caller's clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub(crate) fn issue(&self, claims: &Claims, ttl: Duration) -> Result<String, Error> {
        self.issue_at(claims, ttl, Utc::now())
    }

    /// Signs `claims` with an expiry of `now + ttl`, at one-second resolution.
    pub(crate) fn issue_at(
        &self,
        claims: &Claims,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let iat = now.timestamp();
        let exp = iat + ttl.num_seconds().max(1);

        let envelope = Envelope {
            claims: claims.clone(),
            iat,
            exp,
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &envelope,
            &self.encoding_key,
        )?)
    }

    pub(crate) fn verify(&self, token: &str) -> Option<VerifiedToken> {
        self.verify_at(token, Utc::now())
    }

    /// Returns the claims if the signature is ours and `now` is strictly before expiry.
    /// Every other outcome (malformed, tampered, foreign key, expired) is `None`.
    pub(crate) fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Option<VerifiedToken> {
        let data = match jsonwebtoken::decode::<Envelope>(token, &self.decoding_key, &self.validation)
        {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("token rejected: {}", e);
                return None;
            }
        };

        if now.timestamp() >= data.claims.exp {
            tracing::debug!("token rejected: expired");
            return None;
        }

        Some(VerifiedToken {
            claims: data.claims.claims,
            expires_at: DateTime::from_timestamp(data.claims.exp, 0)?,
        })
    }

    /// [`verify`](Self::verify), additionally requiring `purpose`.
    pub(crate) fn verify_for(&self, token: &str, purpose: Purpose) -> Option<VerifiedToken> {
        let verified = self.verify(token)?;

        if verified.claims.purpose != purpose {
            tracing::debug!(
                expected = ?purpose,
                actual = ?verified.claims.purpose,
                "token rejected: wrong purpose"
            );
            return None;
        }

        Some(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    fn service() -> TokenService {
        TokenService::new("test-secret").unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(seconds, 0).unwrap()
    }

    fn session_claims(id: i32) -> Claims {
        Claims {
            id,
            email: Some(format!("user{id}@x.com")),
            role: Some(Role::User),
            purpose: Purpose::Session,
            jti: None,
        }
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        assert!(matches!(TokenService::new(""), Err(ConfigError::MissingSecret)));
        assert!(matches!(TokenService::new("   "), Err(ConfigError::MissingSecret)));
    }

    #[test]
    fn claims_survive_a_round_trip_before_expiry() {
        let service = service();
        let issued_at = at(1_700_000_000);
        let cases = [
            (session_claims(1), Duration::seconds(1)),
            (session_claims(2), Duration::hours(12)),
            (
                Claims {
                    id: 9,
                    email: None,
                    role: None,
                    purpose: Purpose::PasswordReset,
                    jti: Some("abc".into()),
                },
                Duration::hours(1),
            ),
        ];

        for (claims, ttl) in cases {
            let token = service.issue_at(&claims, ttl, issued_at).unwrap();
            let last_valid = issued_at + ttl - Duration::seconds(1);

            let verified = service.verify_at(&token, last_valid).expect("still valid");

            assert_eq!(verified.claims, claims);
            assert_eq!(verified.expires_at, issued_at + ttl);
        }
    }

    #[test]
    fn tokens_are_rejected_at_and_after_expiry() {
        let service = service();
        let issued_at = at(1_700_000_000);
        let token = service
            .issue_at(&session_claims(1), Duration::hours(12), issued_at)
            .unwrap();

        assert!(service.verify_at(&token, issued_at).is_some());
        assert!(service
            .verify_at(&token, issued_at + Duration::hours(12))
            .is_none());
        assert!(service
            .verify_at(&token, issued_at + Duration::days(3))
            .is_none());
    }

    #[test]
    fn foreign_signatures_are_rejected() {
        let other = TokenService::new("another-secret").unwrap();
        let token = other.issue(&session_claims(1), Duration::hours(1)).unwrap();

        assert!(service().verify(&token).is_none());
    }

    #[test]
    fn altered_payloads_are_rejected() {
        let service = service();
        let mine = service.issue(&session_claims(1), Duration::hours(1)).unwrap();
        let theirs = service.issue(&session_claims(2), Duration::hours(1)).unwrap();

        let mine: Vec<&str> = mine.split('.').collect();
        let theirs: Vec<&str> = theirs.split('.').collect();
        let forged = format!("{}.{}.{}", mine[0], theirs[1], mine[2]);

        assert!(service.verify(&forged).is_none());
    }

    #[test]
    fn garbage_is_rejected_without_panicking() {
        let service = service();

        for token in ["", "abc", "a.b.c", "Bearer x.y.z", "...."] {
            assert!(service.verify(token).is_none(), "accepted {token:?}");
        }
    }

    #[test]
    fn purpose_is_enforced() {
        let service = service();
        let mut claims = session_claims(1);
        claims.purpose = Purpose::PasswordReset;
        let token = service.issue(&claims, Duration::hours(1)).unwrap();

        assert!(service.verify_for(&token, Purpose::Session).is_none());
        assert!(service.verify_for(&token, Purpose::PasswordReset).is_some());
    }
}
