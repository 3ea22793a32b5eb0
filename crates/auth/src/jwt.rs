use std::time::Duration;

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use posters_kernel::settings::AuthSettings;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{parse_duration, AuthError};

/// Claims carried by bearer tokens. Only the timing claims are interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
}

/// Shortest accepted HMAC secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

/// Validated JWT settings.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
    expiration: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration: Duration) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(AuthError::Config("auth.secret must not be blank".to_string()));
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AuthError::Config(format!(
                "auth.secret must be at least {MIN_SECRET_BYTES} bytes, got {}",
                secret.len()
            )));
        }
        Ok(Self { secret, expiration })
    }

    /// Builds the configuration from settings; secret and expiration are both required.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthError> {
        let secret = settings
            .secret
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AuthError::Config("auth.secret is required".to_string()))?;

        let expiration = settings
            .expiration
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AuthError::Config("auth.expiration is required".to_string()))?;

        Self::new(secret, parse_duration(expiration)?)
    }

    pub fn expiration(&self) -> Duration {
        self.expiration
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// Verifies HMAC-signed bearer tokens.
///
/// Present `exp` and `nbf` claims are enforced without leeway. Tokens without
/// `exp` fall back to `iat` plus the configured expiration and are rejected
/// when neither claim is present.
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
    fallback_expiration: Duration,
}

impl JwtVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            fallback_expiration: config.expiration,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, OffsetDateTime::now_utc().unix_timestamp())
    }

    /// Verifies `token`, evaluating the `iat` fallback against `now` (unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::ImmatureSignature => AuthError::NotYetValid,
                _ => {
                    tracing::debug!(target: "posters-auth", error = %err, "token rejected");
                    AuthError::Invalid
                }
            })?
            .claims;

        if claims.exp.is_none() {
            let issued_at = claims.iat.ok_or(AuthError::NoExpiration)?;
            let lifetime = i64::try_from(self.fallback_expiration.as_secs()).unwrap_or(i64::MAX);
            if now > issued_at.saturating_add(lifetime) {
                return Err(AuthError::Expired);
            }
        }

        Ok(claims)
    }
}

/// Signs a development token for `subject`, valid for `ttl` when given.
pub fn mint_token(
    config: &JwtConfig,
    subject: &str,
    ttl: Option<Duration>,
) -> Result<String, AuthError> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let exp = ttl
        .map(|ttl| i64::try_from(ttl.as_secs()).map(|secs| now.saturating_add(secs)))
        .transpose()
        .map_err(|_| AuthError::Config("token lifetime out of range".to_string()))?;

    let claims = Claims {
        sub: Some(subject.to_string()),
        iat: Some(now),
        exp,
        nbf: None,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|err| AuthError::Config(format!("failed to sign token: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-with-enough-bytes-for-hs256";

    fn config() -> JwtConfig {
        JwtConfig::new(SECRET, Duration::from_secs(3600)).unwrap()
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn now() -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }

    #[test]
    fn minted_token_round_trips() {
        let config = config();
        let token = mint_token(&config, "alice", Some(Duration::from_secs(60))).unwrap();

        let claims = JwtVerifier::new(&config).verify(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("alice"));
        assert!(claims.exp.is_some());
    }

    #[test]
    fn expired_exp_is_rejected() {
        let token = sign(
            &Claims {
                sub: None,
                iat: Some(now() - 7200),
                exp: Some(now() - 60),
                nbf: None,
            },
            SECRET,
        );

        let err = JwtVerifier::new(&config()).verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn missing_exp_falls_back_to_iat() {
        let verifier = JwtVerifier::new(&config());
        let issued = now() - 10;
        let token = sign(
            &Claims {
                sub: Some("bob".to_string()),
                iat: Some(issued),
                exp: None,
                nbf: None,
            },
            SECRET,
        );

        assert!(verifier.verify_at(&token, issued + 3600).is_ok());
        assert!(matches!(
            verifier.verify_at(&token, issued + 3601),
            Err(AuthError::Expired)
        ));
    }

    #[test]
    fn token_without_exp_or_iat_is_rejected() {
        let token = sign(
            &Claims {
                sub: Some("carol".to_string()),
                iat: None,
                exp: None,
                nbf: None,
            },
            SECRET,
        );

        let err = JwtVerifier::new(&config()).verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::NoExpiration));
    }

    #[test]
    fn wrong_signature_is_invalid() {
        let token = sign(
            &Claims {
                sub: None,
                iat: Some(now()),
                exp: Some(now() + 60),
                nbf: None,
            },
            "another-secret-entirely-different-bytes",
        );

        let err = JwtVerifier::new(&config()).verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::Invalid));
    }

    #[test]
    fn token_before_nbf_is_rejected() {
        let verifier = JwtVerifier::new(&config());
        let token = sign(
            &Claims {
                sub: None,
                iat: Some(now()),
                exp: Some(now() + 3600),
                nbf: Some(now() + 600),
            },
            SECRET,
        );

        let err = verifier.verify(&token).unwrap_err();
        assert!(matches!(err, AuthError::NotYetValid));

        let active = sign(
            &Claims {
                sub: None,
                iat: Some(now()),
                exp: Some(now() + 3600),
                nbf: Some(now() - 1),
            },
            SECRET,
        );
        assert!(verifier.verify(&active).is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let err = JwtConfig::new("only-twenty-one-bytes", Duration::from_secs(60)).unwrap_err();
        assert!(err.to_string().contains("at least 32 bytes"), "{err}");

        assert!(JwtConfig::new("a".repeat(MIN_SECRET_BYTES), Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn garbage_is_invalid() {
        let err = JwtVerifier::new(&config()).verify("not-a-jwt").unwrap_err();
        assert!(matches!(err, AuthError::Invalid));
    }

    #[test]
    fn settings_require_secret_and_expiration() {
        let mut settings = AuthSettings::default();
        assert!(JwtConfig::from_settings(&settings).is_err());

        settings.secret = Some(SECRET.to_string());
        let err = JwtConfig::from_settings(&settings).unwrap_err();
        assert!(err.to_string().contains("auth.expiration"), "{err}");

        settings.expiration = Some("90m".to_string());
        let config = JwtConfig::from_settings(&settings).unwrap();
        assert_eq!(config.expiration(), Duration::from_secs(90 * 60));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains(SECRET));
    }
}
