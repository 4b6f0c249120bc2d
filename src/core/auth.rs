//! Admin authentication - password hashing and bearer tokens.
//!
//! There is exactly one administrator. Its password is kept as an argon2 PHC
//! string; a successful login yields an HS256 token with issuer, subject and
//! expiry that admin routes require as `Authorization: Bearer <token>`.

use crate::errors::{Error, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// `iss` claim of every token this service issues.
pub const TOKEN_ISSUER: &str = "iftar-booking";

/// Shortest accepted signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Hashes a password into an argon2id PHC string.
///
/// # Errors
/// Returns [`Error::Auth`] if hashing fails.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::encode_b64(uuid::Uuid::new_v4().as_bytes()).map_err(|e| Error::Auth {
        message: e.to_string(),
    })?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Auth {
            message: e.to_string(),
        })
}

/// Checks `password` against a PHC string.
///
/// # Errors
/// Returns [`Error::Auth`] if `hash` is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| Error::Auth {
        message: format!("Stored password hash is invalid: {e}"),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// The single admin account.
#[derive(Clone)]
pub struct AdminCredentials {
    /// Login name
    pub username: String,
    password_hash: String,
}

impl AdminCredentials {
    /// Credentials from an existing PHC hash.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the hash cannot be parsed.
    pub fn from_hash(username: impl Into<String>, password_hash: impl Into<String>) -> Result<Self> {
        let password_hash = password_hash.into();
        PasswordHash::new(&password_hash)
            .map_err(|e| Error::config(format!("ADMIN_PASSWORD_HASH is not a valid PHC string: {e}")))?;
        Ok(Self {
            username: username.into(),
            password_hash,
        })
    }

    /// Credentials from a plain password, hashed immediately.
    ///
    /// # Errors
    /// Returns an error if the password is empty or hashing fails.
    pub fn from_plain(username: impl Into<String>, password: &str) -> Result<Self> {
        if password.is_empty() {
            return Err(Error::config("Admin password cannot be empty"));
        }
        Ok(Self {
            username: username.into(),
            password_hash: hash_password(password)?,
        })
    }

    /// True when both username and password match.
    ///
    /// # Errors
    /// Returns [`Error::Auth`] if the stored hash is unusable.
    pub fn verify(&self, username: &str, password: &str) -> Result<bool> {
        // Always run the hash check so a wrong username costs the same time.
        let password_ok = verify_password(password, &self.password_hash)?;
        Ok(password_ok && username == self.username)
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username
    pub sub: String,
    /// Always [`TOKEN_ISSUER`]
    pub iss: String,
    /// Issued at, unix seconds
    pub iat: i64,
    /// Expiry, unix seconds
    pub exp: i64,
}

/// A freshly issued token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    /// Encoded JWT
    pub token: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates admin tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: Duration,
}

impl TokenService {
    /// Token service signing with `secret`; tokens live for `lifetime_minutes`.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the secret is shorter than
    /// [`MIN_SECRET_LEN`] or the lifetime is not positive.
    pub fn new(secret: &[u8], lifetime_minutes: i64) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if lifetime_minutes <= 0 {
            return Err(Error::config("Token lifetime must be positive"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime: Duration::minutes(lifetime_minutes),
        })
    }

    /// Signs a token for `subject`.
    ///
    /// # Errors
    /// Returns [`Error::Auth`] if signing fails.
    pub fn issue(&self, subject: &str) -> Result<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + self.lifetime;
        let claims = Claims {
            sub: subject.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };
        self.encode(&claims).map(|token| IssuedToken { token, expires_at })
    }

    fn encode(&self, claims: &Claims) -> Result<String> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|e| {
            Error::Auth {
                message: e.to_string(),
            }
        })
    }

    /// Decodes and checks a token: signature, issuer and expiry.
    ///
    /// # Errors
    /// Returns [`Error::Unauthorized`] for any invalid or expired token.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| Error::Unauthorized {
                message: format!("Invalid token: {e}"),
            })
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

/// Checks admin credentials and issues a token.
///
/// # Errors
/// Returns [`Error::Unauthorized`] for a wrong username or password.
pub fn login(
    credentials: &AdminCredentials,
    tokens: &TokenService,
    username: &str,
    password: &str,
) -> Result<IssuedToken> {
    if !credentials.verify(username, password)? {
        warn!(username, "Rejected admin login");
        return Err(Error::Unauthorized {
            message: "Invalid username or password".to_string(),
        });
    }

    let issued = tokens.issue(&credentials.username)?;
    info!(username, expires_at = %issued.expires_at, "Admin logged in");
    Ok(issued)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_hash_and_verify() -> Result<()> {
        let hash = hash_password("rahasia")?;
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("rahasia", &hash)?);
        assert!(!verify_password("salah", &hash)?);
        assert!(verify_password("rahasia", "not-a-hash").is_err());
        Ok(())
    }

    #[test]
    fn test_credentials() -> Result<()> {
        let creds = AdminCredentials::from_plain("admin", "rahasia")?;
        assert!(creds.verify("admin", "rahasia")?);
        assert!(!creds.verify("root", "rahasia")?);
        assert!(!creds.verify("admin", "salah")?);

        let hash = hash_password("rahasia")?;
        let from_hash = AdminCredentials::from_hash("admin", hash)?;
        assert!(from_hash.verify("admin", "rahasia")?);

        assert!(AdminCredentials::from_hash("admin", "plain").is_err());
        assert!(AdminCredentials::from_plain("admin", "").is_err());
        Ok(())
    }

    #[test]
    fn test_token_round_trip() -> Result<()> {
        let tokens = TokenService::new(SECRET, 60)?;
        let issued = tokens.issue("admin")?;
        let claims = tokens.validate(&issued.token)?;
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        Ok(())
    }

    #[test]
    fn test_token_rejections() -> Result<()> {
        let tokens = TokenService::new(SECRET, 60)?;

        let now = Utc::now().timestamp();
        let expired = tokens.encode(&Claims {
            sub: "admin".to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now - 7200,
            exp: now - 3600,
        })?;
        assert!(matches!(
            tokens.validate(&expired),
            Err(Error::Unauthorized { .. })
        ));

        let foreign = tokens.encode(&Claims {
            sub: "admin".to_string(),
            iss: "someone-else".to_string(),
            iat: now,
            exp: now + 3600,
        })?;
        assert!(tokens.validate(&foreign).is_err());

        let other = TokenService::new(b"ffffffffffffffffffffffffffffffff", 60)?;
        let token = other.issue("admin")?.token;
        assert!(tokens.validate(&token).is_err());
        assert!(tokens.validate("garbage").is_err());
        Ok(())
    }

    #[test]
    fn test_token_service_config_checks() {
        assert!(matches!(
            TokenService::new(b"short", 60),
            Err(Error::Config { .. })
        ));
        assert!(TokenService::new(SECRET, 0).is_err());
    }

    #[test]
    fn test_login() -> Result<()> {
        let creds = AdminCredentials::from_plain("admin", "rahasia")?;
        let tokens = TokenService::new(SECRET, 30)?;

        let issued = login(&creds, &tokens, "admin", "rahasia")?;
        assert_eq!(tokens.validate(&issued.token)?.sub, "admin");

        assert!(matches!(
            login(&creds, &tokens, "admin", "salah"),
            Err(Error::Unauthorized { .. })
        ));
        Ok(())
    }
}
