use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use std::time::Duration;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error};

use crate::auth::dto::{Claims, JwtKeys, RegisterRequest};
use crate::config::JwtConfig;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Field-level registration rules. Returns the validated fields, or the
/// first failing field as `"{field}: {message}"`; uniqueness against the
/// database is checked separately by the handler.
pub fn validate_registration(payload: &RegisterRequest) -> Result<(&str, &str, &str), String> {
    let username = payload
        .username
        .as_deref()
        .ok_or("username: Missing data for required field.")?;
    let email = payload
        .email
        .as_deref()
        .ok_or("email: Missing data for required field.")?;
    let password = payload
        .password
        .as_deref()
        .ok_or("password: Missing data for required field.")?;

    if username.len() < 4 || username.len() > 20 {
        return Err("username: Length must be between 4 and 20.".into());
    }
    if !is_valid_email(email) {
        return Err("email: Not a valid email address.".into());
    }
    if password.len() < 8 {
        return Err("password: Shorter than minimum length 8.".into());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("password: Password must contain at least one digit".into());
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Err("password: Password must contain at least one uppercase letter".into());
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Err("password: Password must contain at least one lowercase letter".into());
    }
    if !password.chars().any(|c| "!@#$%^&*()_+-=".contains(c)) {
        return Err("password: Password must contain at least one special character".into());
    }

    Ok((username, email, password))
}

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
            ttl: Duration::from_secs((ttl_minutes as u64) * 60),
        }
    }
}

impl JwtKeys {
    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod password_tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }
}

#[cfg(test)]
mod validation_tests {
    use super::*;

    fn req(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn accepts_valid_registration() {
        assert!(validate_registration(&req("validname", "valid@email.com", "validPassword!4")).is_ok());
    }

    #[test]
    fn reports_missing_fields_first() {
        let payload = RegisterRequest {
            username: None,
            email: Some("valid@mail.com".into()),
            password: Some("validPassword!4".into()),
        };
        assert_eq!(
            validate_registration(&payload).unwrap_err(),
            "username: Missing data for required field."
        );

        let payload = RegisterRequest {
            username: Some("test".into()),
            email: Some("valid@mail.com".into()),
            password: None,
        };
        assert_eq!(
            validate_registration(&payload).unwrap_err(),
            "password: Missing data for required field."
        );
    }

    #[test]
    fn rejects_short_username() {
        assert_eq!(
            validate_registration(&req("n", "valid@mail.com", "validPassword!4")).unwrap_err(),
            "username: Length must be between 4 and 20."
        );
    }

    #[test]
    fn rejects_invalid_email() {
        assert_eq!(
            validate_registration(&req("test", "invalid", "validPassword!4")).unwrap_err(),
            "email: Not a valid email address."
        );
    }

    #[test]
    fn rejects_weak_passwords() {
        let cases = [
            ("invalid", "password: Shorter than minimum length 8."),
            ("invalidPassword@", "password: Password must contain at least one digit"),
            ("123abc@1", "password: Password must contain at least one uppercase letter"),
            ("123ABC@1", "password: Password must contain at least one lowercase letter"),
            ("ABC123abc", "password: Password must contain at least one special character"),
        ];
        for (password, expected) in cases {
            assert_eq!(
                validate_registration(&req("validname", "valid@mail.com", password)).unwrap_err(),
                expected,
                "password case: {password}"
            );
        }
    }
}

#[cfg(test)]
mod jwt_tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        let state = AppState::fake();
        JwtKeys::from_ref(&state)
    }

    #[tokio::test]
    async fn sign_and_verify_token() {
        let keys = make_keys();
        let token = keys.sign(42).expect("sign");
        let claims = keys.verify(&token).expect("verify token");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, "test-issuer");
        assert_eq!(claims.aud, "test-aud");
    }

    #[tokio::test]
    async fn verify_rejects_garbage() {
        let keys = make_keys();
        assert!(keys.verify("not-a-token").is_err());
    }
}
