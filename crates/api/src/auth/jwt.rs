use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthConfig;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub sid: String, // Session ID
    pub jti: String, // Session secret, hashed in user_sessions.token_hash
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        user_id: Uuid,
        username: String,
        session_id: Uuid,
        session_secret: String,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            sid: session_id.to_string(),
            jti: session_secret,
            username,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    pub fn create_token(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn service(secret: &str) -> JwtService {
        let config = AuthConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(secret.to_string()),
            "TOKENIZE_SECRET" => Some("payloads".to_string()),
            _ => None,
        })
        .unwrap();
        JwtService::new(&config)
    }

    #[test]
    fn issued_token_verifies_with_same_secret() {
        let jwt = service("first-secret");
        let user_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let claims = Claims::new(
            user_id,
            "officer".into(),
            session_id,
            "raw".into(),
            Utc::now() + Duration::hours(1),
        );

        let token = jwt.create_token(&claims).unwrap();
        let verified = jwt.verify_token(&token).unwrap();

        assert_eq!(verified.sub, user_id.to_string());
        assert_eq!(verified.sid, session_id.to_string());
        assert_eq!(verified.username, "officer");
    }

    #[test]
    fn token_from_other_secret_is_unauthorized() {
        let claims = Claims::new(
            Uuid::new_v4(),
            "officer".into(),
            Uuid::new_v4(),
            "raw".into(),
            Utc::now() + Duration::hours(1),
        );
        let token = service("first-secret").create_token(&claims).unwrap();

        let err = service("second-secret").verify_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = service("first-secret");
        let claims = Claims::new(
            Uuid::new_v4(),
            "officer".into(),
            Uuid::new_v4(),
            "raw".into(),
            Utc::now() - Duration::hours(2),
        );
        let token = jwt.create_token(&claims).unwrap();

        assert!(jwt.verify_token(&token).is_err());
    }
}
