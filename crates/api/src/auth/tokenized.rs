//! "Tokenized" payloads: GraphQL arguments and results wrapped in an HS256 JWT.
//!
//! Clients sign the mutation input object itself (`jwt.sign(input, secret)`),
//! so the claims are the payload plus an optional `iat`/`exp`. Responses are
//! signed as `{ "queryResult": ..., "iat": ... }`. This obscures payloads in
//! transit; authorization still comes from the session.

use std::collections::HashSet;

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenizedError {
    #[error("Invalid tokenized payload")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Invalid tokenized payload: {0}")]
    Shape(String),

    #[error("Failed to tokenize result")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

#[derive(Serialize)]
struct TokenizedResult<'a, T: Serialize> {
    #[serde(rename = "queryResult")]
    query_result: &'a T,
    iat: i64,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Payload tokens carry no registered claims; `exp` is still checked when present.
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenizedError> {
        let data = decode::<serde_json::Value>(token.trim(), &self.decoding_key, &self.validation)
            .map_err(TokenizedError::Invalid)?;

        serde_json::from_value(data.claims).map_err(|e| TokenizedError::Shape(e.to_string()))
    }

    pub fn encode<T: Serialize>(&self, result: &T) -> Result<String, TokenizedError> {
        let claims = TokenizedResult {
            query_result: result,
            iat: Utc::now().timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenizedError::Encode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Payload {
        first_name: String,
        district: Option<String>,
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn decodes_client_signed_payload_ignoring_iat() {
        let codec = TokenCodec::new("tokenize");
        let token = sign(
            json!({ "firstName": "Sione", "district": "Vava'u", "iat": 1_700_000_000 }),
            "tokenize",
        );

        let payload: Payload = codec.decode(&token).unwrap();
        assert_eq!(
            payload,
            Payload {
                first_name: "Sione".into(),
                district: Some("Vava'u".into())
            }
        );
    }

    #[test]
    fn rejects_wrong_secret() {
        let codec = TokenCodec::new("tokenize");
        let token = sign(json!({ "firstName": "Sione" }), "someone-else");

        let err = codec.decode::<Payload>(&token).unwrap_err();
        assert!(matches!(err, TokenizedError::Invalid(_)));
        assert_eq!(err.to_string(), "Invalid tokenized payload");
    }

    #[test]
    fn rejects_expired_payload() {
        let codec = TokenCodec::new("tokenize");
        let token = sign(
            json!({ "firstName": "Sione", "exp": Utc::now().timestamp() - 3600 }),
            "tokenize",
        );

        assert!(matches!(
            codec.decode::<Payload>(&token),
            Err(TokenizedError::Invalid(_))
        ));
    }

    #[test]
    fn reports_missing_fields() {
        let codec = TokenCodec::new("tokenize");
        let token = sign(json!({ "district": "Ha'apai" }), "tokenize");

        let err = codec.decode::<Payload>(&token).unwrap_err();
        assert!(matches!(err, TokenizedError::Shape(_)));
        assert!(err.to_string().contains("firstName"));
    }

    #[test]
    fn rejects_garbage() {
        let codec = TokenCodec::new("tokenize");
        assert!(codec.decode::<Payload>("not-a-jwt").is_err());
    }

    #[test]
    fn encoded_results_wrap_query_result() {
        let codec = TokenCodec::new("tokenize");
        let token = codec.encode(&vec!["taro", "cassava"]).unwrap();

        let value: serde_json::Value = codec.decode(&token).unwrap();
        assert_eq!(value["queryResult"], json!(["taro", "cassava"]));
        assert!(value["iat"].is_i64());
    }
}
