use sqlx::PgPool;

use crate::auth::{AuthConfig, JwtService, TokenCodec};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    auth_config: AuthConfig,
    jwt_service: JwtService,
    tokenizer: TokenCodec,
    sso_codec: Option<TokenCodec>,
}

impl AppState {
    pub fn new(db: PgPool) -> anyhow::Result<Self> {
        Ok(Self::with_config(db, AuthConfig::from_env()?))
    }

    pub fn with_config(db: PgPool, auth_config: AuthConfig) -> Self {
        let jwt_service = JwtService::new(&auth_config);
        let tokenizer = TokenCodec::new(&auth_config.tokenize_secret);
        let sso_codec = auth_config.sso_secret.as_deref().map(TokenCodec::new);

        Self {
            db,
            auth_config,
            jwt_service,
            tokenizer,
            sso_codec,
        }
    }

    pub fn auth_config(&self) -> &AuthConfig {
        &self.auth_config
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    /// Codec for tokenized GraphQL arguments and results.
    pub fn tokenizer(&self) -> &TokenCodec {
        &self.tokenizer
    }

    /// Codec for portal tokens arriving at `/callback`; `None` when SSO is
    /// not configured.
    pub fn sso_codec(&self) -> Option<&TokenCodec> {
        self.sso_codec.as_ref()
    }
}
