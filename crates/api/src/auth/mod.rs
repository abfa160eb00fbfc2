pub mod config;
pub mod jwt;
pub mod password;
pub mod permissions;
pub mod session;
pub mod tokenized;

pub use config::AuthConfig;
pub use jwt::{Claims, JwtService};
pub use permissions::{require_privilege, require_session, Privilege, SessionUser};
pub use tokenized::{TokenCodec, TokenizedError};
