use crate::auth::TokenizedError;
use crate::error::AppError;

/// Unified error type for GraphQL resolvers.
///
/// async-graphql has a blanket `impl<T: Display + Send + Sync + 'static> From<T> for Error`,
/// so any type implementing `Display` auto-converts via `?`.
///
/// This enum gives us:
///   - `From<sqlx::Error>`: logs the DB detail, shows a sanitized message to clients
///   - `From<TokenizedError>`: shows "Invalid tokenized payload…"
///   - `From<AppError>`: client errors keep their message, server errors are sanitized
///   - `GqlError::new("…")`: custom one-off messages
#[derive(Debug)]
pub enum GqlError {
    Sqlx(sqlx::Error),
    Tokenized(TokenizedError),
    App(AppError),
    Custom(String),
}

impl GqlError {
    pub fn new(msg: impl Into<String>) -> Self {
        GqlError::Custom(msg.into())
    }

    pub fn not_found(entity: &str) -> Self {
        GqlError::Custom(format!("{entity} not found"))
    }
}

impl std::fmt::Display for GqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GqlError::Sqlx(e) => {
                // Log the real error server-side; return a generic message to clients
                tracing::error!("Database error: {e}");
                write!(f, "Internal database error")
            }
            GqlError::Tokenized(e) => write!(f, "{e}"),
            GqlError::App(
                AppError::BadRequest(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg),
            ) => write!(f, "{msg}"),
            GqlError::App(e) => {
                tracing::error!("Internal error: {e}");
                write!(f, "Internal server error")
            }
            GqlError::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for GqlError {}

impl From<sqlx::Error> for GqlError {
    fn from(e: sqlx::Error) -> Self {
        GqlError::Sqlx(e)
    }
}

impl From<AppError> for GqlError {
    fn from(e: AppError) -> Self {
        GqlError::App(e)
    }
}

impl From<TokenizedError> for GqlError {
    fn from(e: TokenizedError) -> Self {
        GqlError::Tokenized(e)
    }
}

/// Extension trait that converts any `Result<T, E>` where `E: Display`
/// into `async_graphql::Result<T>` with a contextual message prefix.
///
/// Usage: `Uuid::parse_str(id).gql_err("Invalid farmer profile ID")?`
pub trait ResultExt<T> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn gql_err(self, context: &str) -> std::result::Result<T, async_graphql::Error> {
        self.map_err(|e| async_graphql::Error::new(format!("{context}: {e}")))
    }
}

/// Run a repository call, routing database errors through [`GqlError`].
pub trait DbResultExt<T> {
    fn db(self) -> std::result::Result<T, GqlError>;

    /// Like [`db`](DbResultExt::db), but a unique-index violation (SQLSTATE
    /// 23505) surfaces as `conflict` instead of a generic database error.
    fn db_unique(self, conflict: &str) -> std::result::Result<T, GqlError>;
}

impl<T> DbResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn db(self) -> std::result::Result<T, GqlError> {
        self.map_err(GqlError::from)
    }

    fn db_unique(self, conflict: &str) -> std::result::Result<T, GqlError> {
        self.map_err(|e| {
            if is_unique_violation(&e) {
                GqlError::new(conflict)
            } else {
                GqlError::from(e)
            }
        })
    }
}

pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_are_sanitized() {
        let err = GqlError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.to_string(), "Internal database error");
    }

    #[test]
    fn app_errors_keep_client_messages_only() {
        let bad = GqlError::from(AppError::BadRequest("Password too short".into()));
        assert_eq!(bad.to_string(), "Password too short");

        let internal = GqlError::from(AppError::Internal("bcrypt exploded".into()));
        assert_eq!(internal.to_string(), "Internal server error");
    }

    #[test]
    fn not_found_names_the_entity() {
        assert_eq!(
            GqlError::not_found("Farm profile").to_string(),
            "Farm profile not found"
        );
    }

    #[test]
    fn db_unique_only_rewrites_constraint_violations() {
        let other: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        assert_eq!(
            other.db_unique("Username already exists").unwrap_err().to_string(),
            "Internal database error"
        );
        assert!(!is_unique_violation(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn gql_err_prefixes_context() {
        let result: Result<(), _> = uuid::Uuid::parse_str("nope").map(|_| ());
        let err = result.gql_err("Invalid farm ID").unwrap_err();
        assert!(err.message.starts_with("Invalid farm ID: "));
    }
}
