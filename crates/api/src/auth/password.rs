use crate::error::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub struct PasswordService;

impl PasswordService {
    pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::BadRequest(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }
        Ok(())
    }

    pub fn hash_password(password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
    }

    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify password: {e}")))
    }

    /// [`Self::hash_password`] on the blocking pool.
    pub async fn hash_blocking(password: String) -> Result<String, AppError> {
        tokio::task::spawn_blocking(move || Self::hash_password(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))?
    }

    /// [`Self::verify_password`] on the blocking pool.
    pub async fn verify_blocking(password: String, hash: String) -> Result<bool, AppError> {
        tokio::task::spawn_blocking(move || Self::verify_password(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_are_rejected() {
        assert!(PasswordService::validate_password_strength("seven77").is_err());
        assert!(PasswordService::validate_password_strength("eight888").is_ok());
    }

    #[tokio::test]
    async fn blocking_helpers_agree_with_sync_versions() {
        let hash = PasswordService::hash_blocking("harvest-2026".into()).await.unwrap();
        assert!(PasswordService::verify_blocking("harvest-2026".into(), hash.clone())
            .await
            .unwrap());
        assert!(!PasswordService::verify_blocking("wrong-pass".into(), hash)
            .await
            .unwrap());
    }

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = bcrypt::hash("harvest-2026", 4).unwrap();
        assert!(PasswordService::verify_password("harvest-2026", &hash).unwrap());
        assert!(!PasswordService::verify_password("harvest-2025", &hash).unwrap());
    }
}
