use super::AuthError;

/// Hash a password with bcrypt on the blocking pool
pub async fn hash_password(password: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Compare a password against a stored bcrypt hash on the blocking pool
pub async fn verify_password(password: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("correct horse".to_string(), 4).await.unwrap();
        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong horse".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        assert!(verify_password("pw".to_string(), "not-a-hash".to_string()).await.is_err());
    }
}
