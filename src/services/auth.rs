use crate::error::{AppError, Result};

/// Shared-secret check for write operations. Plain string equality, nothing more.
#[derive(Clone)]
pub struct AuthGate {
    secret: String,
}

impl AuthGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn check(&self, key: Option<&str>) -> Result<()> {
        match key {
            Some(key) if key == self.secret => Ok(()),
            _ => Err(AppError::Unauthorized),
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate").finish_non_exhaustive()
    }
}
