use async_trait::async_trait;

use crate::errors::{AppError, AppResult};

/// Supplies the id of the student on whose behalf the engine is acting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fails with `AppError::Unauthorized` when nobody is signed in.
    async fn current_student_id(&self) -> AppResult<String>;
}

/// Identity fixed at construction, e.g. resolved once by the caller's own
/// session handling.
#[derive(Clone, Debug, Default)]
pub struct StaticIdentity {
    student_id: Option<String>,
}

impl StaticIdentity {
    pub fn signed_in(student_id: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { student_id: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_student_id(&self) -> AppResult<String> {
        match &self.student_id {
            Some(id) if !id.is_empty() => Ok(id.clone()),
            _ => Err(AppError::Unauthorized("No student is signed in".to_string())),
        }
    }
}
