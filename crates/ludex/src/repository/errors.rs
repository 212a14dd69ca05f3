use sea_orm::{ActiveValue, DbErr};
use thiserror::Error;

/// Errors from the record persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from SeaORM.
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    /// The caller passed an active model missing a required field.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// Extract a value the upsert path requires from an active model.
pub(crate) fn required_active_value<T: Clone + Into<sea_orm::Value>>(
    field: &str,
    value: &ActiveValue<T>,
) -> Result<T> {
    match value {
        ActiveValue::Set(value) | ActiveValue::Unchanged(value) => Ok(value.clone()),
        ActiveValue::NotSet => Err(RepositoryError::InvalidInput {
            message: format!("Missing required field: {}", field),
        }),
    }
}
