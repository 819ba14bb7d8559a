use crate::EquipmentProfileError;

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

/// Rejection of caller input before it reaches the resolver or the warm-up builder.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Working weight must be greater than zero ({0})")]
    TopWeight(f64),
    #[error("Weight must be a non-negative number ({0})")]
    Weight(f64),
    #[error(transparent)]
    EquipmentProfile(#[from] EquipmentProfileError),
}

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Update(#[from] UpdateError),
}

impl From<StorageError> for ServiceError {
    fn from(value: StorageError) -> Self {
        ServiceError::Read(ReadError::Storage(value))
    }
}
