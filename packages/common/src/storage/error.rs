use std::fmt;

/// Errors returned by an [`EntityStore`](super::EntityStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The requested entity does not exist.
    NotFound { entity: &'static str, id: i32 },
    /// The backend could not serve the request.
    Unavailable(String),
}

impl StorageError {
    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}
