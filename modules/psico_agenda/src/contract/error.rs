use thiserror::Error;

/// Errors surfaced by the scheduling API to its consumers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("E-mail '{email}' já está cadastrado")]
    Conflict { email: String },

    #[error("{message}")]
    Validation { message: String },

    #[error("Serviço indisponível: {reason}")]
    Unavailable { reason: String },

    #[error("Internal error")]
    Internal,
}

impl SchedulingError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}
