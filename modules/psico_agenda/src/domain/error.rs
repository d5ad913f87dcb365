use thiserror::Error;

use crate::domain::registration::Field;

/// Client-side errors raised before the scheduling API is contacted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Senhas não coincidem")]
    PasswordMismatch,

    #[error("Campo obrigatório: {}", .field.label())]
    MissingField { field: Field },

    #[error("Cadastro já em andamento")]
    AlreadySubmitting,
}

impl DomainError {
    pub fn password_mismatch() -> Self {
        Self::PasswordMismatch
    }

    pub fn missing_field(field: Field) -> Self {
        Self::MissingField { field }
    }

    pub fn already_submitting() -> Self {
        Self::AlreadySubmitting
    }
}
