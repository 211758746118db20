#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read input file: {0}")]
    FileRead(std::io::Error),

    #[error("order records schema mismatch: {0}")]
    OrderSchema(String),

    /// A collaborator (task lookup, concept or reference translator) failed.
    ///
    /// Carried unchanged to the caller as the failure of the whole translation.
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: &'static str,
        message: String,
    },

    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),

    #[error("invalid text: {0}")]
    Text(#[from] orderbridge_types::TextError),
}

impl CoreError {
    /// Shorthand for collaborator implementations reporting a failure.
    pub fn collaborator(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator,
            message: message.into(),
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
