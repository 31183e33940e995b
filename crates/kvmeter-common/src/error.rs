use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvmeterError {
    #[error("invalid metric name: {0:?}")]
    InvalidName(String),
    #[error("invalid label name: {0:?}")]
    InvalidLabelName(String),
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),
    #[error("metric already registered: {0}")]
    AlreadyRegistered(String),
    #[error("inconsistent metric family: {0}")]
    InconsistentFamily(String),
    #[error("key not found: {0}")]
    KeyNotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

impl KvmeterError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidName(_) => "InvalidName",
            Self::InvalidLabelName(_) => "InvalidLabelName",
            Self::DuplicateLabel(_) => "DuplicateLabel",
            Self::AlreadyRegistered(_) => "AlreadyRegistered",
            Self::InconsistentFamily(_) => "InconsistentFamily",
            Self::KeyNotFound(_) => "KeyNotFound",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::InternalError(_) => "InternalError",
        }
    }
}

pub type Result<T> = std::result::Result<T, KvmeterError>;
