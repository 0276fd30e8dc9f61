use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("Platform error {0}")]
    Platform(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("{signature} not in {receiver}")]
    DispatchNotFound { signature: String, receiver: String },
    #[error("Cannot assign member {member} on frozen {receiver}")]
    WriteDenied { member: String, receiver: String },
    #[error("Invalid member name: {0:?}")]
    InvalidMemberName(String),
    #[error("Invalid signature {0:?}: {1}")]
    InvalidSignature(String, &'static str),
    #[error("Method {0} is already defined")]
    DuplicateMethod(String),
    #[error("Member {0} is not callable")]
    NotCallable(String),
    #[error("Unknown receiver #{0}")]
    UnknownReceiver(u64),
    #[error("Expected {0}")]
    ExpectedType(String),
    #[error("Illegal argument {0}")]
    IllegalArgumentException(String),
}

impl RuntimeError {
    /// True for the one error kind a dispatcher produces on its own.
    pub fn is_dispatch_not_found(&self) -> bool {
        matches!(self, RuntimeError::DispatchNotFound { .. })
    }
}
