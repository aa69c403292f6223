use std::fmt::Display;

use error_stack::Context;

#[derive(Debug)]
pub enum KernelError {
    Concurrency,
    Timeout,
    NotFound,
    InvalidTransition,
    Validation,
    Unauthorized,
    Forbidden,
    External,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::NotFound => write!(f, "Target not found"),
            KernelError::InvalidTransition => write!(f, "Status transition is not allowed"),
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::Unauthorized => write!(f, "Caller is not identified"),
            KernelError::Forbidden => write!(f, "Caller is not permitted"),
            KernelError::External => write!(f, "External service error"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}
