//! Three-state result of a client operation.

use api::ApiError;

/// Latest known state of one operation.
///
/// `Pending` is set before a request is sent and replaced once it resolves.
/// How long a success or failure stays on screen is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T = ()> {
    Pending,
    Succeeded(T),
    Failed(String),
}

impl<T> Outcome<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Outcome::Pending)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }

    /// The user-visible failure message, if the operation failed.
    pub fn failure(&self) -> Option<&str> {
        match self {
            Outcome::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Pending => Outcome::Pending,
            Outcome::Succeeded(value) => Outcome::Succeeded(f(value)),
            Outcome::Failed(message) => Outcome::Failed(message),
        }
    }

    /// Drop the success value, keeping only the state.
    pub fn settled(&self) -> Outcome {
        match self {
            Outcome::Pending => Outcome::Pending,
            Outcome::Succeeded(_) => Outcome::Succeeded(()),
            Outcome::Failed(message) => Outcome::Failed(message.clone()),
        }
    }
}

impl Outcome {
    /// Settled state of a finished request.
    pub fn resolved<T>(result: &Result<T, ApiError>) -> Self {
        match result {
            Ok(_) => Outcome::Succeeded(()),
            Err(err) => Outcome::Failed(err.user_message()),
        }
    }
}

impl<T> From<Result<T, ApiError>> for Outcome<T> {
    fn from(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Outcome::Succeeded(value),
            Err(err) => Outcome::Failed(err.user_message()),
        }
    }
}
