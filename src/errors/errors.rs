use std::fmt::Display;

use inkwell::builder::BuilderError;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    function: Option<String>,
}

impl Error {
    pub fn new(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
            function: None,
        }
    }

    /// Attaches the function being lowered, unless one is already recorded.
    pub fn in_function(mut self, function: &str) -> Self {
        if self.function.is_none() {
            self.function = Some(function.to_string());
        }
        self
    }

    pub fn get_function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnsupportedConstruct { .. } => "UnsupportedConstruct",
            ErrorImpl::UndeclaredReference { .. } => "UndeclaredReference",
            ErrorImpl::InvalidOperatorForType { .. } => "InvalidOperatorForType",
            ErrorImpl::Builder { .. } => "BuilderError",
            ErrorImpl::VerificationFailed { .. } => "VerificationFailed",
            ErrorImpl::Io { .. } => "IoError",
            ErrorImpl::TargetUnavailable { .. } => "TargetUnavailable",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnsupportedConstruct { construct } => ErrorTip::Suggestion(format!(
                "`{}` is accepted by the language but cannot be compiled yet",
                construct
            )),
            ErrorImpl::UndeclaredReference { name } => ErrorTip::Suggestion(format!(
                "`{}` was never declared, the program should have been rejected by the type checker",
                name
            )),
            ErrorImpl::InvalidOperatorForType { operator, type_ } => {
                ErrorTip::Suggestion(format!(
                    "Operator `{}` cannot produce a value of type `{}`",
                    operator, type_
                ))
            }
            ErrorImpl::Builder { .. } => ErrorTip::None,
            ErrorImpl::VerificationFailed { .. } => ErrorTip::None,
            ErrorImpl::Io { .. } => ErrorTip::None,
            ErrorImpl::TargetUnavailable { .. } => ErrorTip::Suggestion(String::from(
                "Disable host target configuration or build against an LLVM with the native target",
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.function {
            Some(function) => write!(f, "{} (in function `{}`)", self.internal_error, function),
            None => write!(f, "{}", self.internal_error),
        }
    }
}

impl std::error::Error for Error {}

impl From<ErrorImpl> for Error {
    fn from(error_impl: ErrorImpl) -> Self {
        Error::new(error_impl)
    }
}

impl From<BuilderError> for Error {
    fn from(error: BuilderError) -> Self {
        Error::new(ErrorImpl::Builder {
            message: error.to_string(),
        })
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum ErrorImpl {
    #[error("unsupported construct: {construct}")]
    UnsupportedConstruct { construct: String },
    #[error("reference to undeclared name {name:?}")]
    UndeclaredReference { name: String },
    #[error("operator {operator} is not valid for result type {type_}")]
    InvalidOperatorForType { operator: String, type_: String },
    #[error("llvm builder error: {message}")]
    Builder { message: String },
    #[error("module verification failed: {message}")]
    VerificationFailed { message: String },
    #[error("failed to write module: {message}")]
    Io { message: String },
    #[error("host target unavailable: {message}")]
    TargetUnavailable { message: String },
}

impl ErrorImpl {
    pub fn unsupported(construct: &str) -> Self {
        ErrorImpl::UnsupportedConstruct {
            construct: construct.to_string(),
        }
    }

    pub fn undeclared(name: &str) -> Self {
        ErrorImpl::UndeclaredReference {
            name: name.to_string(),
        }
    }
}
