//! Platform-level error type shared by the DTO layer and the HTTP helper
//!
//! The codec and the validation engine have their own narrow error enums
//! (`CodecError`, `ValidationError`); both convert into `ContractError` so that
//! callers crossing a service boundary deal with a single error shape.

use std::fmt;

use thiserror::Error;

use crate::validation::ValidationError;
use crate::values::CodecError;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Communication,
    EntityDoesNotExist,
    ContractInvalid,
    ServerError,
    NotAllowed,
    DuplicateName,
    ServiceLocked,
    ServiceUnavailable,
    RangeNotSatisfiable,
    IoError,
    Unknown,
}

impl ErrorKind {
    /// Map an HTTP status code returned by a peer service to an error kind
    pub fn from_status(code: u16) -> Self {
        match code {
            400 => ErrorKind::ContractInvalid,
            404 => ErrorKind::EntityDoesNotExist,
            405 => ErrorKind::NotAllowed,
            409 => ErrorKind::DuplicateName,
            416 => ErrorKind::RangeNotSatisfiable,
            423 => ErrorKind::ServiceLocked,
            500 => ErrorKind::ServerError,
            503 => ErrorKind::ServiceUnavailable,
            _ => ErrorKind::Unknown,
        }
    }

    /// HTTP status code a service should answer with for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorKind::ContractInvalid => 400,
            ErrorKind::EntityDoesNotExist => 404,
            ErrorKind::NotAllowed => 405,
            ErrorKind::DuplicateName => 409,
            ErrorKind::RangeNotSatisfiable => 416,
            ErrorKind::ServiceLocked => 423,
            ErrorKind::ServiceUnavailable => 503,
            ErrorKind::Communication
            | ErrorKind::ServerError
            | ErrorKind::IoError
            | ErrorKind::Unknown => 500,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Communication => "CommunicationError",
            ErrorKind::EntityDoesNotExist => "EntityDoesNotExist",
            ErrorKind::ContractInvalid => "ContractInvalid",
            ErrorKind::ServerError => "ServerError",
            ErrorKind::NotAllowed => "NotAllowed",
            ErrorKind::DuplicateName => "DuplicateName",
            ErrorKind::ServiceLocked => "ServiceLocked",
            ErrorKind::ServiceUnavailable => "ServiceUnavailable",
            ErrorKind::RangeNotSatisfiable => "RangeNotSatisfiable",
            ErrorKind::IoError => "IOError",
            ErrorKind::Unknown => "UnknownError",
        };
        write!(f, "{name}")
    }
}

#[derive(Error, Debug)]
#[error("{message}")]
pub struct ContractError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl ContractError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn contract_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContractInvalid, message)
    }

    /// Prefix the message with `context`, keeping the kind and this error as
    /// the source
    pub fn context(self, context: &str) -> Self {
        Self {
            kind: self.kind,
            message: format!("{context}: {}", self.message),
            source: Some(Box::new(self)),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }
}

impl From<CodecError> for ContractError {
    fn from(err: CodecError) -> Self {
        Self::new(ErrorKind::ContractInvalid, err.to_string())
    }
}

impl From<ValidationError> for ContractError {
    fn from(err: ValidationError) -> Self {
        let kind = match err {
            ValidationError::ContractInvalid(_) => ErrorKind::ContractInvalid,
            ValidationError::Schema(_) => ErrorKind::ServerError,
        };
        Self::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::ContractInvalid);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::EntityDoesNotExist);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::DuplicateName);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::ServiceUnavailable);
        assert_eq!(ErrorKind::from_status(418), ErrorKind::Unknown);
    }

    #[test]
    fn test_status_code_round_trip() {
        for code in [400, 404, 405, 409, 416, 423, 500, 503] {
            assert_eq!(ErrorKind::from_status(code).status_code(), code);
        }
    }

    #[test]
    fn test_context_keeps_kind_and_source() {
        use std::error::Error as _;

        let err = ContractError::new(ErrorKind::DuplicateName, "name taken").context("cannot add");
        assert_eq!(err.kind(), ErrorKind::DuplicateName);
        assert_eq!(err.to_string(), "cannot add: name taken");
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("name taken"));
    }

    #[test]
    fn test_codec_error_is_contract_invalid() {
        let err: ContractError = CodecError::UnsupportedKind("Foo".into()).into();
        assert_eq!(err.kind(), ErrorKind::ContractInvalid);
        assert_eq!(err.status_code(), 400);
    }
}
