//! Error types for the wire protocol and session orchestrator.

/// Per-envelope decode failure. Non-fatal to the session: the envelope is
/// dropped and logged unless decode errors burst past the rolling window
/// threshold (see [`crate::session::controller`]).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum DecodeError {
    /// Top-level map did not have exactly 5 entries, or a fixed-arity body
    /// did not have its declared field count.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// `type` field did not match any catalogue entry.
    #[error("unknown message type: {0}")]
    UnknownType(i64),

    /// A field decoded to a msgpack type other than the one the catalogue
    /// declares for it.
    #[error("field {field} type mismatch: expected {expected}")]
    FieldTypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// A required (non-optional) field was absent or nil.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// An `Int32` field held a value outside `[-2^31, 2^31)`.
    #[error("field {field} integer out of range: {value}")]
    IntegerOutOfRange { field: &'static str, value: i64 },

    /// An enum field with no safe default (currently only
    /// `ControlVariation.mode`) held an unrecognized wire string.
    #[error("unknown enum value for field {0}")]
    UnknownEnumStrict(&'static str),

    /// `body` appeared on the wire before `type` was read.
    #[error("body encountered before type")]
    BodyBeforeType,
}

/// Encoder-side failure. Per spec, a free-form value (`meta`, `parameters`,
/// `result`) outside the supported [`crate::value::Value`] shapes is a hard
/// encode error rather than being silently stringified.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum EncodeError {
    #[error("value of field {0} is not representable on the wire")]
    UnrepresentableValue(&'static str),
    #[error("msgpack write failure: {0}")]
    Io(String),
}

/// Session-level error surfaced to the caller or the `RuntimeEvent` stream.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("illegal transition from {from:?} to {to:?}")]
    IllegalStateTransition {
        from: crate::session::state::SessionState,
        to: crate::session::state::SessionState,
    },

    #[error("no active conversation")]
    NoActiveConversation,

    #[error("edit follow-up timed out waiting for a new UserMessage")]
    EditFollowUpTimeout,

    /// Carried from an inbound `ErrorMessage`.
    #[error("server error {code} (severity {severity:?}, recoverable={recoverable})")]
    ServerError {
        code: i32,
        severity: crate::catalogue::enums::Severity,
        recoverable: bool,
    },
}

/// Transport-level error, reported by or about the `MediaLink` collaborator.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum TransportError {
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    #[error("conversation token expired")]
    TokenExpired,
    #[error("media link disconnected")]
    Disconnected,
    #[error("media link reconnecting")]
    Reconnecting,
}

/// Crate-wide result alias.
pub type Result<T, E = SessionError> = std::result::Result<T, E>;
