use gmark_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using MarkingError
pub type Result<T> = std::result::Result<T, MarkingError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// parsing messages. The kinds mirror the failure classes of the marking
/// operations plus the collaborator and serialization boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Selector validation
    InvalidSelector,

    // Marking set preconditions
    MarkingNotFound,

    // Caller programming errors
    MissingArgument,

    // Versioning collaborator
    ObjectRevoked,

    // Object model / IO boundary
    InvalidObject,
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidSelector => "ERR_INVALID_SELECTOR",
            ExErrorKind::MarkingNotFound => "ERR_MARKING_NOT_FOUND",
            ExErrorKind::MissingArgument => "ERR_MISSING_ARGUMENT",
            ExErrorKind::ObjectRevoked => "ERR_OBJECT_REVOKED",
            ExErrorKind::InvalidObject => "ERR_INVALID_OBJECT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever context the failing operation
/// knew about: the object, the offending selector, the marking refs involved.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    object_id: Option<String>,
    selector: Option<String>,
    marking_refs: Option<Vec<String>>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            object_id: None,
            selector: None,
            marking_refs: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the id of the object being marked
    pub fn with_object_id(mut self, id: impl Into<String>) -> Self {
        self.object_id = Some(id.into());
        self
    }

    /// Add the selector that caused the failure
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    /// Add the marking refs involved in the failure
    pub fn with_marking_refs(mut self, refs: Vec<String>) -> Self {
        self.marking_refs = Some(refs);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn marking_refs(&self) -> Option<&[String]> {
        self.marking_refs.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(object_id) = &self.object_id {
            write!(f, " (object_id: {})", object_id)?;
        }
        if let Some(selector) = &self.selector {
            write!(f, " (selector: {})", selector)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for granular marking operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarkingError {
    /// A selector does not resolve against the object's structure
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        object_id: Option<String>,
        selector: String,
        reason: String,
    },

    /// None of the requested (marking, selector) combinations exist on the object
    #[error("Markings not found on object: {requested:?}")]
    MarkingNotFound {
        object_id: Option<String>,
        requested: Vec<String>,
    },

    /// A mandatory argument was omitted by the caller
    #[error("Required argument '{argument}' must be provided")]
    MissingArgument { argument: &'static str },

    /// The versioning collaborator refuses to produce a new version
    #[error("Cannot create a new version of revoked object {object_id}")]
    ObjectRevoked { object_id: String },

    /// Input could not be interpreted as a markable object
    #[error("Invalid object: {reason}")]
    InvalidObject { reason: String },

    /// JSON encoding/decoding failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<serde_json::Error> for MarkingError {
    fn from(err: serde_json::Error) -> Self {
        MarkingError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<MarkingError> for ExError {
    fn from(err: MarkingError) -> Self {
        match err {
            MarkingError::InvalidSelector {
                object_id,
                selector,
                reason,
            } => {
                let ex = ExError::new(ExErrorKind::InvalidSelector)
                    .with_selector(selector)
                    .with_message(reason);
                match object_id {
                    Some(id) => ex.with_object_id(id),
                    None => ex,
                }
            }

            MarkingError::MarkingNotFound {
                object_id,
                requested,
            } => {
                let ex = ExError::new(ExErrorKind::MarkingNotFound)
                    .with_message(format!("None of {} requested markings exist", requested.len()))
                    .with_marking_refs(requested);
                match object_id {
                    Some(id) => ex.with_object_id(id),
                    None => ex,
                }
            }

            MarkingError::MissingArgument { argument } => {
                ExError::new(ExErrorKind::MissingArgument)
                    .with_message(format!("Required argument '{}' must be provided", argument))
            }

            MarkingError::ObjectRevoked { object_id } => ExError::new(ExErrorKind::ObjectRevoked)
                .with_object_id(object_id)
                .with_message("Object is revoked"),

            MarkingError::InvalidObject { reason } => {
                ExError::new(ExErrorKind::InvalidObject).with_message(reason)
            }

            MarkingError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}
