use mibtc_core_types::RequestId;
use thiserror::Error;

/// Result type alias using MibError
pub type Result<T> = std::result::Result<T, MibError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the type pipeline, the registration layer or the
/// write engine is classified into one of these kinds. Each kind has a stable
/// code that tests and callers can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    InvalidRecord,
    Config,

    // Type pipeline
    UnresolvedBaseType,
    DuplicateType,
    NoDefaultAvailable,
    InvalidValue,

    // Registration
    MissingSymbol,
    ValueModelIncompatible,
    TableIndexUnavailable,

    // Writes
    NoSuchObject,
    NotWritable,
    ConstraintViolation,
    IllegalTransition,
    MissingInstance,
    EngineRejected,
    SequentialAborted,

    // Infrastructure
    Io,
    Serialization,
    Persistence,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidRecord => "ERR_INVALID_RECORD",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::UnresolvedBaseType => "ERR_UNRESOLVED_BASE_TYPE",
            ExErrorKind::DuplicateType => "ERR_DUPLICATE_TYPE",
            ExErrorKind::NoDefaultAvailable => "ERR_NO_DEFAULT_AVAILABLE",
            ExErrorKind::InvalidValue => "ERR_INVALID_VALUE",
            ExErrorKind::MissingSymbol => "ERR_MISSING_SYMBOL",
            ExErrorKind::ValueModelIncompatible => "ERR_VALUE_MODEL_INCOMPATIBLE",
            ExErrorKind::TableIndexUnavailable => "ERR_TABLE_INDEX_UNAVAILABLE",
            ExErrorKind::NoSuchObject => "ERR_NO_SUCH_OBJECT",
            ExErrorKind::NotWritable => "ERR_NOT_WRITABLE",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::IllegalTransition => "ERR_ILLEGAL_TRANSITION",
            ExErrorKind::MissingInstance => "ERR_MISSING_INSTANCE",
            ExErrorKind::EngineRejected => "ERR_ENGINE_REJECTED",
            ExErrorKind::SequentialAborted => "ERR_SEQUENTIAL_ABORTED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus the subject of the failure:
/// the type name for type pipeline errors, the object path for registration
/// and write errors.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    type_name: Option<String>,
    path: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            type_name: None,
            path: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Name of the object or record the error concerns
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    /// Dotted object identifier the error concerns
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(type_name) = &self.type_name {
            write!(f, " (type: {})", type_name)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (object: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Failures of the type pipeline, record loading and configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MibError {
    /// The parent chain never reaches a primitive base kind
    #[error("Type {type_name} does not resolve to a primitive base type: {reason}")]
    UnresolvedBaseType { type_name: String, reason: String },

    #[error("Type {type_name} is defined more than once")]
    DuplicateType { type_name: String },

    /// Neither a built-in default nor any provider yields a value
    #[error("No default value available for type {type_name}")]
    NoDefaultAvailable { type_name: String },

    /// The value is not representable in the type's base kind
    #[error("Invalid value for type {type_name}: {reason}")]
    InvalidValue { type_name: String, reason: String },

    /// The value has the right shape but a declared restriction rejects it
    #[error("Value {value} violates {constraint} of type {type_name}")]
    ConstraintViolation {
        type_name: String,
        constraint: String,
        value: String,
    },

    #[error("Invalid record {name}: {reason}")]
    InvalidRecord { name: String, reason: String },

    #[error("Configuration error: {reason}")]
    Config { reason: String },

    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<MibError> for ExError {
    fn from(err: MibError) -> Self {
        match err {
            MibError::UnresolvedBaseType { type_name, reason } => {
                ExError::new(ExErrorKind::UnresolvedBaseType)
                    .with_op("resolve_type")
                    .with_type_name(type_name)
                    .with_message(reason)
            }
            MibError::DuplicateType { type_name } => ExError::new(ExErrorKind::DuplicateType)
                .with_op("add_type")
                .with_type_name(type_name)
                .with_message("Type is defined more than once"),
            MibError::NoDefaultAvailable { type_name } => {
                ExError::new(ExErrorKind::NoDefaultAvailable)
                    .with_op("synthesize_default")
                    .with_type_name(type_name)
                    .with_message("No built-in default and every provider declined")
            }
            MibError::InvalidValue { type_name, reason } => {
                ExError::new(ExErrorKind::InvalidValue)
                    .with_type_name(type_name)
                    .with_message(reason)
            }
            MibError::ConstraintViolation {
                type_name,
                constraint,
                value,
            } => ExError::new(ExErrorKind::ConstraintViolation)
                .with_type_name(type_name)
                .with_message(format!("{} rejects {}", constraint, value)),
            MibError::InvalidRecord { name, reason } => ExError::new(ExErrorKind::InvalidRecord)
                .with_op("load_records")
                .with_entity_id(name)
                .with_message(reason),
            MibError::Config { reason } => ExError::new(ExErrorKind::Config)
                .with_op("load_config")
                .with_message(reason),
            MibError::Io { message } => ExError::new(ExErrorKind::Io).with_message(message),
            MibError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for MibError {
    fn from(err: serde_json::Error) -> Self {
        MibError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for MibError {
    fn from(err: std::io::Error) -> Self {
        MibError::Io {
            message: err.to_string(),
        }
    }
}
