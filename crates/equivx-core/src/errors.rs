use equivx_core_types::RunId;
use thiserror::Error;

/// Result type alias using EquivError
pub type Result<T> = std::result::Result<T, EquivError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every fatal error raised by EquivX maps to one of these kinds, and every
/// kind maps to a stable code usable in tests, logs, and CLI output.
///
/// Structural findings (a value that differs, a missing member, a count
/// mismatch) are *not* errors; they are recorded as
/// [`Difference`](crate::report::Difference)s and only become a failure when
/// handed to a reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Introspection
    /// A type name was not registered with the member provider
    UnknownType,
    /// A type name was registered twice
    DuplicateType,

    // Configuration
    InvalidPath,
    InvalidProfile,
    InvalidInput,

    // Outcome
    /// A reporter raised a failure for a non-empty difference list
    NotEquivalent,

    // Integration/IO
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnknownType => "ERR_UNKNOWN_TYPE",
            ExErrorKind::DuplicateType => "ERR_DUPLICATE_TYPE",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::InvalidProfile => "ERR_INVALID_PROFILE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotEquivalent => "ERR_NOT_EQUIVALENT",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification fields needed for programmatic handling plus
/// the context (operation, type, path, run) needed for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    type_name: Option<String>,
    path: Option<String>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            type_name: None,
            path: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add type name context
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Add path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
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

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the type name context, if any
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Get the path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
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
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Fatal errors raised while configuring or running a comparison
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquivError {
    // ===== Introspection Errors =====
    /// Type is not known to the member provider
    #[error("Type is not registered: {type_name}")]
    UnknownType { type_name: String },

    /// Type was registered more than once
    #[error("Type is already registered: {type_name}")]
    DuplicateType { type_name: String },

    /// A descriptor names a base type that is not a class
    #[error("Type {type_name} cannot derive from {base}: {reason}")]
    InvalidBase {
        type_name: String,
        base: String,
        reason: String,
    },

    // ===== Configuration Errors =====
    /// Path pattern could not be parsed
    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPathPattern { pattern: String, reason: String },

    /// Options profile is malformed
    #[error("Invalid options profile: {reason}")]
    InvalidProfile { reason: String },

    /// Input document could not be used
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    // ===== Outcome =====
    /// A reporter rejected a non-empty difference list
    #[error("{message}")]
    NotEquivalent {
        message: String,
        difference_count: usize,
    },

    // ===== Integration Errors =====
    /// Filesystem access failed
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// Serialization or deserialization failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<EquivError> for ExError {
    fn from(err: EquivError) -> Self {
        match err {
            EquivError::UnknownType { type_name } => ExError::new(ExErrorKind::UnknownType)
                .with_type_name(type_name)
                .with_message("Type is not registered"),

            EquivError::DuplicateType { type_name } => ExError::new(ExErrorKind::DuplicateType)
                .with_type_name(type_name)
                .with_op("register_type")
                .with_message("Type is already registered"),

            EquivError::InvalidBase {
                type_name,
                base,
                reason,
            } => ExError::new(ExErrorKind::InvalidInput)
                .with_type_name(type_name)
                .with_op("register_type")
                .with_message(format!("Invalid base {}: {}", base, reason)),

            EquivError::InvalidPathPattern { pattern, reason } => {
                ExError::new(ExErrorKind::InvalidPath)
                    .with_path(pattern)
                    .with_op("parse_path_pattern")
                    .with_message(reason)
            }

            EquivError::InvalidProfile { reason } => ExError::new(ExErrorKind::InvalidProfile)
                .with_op("load_profile")
                .with_message(reason),

            EquivError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }

            EquivError::NotEquivalent {
                message,
                difference_count,
            } => ExError::new(ExErrorKind::NotEquivalent)
                .with_op("assert_equivalent")
                .with_message(format!("{} difference(s)\n{}", difference_count, message)),

            EquivError::Io { path, message } => ExError::new(ExErrorKind::Io)
                .with_path(path)
                .with_message(message),

            EquivError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to EquivError
impl From<serde_json::Error> for EquivError {
    fn from(err: serde_json::Error) -> Self {
        EquivError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Profiles are TOML; a parse failure is a profile problem, not a transport one
impl From<toml::de::Error> for EquivError {
    fn from(err: toml::de::Error) -> Self {
        EquivError::InvalidProfile {
            reason: err.to_string(),
        }
    }
}
