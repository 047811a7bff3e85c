use std::fmt;

use crate::property::Role;

#[derive(Debug, Clone, PartialEq)]
pub struct FieldPropsError {
    pub record: String,
    pub field: Option<String>,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    #[error("invalid field configuration: {reason}")]
    InvalidConfiguration { reason: String },
    #[error("invalid field property: {reason}")]
    InvalidProperty { reason: String },
    #[error("{role} role is not defined")]
    MissingRole { role: Role },
    #[error("object has no attribute '{name}'")]
    MissingAttribute { name: String },
    #[error("missing parameter {name}")]
    MissingArgument { name: String },
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
    #[error("cannot {action} field of a frozen record")]
    Frozen { action: &'static str },
    #[error("{0}")]
    Custom(String),
}

impl fmt::Display for FieldPropsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.record)?;

        if let Some(ref field) = self.field {
            write!(f, " field '{field}'")?;
        }

        write!(f, ": {}", self.kind)
    }
}

impl std::error::Error for FieldPropsError {}

impl FieldPropsError {
    pub fn new(record: impl Into<String>, field: Option<String>, kind: ErrorKind) -> Self {
        Self {
            record: record.into(),
            field,
            kind,
        }
    }

    pub fn invalid_configuration(
        record: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(
            record,
            Some(field.into()),
            ErrorKind::InvalidConfiguration {
                reason: reason.into(),
            },
        )
    }

    pub fn invalid_record(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(record, None, ErrorKind::InvalidConfiguration { reason: reason.into() })
    }

    pub fn invalid_property(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(record, None, ErrorKind::InvalidProperty { reason: reason.into() })
    }

    pub fn missing_role(record: impl Into<String>, field: impl Into<String>, role: Role) -> Self {
        Self::new(record, Some(field.into()), ErrorKind::MissingRole { role })
    }

    pub fn missing_attribute(record: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(record, None, ErrorKind::MissingAttribute { name: name.into() })
    }

    pub fn missing_argument(record: impl Into<String>, field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(record, Some(field.clone()), ErrorKind::MissingArgument { name: field })
    }

    pub fn invalid_argument(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(record, None, ErrorKind::InvalidArgument { reason: reason.into() })
    }

    pub fn frozen(
        record: impl Into<String>,
        field: impl Into<String>,
        action: &'static str,
    ) -> Self {
        Self::new(record, Some(field.into()), ErrorKind::Frozen { action })
    }

    pub fn custom(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(record, None, ErrorKind::Custom(message.into()))
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// True for the errors raised when a role or attribute is not there to access.
    pub fn is_attribute_error(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingRole { .. } | ErrorKind::MissingAttribute { .. })
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidConfiguration { .. })
    }
}
