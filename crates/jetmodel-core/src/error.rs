//! Error types for JetModel.
//!
//! Driver failures travel through the adapter unchanged as `Connection` or `Query`
//! errors. The adapter itself only ever produces `Type` errors (a raw value whose
//! shape no coercion rule accepts) and `Config` errors.

use std::fmt;

/// Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed error source carried by driver errors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The primary error type for all JetModel operations.
#[derive(Debug)]
pub enum Error {
    /// Connection-level failure reported by the driver.
    Connection(ConnectionError),
    /// Statement execution failure reported by the driver.
    Query(QueryError),
    /// A raw value could not be converted to the requested type.
    Type(TypeError),
    /// Configuration could not be read or written.
    Config(String),
    /// Anything else.
    Custom(String),
}

#[derive(Debug)]
pub struct ConnectionError {
    pub kind: ConnectionErrorKind,
    pub message: String,
    pub source: Option<BoxError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// Failed to open the database file or reach the engine
    Connect,
    /// Operation requires an open connection
    NotOpen,
    /// Connection was lost mid-operation
    Disconnected,
    /// Connection has already been disposed
    Disposed,
    /// Credentials or workgroup file rejected
    Authentication,
    /// Transaction could not be started or finished
    Transaction,
}

#[derive(Debug)]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
    pub sql: Option<String>,
    pub source: Option<BoxError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// Malformed SQL text
    Syntax,
    /// Referenced table or query does not exist
    NoSuchTable,
    /// Column ordinal or name out of range
    NoSuchColumn,
    /// Constraint violated
    Constraint,
    /// Reader is not positioned on a row, or is closed
    InvalidState,
    /// Command timeout elapsed
    Timeout,
    /// Other engine error
    Database,
}

/// A raw value's runtime shape did not match the accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeError {
    /// What the accessor wanted.
    pub expected: &'static str,
    /// Type name of the raw value that was found.
    pub actual: String,
    /// Column ordinal, when known.
    pub column: Option<usize>,
}

impl Error {
    /// Build a type error for a value of type `actual` read as `expected`.
    pub fn type_mismatch(expected: &'static str, actual: impl Into<String>) -> Self {
        Error::Type(TypeError {
            expected,
            actual: actual.into(),
            column: None,
        })
    }

    /// Build a query error with no source.
    pub fn query(kind: QueryErrorKind, message: impl Into<String>) -> Self {
        Error::Query(QueryError {
            kind,
            message: message.into(),
            sql: None,
            source: None,
        })
    }

    /// Build a connection error with no source.
    pub fn connection(kind: ConnectionErrorKind, message: impl Into<String>) -> Self {
        Error::Connection(ConnectionError {
            kind,
            message: message.into(),
            source: None,
        })
    }

    /// Attach a column ordinal to a type error. Other variants are returned as-is.
    #[must_use]
    pub fn with_column(self, ordinal: usize) -> Self {
        match self {
            Error::Type(mut e) => {
                e.column.get_or_insert(ordinal);
                Error::Type(e)
            }
            other => other,
        }
    }

    /// True if this is a coercion failure.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Error::Type(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Connection(e) => write!(f, "Connection error: {}", e.message),
            Error::Query(e) => match &e.sql {
                Some(sql) => write!(f, "Query error: {} (sql: {})", e.message, sql),
                None => write!(f, "Query error: {}", e.message),
            },
            Error::Type(e) => write!(f, "{e}"),
            Error::Config(msg) => write!(f, "Configuration error: {msg}"),
            Error::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.actual == "null" {
            write!(f, "Cannot cast null to {}", self.expected)?;
        } else {
            write!(f, "Cannot convert {} to {}", self.actual, self.expected)?;
        }
        if let Some(column) = self.column {
            write!(f, " (column {column})")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Connection(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::Query(e) => e
                .source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_error_display_names_source_type() {
        let err = Error::type_mismatch("boolean", "text");
        assert_eq!(err.to_string(), "Cannot convert text to boolean");
    }

    #[test]
    fn test_null_type_error_display() {
        let err = Error::type_mismatch("boolean", "null");
        assert_eq!(err.to_string(), "Cannot cast null to boolean");
    }

    #[test]
    fn test_with_column_only_touches_type_errors() {
        let err = Error::type_mismatch("int", "double").with_column(3);
        assert_eq!(err.to_string(), "Cannot convert double to int (column 3)");

        let err = Error::query(QueryErrorKind::Syntax, "bad").with_column(3);
        assert!(matches!(err, Error::Query(ref q) if q.kind == QueryErrorKind::Syntax));
    }

    #[test]
    fn test_with_column_keeps_first_ordinal() {
        let err = Error::type_mismatch("int", "double")
            .with_column(1)
            .with_column(2);
        let Error::Type(inner) = err else {
            panic!("expected type error");
        };
        assert_eq!(inner.column, Some(1));
    }

    #[test]
    fn test_source_is_exposed() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.accdb");
        let err = Error::Connection(ConnectionError {
            kind: ConnectionErrorKind::Connect,
            message: "could not open".to_string(),
            source: Some(Box::new(io)),
        });
        assert!(err.source().is_some());
        assert!(!err.is_type_error());
    }
}
