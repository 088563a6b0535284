//! Driver capability traits.
//!
//! The adapter never inherits from a driver type; it owns exactly one value
//! implementing these traits and composes over it. Everything here is synchronous:
//! a call blocks for as long as the driver takes.

use std::time::Duration;

use crate::error::{Error, QueryErrorKind, Result};
use crate::row::{ColumnInfo, find_ordinal};
use crate::types::SqlType;
use crate::value::{FromValue, Value};

/// Transaction isolation levels a consumer may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsolationLevel {
    /// Let the driver pick
    #[default]
    Unspecified,
    /// Pending changes of more isolated transactions cannot be overwritten
    Chaos,
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
    Snapshot,
}

impl IsolationLevel {
    /// Get the SQL name for this isolation level.
    pub const fn as_sql(&self) -> &'static str {
        match self {
            IsolationLevel::Unspecified => "UNSPECIFIED",
            IsolationLevel::Chaos => "CHAOS",
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
            IsolationLevel::Snapshot => "SNAPSHOT",
        }
    }
}

/// Connection state as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Closed,
    Connecting,
    Open,
    Executing,
    Fetching,
    Broken,
}

impl ConnectionState {
    pub const fn is_open(self) -> bool {
        matches!(
            self,
            ConnectionState::Open | ConnectionState::Executing | ConnectionState::Fetching
        )
    }
}

/// A native connection to a Jet/ACE database.
pub trait DriverConnection: Sized {
    /// Forward-only cursor produced by [`execute_reader`](Self::execute_reader).
    type Cursor<'conn>: DriverCursor
    where
        Self: 'conn;

    /// Handle for an open transaction.
    type Transaction: DriverTransaction;

    fn connection_string(&self) -> &str;

    fn set_connection_string(&mut self, connection_string: &str) -> Result<()>;

    /// Time to wait while opening before giving up.
    fn connection_timeout(&self) -> Duration {
        Duration::from_secs(15)
    }

    /// Database name, available before the connection is opened.
    fn database(&self) -> &str;

    /// Database file path or data source name.
    fn data_source(&self) -> &str;

    fn server_version(&self) -> Result<String>;

    fn state(&self) -> ConnectionState;

    fn open(&mut self) -> Result<()>;

    fn close(&mut self) -> Result<()>;

    fn change_database(&mut self, database: &str) -> Result<()>;

    /// Start a transaction at exactly `level`.
    fn begin_transaction(&mut self, level: IsolationLevel) -> Result<Self::Transaction>;

    /// Execute a statement, returning rows affected.
    fn execute_non_query(&mut self, sql: &str, timeout: Option<Duration>) -> Result<u64>;

    /// Execute a query and return its cursor.
    fn execute_reader(&mut self, sql: &str, timeout: Option<Duration>)
    -> Result<Self::Cursor<'_>>;

    /// Execute a query and return the first column of the first row.
    fn execute_scalar(&mut self, sql: &str, timeout: Option<Duration>) -> Result<Value> {
        let mut cursor = self.execute_reader(sql, timeout)?;
        let value = if cursor.read()? {
            cursor.value(0)?
        } else {
            Value::Null
        };
        cursor.close()?;
        Ok(value)
    }

    /// Open a cursor over a metadata collection such as `Tables` or `Columns`.
    fn schema(&mut self, collection: &str) -> Result<Self::Cursor<'_>> {
        Err(Error::query(
            QueryErrorKind::Database,
            format!("schema collection {collection} is not supported by this driver"),
        ))
    }

    /// Deep copy of the driver-level state, not a shared handle.
    fn try_clone(&self) -> Result<Self>;

    /// Release the native handle.
    fn dispose(&mut self) -> Result<()>;
}

/// A forward-only result cursor.
///
/// Accessors address columns by zero-based ordinal and are only meaningful while
/// the cursor is positioned on a row.
pub trait DriverCursor {
    /// Advance to the next row. `false` once exhausted.
    fn read(&mut self) -> Result<bool>;

    /// Advance to the next result set of a batch.
    fn next_result(&mut self) -> Result<bool> {
        Ok(false)
    }

    fn close(&mut self) -> Result<()>;

    fn is_closed(&self) -> bool;

    fn has_rows(&self) -> bool;

    /// Nesting depth of the current row.
    fn depth(&self) -> usize {
        0
    }

    /// Rows changed by the statement, if it was not a query.
    fn records_affected(&self) -> Option<u64> {
        None
    }

    fn field_count(&self) -> usize;

    fn column(&self, ordinal: usize) -> Result<&ColumnInfo>;

    /// Raw value of a column on the current row.
    fn value(&self, ordinal: usize) -> Result<Value>;

    fn is_null(&self, ordinal: usize) -> Result<bool> {
        Ok(self.value(ordinal)?.is_null())
    }

    /// Typed getter. The default is a strict [`FromValue`] extraction.
    fn get<T: FromValue>(&self, ordinal: usize) -> Result<T>
    where
        Self: Sized,
    {
        T::from_value(&self.value(ordinal)?).map_err(|e| e.with_column(ordinal))
    }

    fn name(&self, ordinal: usize) -> Result<&str> {
        Ok(&self.column(ordinal)?.name)
    }

    fn data_type_name(&self, ordinal: usize) -> Result<&'static str> {
        Ok(self.column(ordinal)?.type_name())
    }

    fn field_type(&self, ordinal: usize) -> Result<SqlType> {
        Ok(self.column(ordinal)?.sql_type)
    }

    /// Metadata of every column in the current result set.
    fn schema_table(&self) -> Result<Vec<ColumnInfo>> {
        (0..self.field_count())
            .map(|i| self.column(i).cloned())
            .collect()
    }

    fn ordinal(&self, name: &str) -> Result<usize> {
        let mut columns = Vec::with_capacity(self.field_count());
        for i in 0..self.field_count() {
            columns.push(self.column(i)?);
        }
        find_ordinal(columns.iter().copied(), name).ok_or_else(|| {
            Error::query(QueryErrorKind::NoSuchColumn, format!("no column named {name}"))
        })
    }

    /// Copy bytes of a binary column starting at `data_offset` into `buffer`.
    ///
    /// Returns the number of bytes copied, which is zero past the end of the data.
    fn get_bytes(&self, ordinal: usize, data_offset: usize, buffer: &mut [u8]) -> Result<usize> {
        let bytes: Vec<u8> = self.value(ordinal).and_then(|v| match v {
            Value::Bytes(b) => Ok(b),
            other => Err(Error::type_mismatch("bytes", other.type_name()).with_column(ordinal)),
        })?;
        Ok(copy_from(&bytes, data_offset, buffer))
    }

    /// Copy characters of a text column starting at `data_offset` into `buffer`.
    fn get_chars(&self, ordinal: usize, data_offset: usize, buffer: &mut [char]) -> Result<usize> {
        let chars: Vec<char> = self.value(ordinal).and_then(|v| match v {
            Value::Text(s) => Ok(s.chars().collect()),
            Value::Utf16(units) => Ok(char::decode_utf16(units)
                .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                .collect()),
            other => Err(Error::type_mismatch("text", other.type_name()).with_column(ordinal)),
        })?;
        Ok(copy_from(&chars, data_offset, buffer))
    }
}

fn copy_from<T: Copy>(data: &[T], offset: usize, buffer: &mut [T]) -> usize {
    let Some(rest) = data.get(offset..) else {
        return 0;
    };
    let n = rest.len().min(buffer.len());
    buffer[..n].copy_from_slice(&rest[..n]);
    n
}

/// An open driver transaction.
pub trait DriverTransaction {
    /// Level the driver actually started the transaction at.
    fn isolation_level(&self) -> IsolationLevel;

    fn commit(self) -> Result<()>;

    fn rollback(self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolation_as_sql() {
        assert_eq!(IsolationLevel::ReadCommitted.as_sql(), "READ COMMITTED");
        assert_eq!(IsolationLevel::default(), IsolationLevel::Unspecified);
    }

    #[test]
    fn test_state_is_open() {
        assert!(ConnectionState::Open.is_open());
        assert!(ConnectionState::Fetching.is_open());
        assert!(!ConnectionState::Closed.is_open());
        assert!(!ConnectionState::Broken.is_open());
    }

    #[test]
    fn test_copy_from_offsets() {
        let data = [1u8, 2, 3, 4, 5];
        let mut buf = [0u8; 3];
        assert_eq!(copy_from(&data, 0, &mut buf), 3);
        assert_eq!(buf, [1, 2, 3]);
        assert_eq!(copy_from(&data, 3, &mut buf), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(copy_from(&data, 5, &mut buf), 0);
        assert_eq!(copy_from(&data, 9, &mut buf), 0);
    }
}
