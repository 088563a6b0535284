//! In-memory driver for adapter tests.
//!
//! `MemoryConnection` understands just enough SQL to find the table named after
//! `FROM` and return all of its rows. Everything the adapter asks of it is recorded
//! in a shared [`Calls`] recorder.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jetmodel::{
    ColumnInfo, ConnectionErrorKind, ConnectionState, DriverConnection, DriverCursor,
    DriverTransaction, Error, IsolationLevel, QueryErrorKind, Result, SqlType, Value,
};

/// Calls observed by the driver.
#[derive(Debug, Default)]
pub struct Calls {
    pub executed: Mutex<Vec<String>>,
    pub begun: Mutex<Vec<IsolationLevel>>,
    pub cursor_reads: AtomicUsize,
    pub commits: AtomicUsize,
    pub rollbacks: AtomicUsize,
    pub disposals: AtomicUsize,
}

impl Calls {
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn begun(&self) -> Vec<IsolationLevel> {
        self.begun.lock().unwrap().clone()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<ColumnInfo>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<ColumnInfo>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, values: Vec<Value>) -> Self {
        self.rows.push(values);
        self
    }
}

/// `Numbers(N INTEGER)` holding `1..=count`.
pub fn numbers(count: i32) -> Table {
    (1..=count).fold(
        Table::new(vec![ColumnInfo::new("N", SqlType::Long)]),
        |table, n| table.row(vec![Value::Int(n)]),
    )
}

#[derive(Debug)]
pub struct MemoryConnection {
    connection_string: String,
    state: ConnectionState,
    tables: HashMap<String, Table>,
    catalog: Table,
    fail_dispose: bool,
    pub calls: Arc<Calls>,
}

impl MemoryConnection {
    pub fn new(connection_string: &str) -> Self {
        Self {
            connection_string: connection_string.to_string(),
            state: ConnectionState::Closed,
            tables: HashMap::new(),
            catalog: Table::new(vec![ColumnInfo::new("TABLE_NAME", SqlType::Text)]),
            fail_dispose: false,
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn with_table(mut self, name: &str, table: Table) -> Self {
        self.tables.insert(name.to_ascii_lowercase(), table);
        self.catalog.rows.push(vec![Value::Text(name.to_string())]);
        self
    }

    /// Make `dispose` release the handle but report an error.
    pub fn failing_dispose(mut self) -> Self {
        self.fail_dispose = true;
        self
    }

    fn require_open(&self) -> Result<()> {
        if self.state.is_open() {
            Ok(())
        } else {
            Err(Error::connection(
                ConnectionErrorKind::NotOpen,
                "connection is not open",
            ))
        }
    }

    fn lookup(&self, sql: &str) -> Result<&Table> {
        self.calls.executed.lock().unwrap().push(sql.to_string());
        self.require_open()?;

        let upper = sql.to_ascii_uppercase();
        let Some(at) = upper.find("FROM ") else {
            return Err(Error::query(QueryErrorKind::Syntax, "missing FROM clause"));
        };
        let name = sql[at + 5..]
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .trim_matches(|c| c == '[' || c == ']');
        self.tables
            .get(&name.to_ascii_lowercase())
            .ok_or_else(|| {
                Error::query(
                    QueryErrorKind::NoSuchTable,
                    format!("The Microsoft Access database engine cannot find the input table or query '{name}'"),
                )
            })
    }
}

impl DriverConnection for MemoryConnection {
    type Cursor<'conn> = MemoryCursor<'conn>;
    type Transaction = MemoryTransaction;

    fn connection_string(&self) -> &str {
        &self.connection_string
    }

    fn set_connection_string(&mut self, connection_string: &str) -> Result<()> {
        if self.state.is_open() {
            return Err(Error::connection(
                ConnectionErrorKind::Connect,
                "cannot change the connection string of an open connection",
            ));
        }
        self.connection_string = connection_string.to_string();
        Ok(())
    }

    fn database(&self) -> &str {
        ""
    }

    fn data_source(&self) -> &str {
        self.connection_string
            .split(';')
            .find_map(|part| part.trim().strip_prefix("Data Source="))
            .unwrap_or_default()
    }

    fn server_version(&self) -> Result<String> {
        self.require_open()?;
        Ok("12.0.0000".to_string())
    }

    fn state(&self) -> ConnectionState {
        self.state
    }

    fn open(&mut self) -> Result<()> {
        if self.data_source().is_empty() {
            return Err(Error::connection(
                ConnectionErrorKind::Connect,
                "no data source in connection string",
            ));
        }
        self.state = ConnectionState::Open;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state = ConnectionState::Closed;
        Ok(())
    }

    fn change_database(&mut self, _database: &str) -> Result<()> {
        Err(Error::connection(
            ConnectionErrorKind::Connect,
            "Jet does not support changing databases",
        ))
    }

    fn begin_transaction(&mut self, level: IsolationLevel) -> Result<MemoryTransaction> {
        self.require_open()?;
        self.calls.begun.lock().unwrap().push(level);
        Ok(MemoryTransaction {
            level,
            calls: Arc::clone(&self.calls),
        })
    }

    fn execute_non_query(&mut self, sql: &str, _timeout: Option<Duration>) -> Result<u64> {
        self.lookup(sql)?;
        Ok(0)
    }

    fn execute_reader(
        &mut self,
        sql: &str,
        _timeout: Option<Duration>,
    ) -> Result<MemoryCursor<'_>> {
        let table = self.lookup(sql)?;
        Ok(MemoryCursor {
            table,
            position: None,
            closed: false,
            calls: &self.calls,
        })
    }

    fn try_clone(&self) -> Result<Self> {
        Ok(Self {
            connection_string: self.connection_string.clone(),
            state: ConnectionState::Closed,
            tables: self.tables.clone(),
            catalog: self.catalog.clone(),
            fail_dispose: self.fail_dispose,
            calls: Arc::new(Calls::default()),
        })
    }

    fn dispose(&mut self) -> Result<()> {
        self.state = ConnectionState::Closed;
        self.calls.disposals.fetch_add(1, Ordering::SeqCst);
        if self.fail_dispose {
            return Err(Error::connection(
                ConnectionErrorKind::Disconnected,
                "native handle already released",
            ));
        }
        Ok(())
    }

    fn schema(&mut self, collection: &str) -> Result<MemoryCursor<'_>> {
        self.require_open()?;
        if !collection.eq_ignore_ascii_case("Tables") {
            return Err(Error::query(
                QueryErrorKind::Database,
                format!("unknown schema collection {collection}"),
            ));
        }
        Ok(MemoryCursor {
            table: &self.catalog,
            position: None,
            closed: false,
            calls: &self.calls,
        })
    }
}

#[derive(Debug)]
pub struct MemoryCursor<'conn> {
    table: &'conn Table,
    position: Option<usize>,
    closed: bool,
    calls: &'conn Calls,
}

impl MemoryCursor<'_> {
    fn current(&self) -> Result<&[Value]> {
        self.position
            .and_then(|p| self.table.rows.get(p))
            .map(Vec::as_slice)
            .ok_or_else(|| Error::query(QueryErrorKind::InvalidState, "no current row"))
    }
}

impl DriverCursor for MemoryCursor<'_> {
    fn read(&mut self) -> Result<bool> {
        if self.closed {
            return Err(Error::query(QueryErrorKind::InvalidState, "reader is closed"));
        }
        self.calls.cursor_reads.fetch_add(1, Ordering::SeqCst);
        let next = self.position.map_or(0, |p| p + 1);
        self.position = Some(next.min(self.table.rows.len()));
        Ok(next < self.table.rows.len())
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn has_rows(&self) -> bool {
        !self.table.rows.is_empty()
    }

    fn field_count(&self) -> usize {
        self.table.columns.len()
    }

    fn column(&self, ordinal: usize) -> Result<&ColumnInfo> {
        self.table.columns.get(ordinal).ok_or_else(|| {
            Error::query(
                QueryErrorKind::NoSuchColumn,
                format!("column {ordinal} out of range"),
            )
        })
    }

    fn value(&self, ordinal: usize) -> Result<Value> {
        self.current()?.get(ordinal).cloned().ok_or_else(|| {
            Error::query(
                QueryErrorKind::NoSuchColumn,
                format!("column {ordinal} out of range"),
            )
        })
    }
}

#[derive(Debug)]
pub struct MemoryTransaction {
    level: IsolationLevel,
    calls: Arc<Calls>,
}

impl DriverTransaction for MemoryTransaction {
    fn isolation_level(&self) -> IsolationLevel {
        self.level
    }

    fn commit(self) -> Result<()> {
        self.calls.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.calls.rollbacks.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
