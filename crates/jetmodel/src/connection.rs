//! Connection shim over a native Jet connection.
//!
//! `JetConnection` fills the gaps between what a data-access layer assumes and
//! what the engine provides:
//!
//! - `Serializable` transactions are started as `ReadCommitted`, the strongest
//!   level Jet honours.
//! - A single-row "dual" table expression is available from the configuration.
//! - [`JetConnection::table_exists`] probes for a table with a zero-row query.
//! - Empty command text is replaced by a newline, which the provider accepts.

use std::sync::Arc;
use std::time::Duration;

use jetmodel_core::{
    ConnectionErrorKind, ConnectionState, DriverConnection, Error, IsolationLevel, JetConfig,
    Result,
};

use crate::command::JetCommand;
use crate::reader::JetDataReader;
use crate::transaction::JetTransaction;

type DisposedObserver = Box<dyn FnOnce() + Send>;
type StateObserver = Box<dyn FnMut(ConnectionState, ConnectionState) + Send>;

/// The isolation level Jet will actually be asked for.
pub fn normalize_isolation_level(level: IsolationLevel) -> IsolationLevel {
    match level {
        IsolationLevel::Serializable => IsolationLevel::ReadCommitted,
        other => other,
    }
}

/// Connection shim. Owns exactly one driver connection.
pub struct JetConnection<C: DriverConnection> {
    pub(crate) inner: C,
    config: Arc<JetConfig>,
    disposed: bool,
    disposed_observers: Vec<DisposedObserver>,
    state_observers: Vec<StateObserver>,
}

impl<C: DriverConnection> JetConnection<C> {
    /// Wrap a driver connection.
    pub fn new(connection: C, config: Arc<JetConfig>) -> Self {
        Self {
            inner: connection,
            config,
            disposed: false,
            disposed_observers: Vec::new(),
            state_observers: Vec::new(),
        }
    }

    /// Wrap a driver connection and bind it to `connection_string`.
    pub fn with_connection_string(
        connection: C,
        config: Arc<JetConfig>,
        connection_string: &str,
    ) -> Result<Self> {
        let mut conn = Self::new(connection, config);
        conn.set_connection_string(connection_string)?;
        Ok(conn)
    }

    pub fn config(&self) -> &Arc<JetConfig> {
        &self.config
    }

    /// Single-row table expression for scalar subqueries.
    pub fn dual(&self) -> &str {
        self.config.dual_expression()
    }

    // ==================== Lifecycle ====================

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn open(&mut self) -> Result<()> {
        if self.disposed {
            return Err(Error::connection(
                ConnectionErrorKind::Disposed,
                "cannot open a disposed connection",
            ));
        }
        let before = self.inner.state();
        let result = self.inner.open();
        self.notify_state_change(before);
        result
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn close(&mut self) -> Result<()> {
        let before = self.inner.state();
        let result = self.inner.close();
        self.notify_state_change(before);
        result
    }

    /// Release the driver handle and notify disposal observers.
    ///
    /// Only the first call does anything. Observers run even when the driver
    /// reports an error, which is then returned.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;

        let before = self.inner.state();
        let result = self.inner.dispose();
        self.notify_state_change(before);

        for observer in self.disposed_observers.drain(..) {
            observer();
        }
        self.state_observers.clear();
        result
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Run `observer` once when this connection is disposed.
    pub fn on_disposed(&mut self, observer: impl FnOnce() + Send + 'static) {
        self.disposed_observers.push(Box::new(observer));
    }

    /// Run `observer` with `(previous, current)` whenever the driver state changes
    /// through this shim.
    pub fn on_state_change(
        &mut self,
        observer: impl FnMut(ConnectionState, ConnectionState) + Send + 'static,
    ) {
        self.state_observers.push(Box::new(observer));
    }

    fn notify_state_change(&mut self, before: ConnectionState) {
        let after = self.inner.state();
        if before == after {
            return;
        }
        tracing::debug!(from = ?before, to = ?after, "Connection state changed");
        for observer in &mut self.state_observers {
            observer(before, after);
        }
    }

    // ==================== Transactions ====================

    /// Begin a transaction at the driver's default isolation level.
    pub fn begin(&mut self) -> Result<JetTransaction<'_, C>> {
        self.begin_transaction(IsolationLevel::Unspecified)
    }

    /// Begin a transaction. `Serializable` is downgraded to `ReadCommitted`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn begin_transaction(&mut self, level: IsolationLevel) -> Result<JetTransaction<'_, C>> {
        let effective = normalize_isolation_level(level);
        if effective != level {
            tracing::debug!(
                requested = level.as_sql(),
                effective = effective.as_sql(),
                "Downgrading unsupported isolation level"
            );
        }
        let tx = self.inner.begin_transaction(effective)?;
        Ok(JetTransaction::new(tx, level, self))
    }

    // ==================== Commands ====================

    /// Create a command bound to this connection.
    pub fn create_command(&mut self, sql: &str, timeout: Option<Duration>) -> JetCommand<'_, C> {
        let text = if sql.is_empty() { "\n" } else { sql };
        let mut command = JetCommand::new(self, text);
        if let Some(timeout) = timeout {
            command.set_timeout(timeout);
        }
        command
    }

    /// Read a driver metadata collection such as `Tables`.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn schema(&mut self, collection: &str) -> Result<JetDataReader<C::Cursor<'_>>> {
        let config = Arc::clone(&self.config);
        let cursor = self.inner.schema(collection)?;
        Ok(JetDataReader::new(cursor, config))
    }

    /// Best-effort check that `table_name` exists.
    ///
    /// Runs `SELECT COUNT(*) FROM [table_name] WHERE 1=2`, opening the connection
    /// first if needed and closing it again afterwards. Any failure, including one
    /// unrelated to the table (permissions, a lost connection), reads as `false`.
    pub fn table_exists(&mut self, table_name: &str) -> bool {
        let was_closed = self.state() == ConnectionState::Closed;
        if was_closed {
            if let Err(e) = self.open() {
                tracing::debug!(table = table_name, error = %e, "Table probe could not open connection");
                return false;
            }
        }

        let sql = format!("SELECT COUNT(*) FROM [{table_name}] WHERE 1=2");
        let exists = match self.create_command(&sql, None).execute_non_query() {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(table = table_name, error = %e, "Table probe failed");
                false
            }
        };

        if was_closed {
            if let Err(e) = self.close() {
                tracing::warn!(table = table_name, error = %e, "Failed to close connection after table probe");
            }
        }

        exists
    }

    // ==================== Delegated properties ====================

    pub fn connection_string(&self) -> &str {
        self.inner.connection_string()
    }

    pub fn set_connection_string(&mut self, connection_string: &str) -> Result<()> {
        self.inner.set_connection_string(connection_string)
    }

    pub fn connection_timeout(&self) -> Duration {
        self.inner.connection_timeout()
    }

    pub fn database(&self) -> &str {
        self.inner.database()
    }

    pub fn data_source(&self) -> &str {
        self.inner.data_source()
    }

    pub fn server_version(&self) -> Result<String> {
        self.inner.server_version()
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state()
    }

    pub fn change_database(&mut self, database: &str) -> Result<()> {
        self.inner.change_database(database)
    }

    /// The wrapped driver connection.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// A new shim over an independent copy of the driver connection.
    ///
    /// Shares the configuration; observers are not copied.
    pub fn try_clone(&self) -> Result<Self> {
        Ok(Self::new(self.inner.try_clone()?, Arc::clone(&self.config)))
    }
}

impl<C: DriverConnection> Drop for JetConnection<C> {
    fn drop(&mut self) {
        if let Err(e) = self.dispose() {
            tracing::warn!(error = %e, "Failed to dispose connection on drop");
        }
    }
}

impl<C: DriverConnection> std::fmt::Debug for JetConnection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JetConnection")
            .field("data_source", &self.inner.data_source())
            .field("state", &self.inner.state())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}
