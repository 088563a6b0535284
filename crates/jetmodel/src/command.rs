//! Commands bound to a [`JetConnection`].

use std::sync::Arc;
use std::time::Duration;

use jetmodel_core::{DriverConnection, Result, Value};

use crate::connection::JetConnection;
use crate::reader::JetDataReader;
use crate::sql_format;

/// SQL text plus the connection it will run on.
pub struct JetCommand<'conn, C: DriverConnection> {
    connection: &'conn mut JetConnection<C>,
    text: String,
    timeout: Option<Duration>,
}

impl<'conn, C: DriverConnection> JetCommand<'conn, C> {
    pub(crate) fn new(connection: &'conn mut JetConnection<C>, text: &str) -> Self {
        Self {
            connection,
            text: text.to_string(),
            timeout: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }

    /// Execute a statement and return the number of rows affected.
    pub fn execute_non_query(&mut self) -> Result<u64> {
        self.echo();
        self.connection
            .inner
            .execute_non_query(&self.text, self.timeout)
    }

    /// Execute a query and return the first column of its first row.
    pub fn execute_scalar(&mut self) -> Result<Value> {
        self.echo();
        self.connection.inner.execute_scalar(&self.text, self.timeout)
    }

    /// Execute a query and wrap its cursor.
    pub fn execute_reader(self) -> Result<JetDataReader<C::Cursor<'conn>>> {
        self.echo();
        let Self {
            connection,
            text,
            timeout,
        } = self;
        let config = Arc::clone(connection.config());
        let cursor = connection.inner.execute_reader(&text, timeout)?;
        Ok(JetDataReader::new(cursor, config))
    }

    /// Execute a query, skipping `skip` rows and returning at most `top` (`0` for
    /// all remaining).
    pub fn execute_paged_reader(
        self,
        skip: usize,
        top: usize,
    ) -> Result<JetDataReader<C::Cursor<'conn>>> {
        self.echo();
        let Self {
            connection,
            text,
            timeout,
        } = self;
        let config = Arc::clone(connection.config());
        let cursor = connection.inner.execute_reader(&text, timeout)?;
        JetDataReader::with_paging(cursor, config, skip, top)
    }

    fn echo(&self) {
        let config = self.connection.config();
        if !config.show_sql_statements {
            return;
        }
        if config.indent_sql_statements {
            let formatted = sql_format::indent(&self.text);
            tracing::info!(target: "jetmodel::sql", sql = %formatted, "Executing statement");
        } else {
            tracing::info!(target: "jetmodel::sql", sql = %self.text, "Executing statement");
        }
    }
}

impl<C: DriverConnection> std::fmt::Debug for JetCommand<'_, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JetCommand")
            .field("text", &self.text)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
