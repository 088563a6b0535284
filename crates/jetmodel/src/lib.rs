//! Access/Jet compatibility adapter for JetModel Rust.
//!
//! `jetmodel` sits between a data-access layer and a native Jet driver and papers
//! over the places where the engine or its driver does not behave like the layer
//! expects.
//!
//! # What It Provides
//!
//! - **Connection shim**: [`JetConnection`] downgrades unsupported isolation levels,
//!   exposes a single-row "dual" table, probes for table existence and tolerates
//!   empty command text.
//! - **Paging reader**: [`JetDataReader`] emulates `OFFSET`/`LIMIT` on the client by
//!   skipping rows up front and capping how many are read.
//! - **Coercion policy**: [`coerce`] recovers booleans stored as 16-bit integers,
//!   integers boxed as strings, GUIDs returned as bytes and intervals stored as
//!   dates.
//!
//! # Example
//!
//! ```ignore
//! let config = Arc::new(JetConfig::default().show_sql_statements(true));
//! let mut conn = JetConnection::with_connection_string(driver, config, "Data Source=school.accdb")?;
//! conn.open()?;
//!
//! let tx = conn.begin_transaction(IsolationLevel::Serializable)?; // runs as ReadCommitted
//! tx.commit()?;
//!
//! let mut reader = conn
//!     .create_command("SELECT Id, Name FROM Students ORDER BY Id", None)
//!     .execute_paged_reader(10, 5)?;
//! while reader.read()? {
//!     println!("{} {}", reader.get_int32(0)?, reader.get_string(1)?);
//! }
//! ```

pub mod coerce;
pub mod command;
pub mod connection;
pub mod naming;
pub mod reader;
pub mod sql_format;
pub mod transaction;
pub mod util;

pub use command::JetCommand;
pub use connection::{JetConnection, normalize_isolation_level};
pub use reader::JetDataReader;
pub use transaction::JetTransaction;

pub use jetmodel_core::{
    ColumnInfo, ConnectionError, ConnectionErrorKind, ConnectionState, DriverConnection,
    DriverCursor, DriverTransaction, DualTable, Error, FromValue, IsolationLevel, JetConfig,
    QueryError, QueryErrorKind, Result, SqlType, TypeError, Value, jet_epoch,
};
