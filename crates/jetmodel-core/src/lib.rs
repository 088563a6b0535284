//! Core types and traits for JetModel Rust.
//!
//! `jetmodel-core` is the **contract layer** between the Access/Jet adapter and the
//! native driver it wraps. It defines the traits a driver implements and the data
//! types the adapter and its consumers exchange.
//!
//! # Role In The Architecture
//!
//! - **Driver contract**: `DriverConnection`, `DriverCursor` and `DriverTransaction`
//!   are the capability interfaces the adapter composes over.
//! - **Data model**: `Value` is the tagged union of raw representations the driver can
//!   emit; `ColumnInfo` and `SqlType` describe result columns.
//! - **Configuration**: `JetConfig` carries the engine settings (dual table, integer
//!   null sentinel, interval epoch, SQL echo flags) that are threaded into every
//!   connection and reader.
//!
//! # Who Uses This Crate
//!
//! - `jetmodel` builds `JetConnection` and `JetDataReader` on top of these traits.
//! - Driver crates implement `DriverConnection` and `DriverCursor` and produce `Value`s.

pub mod config;
pub mod connection;
pub mod error;
pub mod row;
pub mod types;
pub mod value;

pub use config::{DualTable, JetConfig, jet_epoch};
pub use connection::{
    ConnectionState, DriverConnection, DriverCursor, DriverTransaction, IsolationLevel,
};
pub use error::{
    ConnectionError, ConnectionErrorKind, Error, QueryError, QueryErrorKind, Result, TypeError,
};
pub use row::ColumnInfo;
pub use types::SqlType;
pub use value::{FromValue, Value};
