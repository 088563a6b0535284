//! Engine-wide adapter configuration.
//!
//! One `JetConfig` is built at startup, wrapped in an `Arc` and handed to every
//! connection and reader. Instances never observe a change mid-flight: to change a
//! setting, build a new config and new connections.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Dual table for `.mdb` (Jet 4) files.
pub const DUAL_FOR_MDB: &str = "(SELECT COUNT(*) FROM MSysRelationships)";

/// Dual table for `.accdb` (ACE) files.
pub const DUAL_FOR_ACCDB: &str = "(SELECT COUNT(*) FROM MSysAccessStorage)";

/// The base instant Jet uses to store time intervals as dates: 1899-12-30 00:00.
pub fn jet_epoch() -> NaiveDateTime {
    match NaiveDate::from_ymd_opt(1899, 12, 30) {
        Some(date) => date.and_time(NaiveTime::default()),
        None => {
            tracing::warn!("Jet epoch out of range; falling back to the Unix epoch");
            NaiveDateTime::default()
        }
    }
}

/// A single-row table expression.
///
/// Jet has no value-less `SELECT expr`, so scalar constructs are anchored on a table
/// that always has exactly one row. The system tables used by the presets may be
/// unreadable under some workgroup setups; in that case create a one-row table and
/// use [`DualTable::Custom`]:
///
/// ```sql
/// CREATE TABLE Dual (id COUNTER CONSTRAINT pkey PRIMARY KEY);
/// INSERT INTO Dual (id) VALUES (1);
/// ALTER TABLE Dual ADD CONSTRAINT DualTableConstraint CHECK ((SELECT Count(*) FROM Dual) = 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DualTable {
    #[default]
    Accdb,
    Mdb,
    /// Caller-supplied table name or expression.
    Custom(String),
}

impl DualTable {
    pub fn expression(&self) -> &str {
        match self {
            DualTable::Accdb => DUAL_FOR_ACCDB,
            DualTable::Mdb => DUAL_FOR_MDB,
            DualTable::Custom(table) => table,
        }
    }
}

/// Adapter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JetConfig {
    /// Single-row table used for scalar subqueries
    pub dual: DualTable,
    /// Integer standing in for NULL in mixed-type UNIONs; `None` disables the rule
    pub integer_null_value: Option<i32>,
    /// Append a random number to generated foreign key names
    pub append_random_number_for_foreign_key_names: bool,
    /// Echo every executed statement through the `jetmodel::sql` log target
    pub show_sql_statements: bool,
    /// Pretty-print echoed statements
    pub indent_sql_statements: bool,
    /// Base instant for interval <-> date conversion
    pub time_span_offset: NaiveDateTime,
    /// Decode raw date/time values to intervals in the generic value accessor
    pub decode_datetime_as_interval: bool,
}

impl Default for JetConfig {
    fn default() -> Self {
        Self {
            dual: DualTable::default(),
            integer_null_value: Some(i32::MIN),
            append_random_number_for_foreign_key_names: true,
            show_sql_statements: false,
            indent_sql_statements: true,
            time_span_offset: jet_epoch(),
            decode_datetime_as_interval: true,
        }
    }
}

impl JetConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dual table.
    pub fn dual(mut self, dual: DualTable) -> Self {
        self.dual = dual;
        self
    }

    /// Set or clear the integer null sentinel.
    pub fn integer_null_value(mut self, value: Option<i32>) -> Self {
        self.integer_null_value = value;
        self
    }

    pub fn append_random_number_for_foreign_key_names(mut self, enabled: bool) -> Self {
        self.append_random_number_for_foreign_key_names = enabled;
        self
    }

    pub fn show_sql_statements(mut self, enabled: bool) -> Self {
        self.show_sql_statements = enabled;
        self
    }

    pub fn indent_sql_statements(mut self, enabled: bool) -> Self {
        self.indent_sql_statements = enabled;
        self
    }

    /// Set the interval epoch.
    pub fn time_span_offset(mut self, offset: NaiveDateTime) -> Self {
        self.time_span_offset = offset;
        self
    }

    pub fn decode_datetime_as_interval(mut self, enabled: bool) -> Self {
        self.decode_datetime_as_interval = enabled;
        self
    }

    /// The active dual table expression.
    pub fn dual_expression(&self) -> &str {
        self.dual.expression()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).inspect_err(|e| {
            tracing::warn!(error = %e, "Invalid JetModel configuration");
        })?;
        tracing::debug!(
            dual = config.dual_expression(),
            show_sql = config.show_sql_statements,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
