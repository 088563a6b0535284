//! Declared column types of the Jet engine.

use serde::{Deserialize, Serialize};

/// Column types as declared in an Access database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Yes/No
    Bit,
    /// Byte
    Byte,
    /// Integer (16-bit)
    Short,
    /// Long Integer (32-bit)
    Long,
    /// Large Number (64-bit, ACE only)
    BigInt,
    /// AutoNumber
    Counter,
    /// Single
    Single,
    /// Double
    Double,
    /// Currency
    Currency,
    /// Decimal
    Decimal,
    /// Short Text
    Text,
    /// Long Text
    Memo,
    /// Binary
    Binary,
    /// OLE Object
    LongBinary,
    /// Date/Time
    DateTime,
    /// Replication ID
    Guid,
}

impl SqlType {
    /// Type name as the engine reports it in DDL.
    pub const fn jet_name(self) -> &'static str {
        match self {
            SqlType::Bit => "BIT",
            SqlType::Byte => "BYTE",
            SqlType::Short => "SMALLINT",
            SqlType::Long => "INTEGER",
            SqlType::BigInt => "BIGINT",
            SqlType::Counter => "COUNTER",
            SqlType::Single => "REAL",
            SqlType::Double => "FLOAT",
            SqlType::Currency => "CURRENCY",
            SqlType::Decimal => "DECIMAL",
            SqlType::Text => "VARCHAR",
            SqlType::Memo => "LONGTEXT",
            SqlType::Binary => "VARBINARY",
            SqlType::LongBinary => "LONGBINARY",
            SqlType::DateTime => "DATETIME",
            SqlType::Guid => "GUID",
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.jet_name())
    }
}
