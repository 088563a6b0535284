//! Coercion rules between raw Jet values and the types consumers expect.
//!
//! Every rule looks at the runtime shape of the raw value, never at the requested
//! destination type, and every match is total: an unexpected shape is a
//! [`TypeError`](jetmodel_core::TypeError), not a default.
//!
//! | Consumer type | Raw shape handled here |
//! |---|---|
//! | boolean | `Bool`, or `SmallInt` (nonzero is true) |
//! | 32-bit integer | `Utf16` or `Text` holding the integer's bytes as two UTF-16 code units |
//! | GUID | `Bytes` in Windows GUID layout |
//! | interval | `DateTime` offset from the epoch (1899-12-30) |
//! | NULL | `Int` equal to the configured sentinel |

use chrono::{NaiveDateTime, TimeDelta};
use jetmodel_core::{Error, JetConfig, Result, Value};
use uuid::Uuid;

/// Read a boolean from a Yes/No column.
///
/// Some Jet boolean expressions come back as 16-bit integers.
pub fn boolean(raw: &Value) -> Result<bool> {
    match raw {
        Value::Bool(b) => Ok(*b),
        Value::SmallInt(n) => Ok(*n != 0),
        other => Err(Error::type_mismatch("boolean", other.type_name())),
    }
}

/// The boolean as the engine stores it in integer positions.
pub fn encode_boolean(value: bool) -> Value {
    Value::SmallInt(i16::from(value))
}

/// Recover an integer the driver boxed as a string.
///
/// The OLE DB provider sometimes returns a Long Integer as a two-character string
/// whose UTF-16 code units are the integer's little-endian bytes. Units past the
/// second are ignored. Either unit may be a lone surrogate, so this works on the
/// raw units rather than on a `str`.
pub fn int32_from_text(units: &[u16]) -> Result<i32> {
    let [low, high, ..] = units else {
        return Err(Error::type_mismatch("int", format!("utf16[{}]", units.len())));
    };
    let [b0, b1] = low.to_le_bytes();
    let [b2, b3] = high.to_le_bytes();
    Ok(i32::from_le_bytes([b0, b1, b2, b3]))
}

/// [`int32_from_text`] for a driver that already produced a Rust string.
pub fn int32_from_str(text: &str) -> Result<i32> {
    let units: Vec<u16> = text.encode_utf16().take(2).collect();
    int32_from_text(&units).map_err(|_| Error::type_mismatch("int", "text"))
}

/// Reproduce the driver's string boxing of `value` as UTF-16 code units.
pub fn int32_to_text(value: i32) -> Vec<u16> {
    let [b0, b1, b2, b3] = value.to_le_bytes();
    vec![u16::from_le_bytes([b0, b1]), u16::from_le_bytes([b2, b3])]
}

/// Build a GUID from the 16 bytes of a binary column.
///
/// The bytes are in the Windows `GUID` struct layout: the first three groups are
/// little-endian.
pub fn guid_from_bytes(bytes: &[u8]) -> Result<Uuid> {
    let bytes: [u8; 16] = bytes
        .try_into()
        .map_err(|_| Error::type_mismatch("guid", format!("bytes[{}]", bytes.len())))?;
    Ok(Uuid::from_bytes_le(bytes))
}

pub fn guid_to_bytes(guid: Uuid) -> Vec<u8> {
    guid.to_bytes_le().to_vec()
}

/// Decode an interval stored as a date relative to `epoch`.
pub fn interval(stamp: NaiveDateTime, epoch: NaiveDateTime) -> TimeDelta {
    stamp.signed_duration_since(epoch)
}

/// Encode an interval as the date Jet stores for it.
pub fn encode_interval(interval: TimeDelta, epoch: NaiveDateTime) -> Result<NaiveDateTime> {
    epoch
        .checked_add_signed(interval)
        .ok_or_else(|| Error::type_mismatch("datetime", "timespan"))
}

/// Apply the generic-accessor rule: raw date/time values become intervals.
pub fn decode_value(raw: Value, config: &JetConfig) -> Value {
    match raw {
        Value::DateTime(stamp) if config.decode_datetime_as_interval => {
            Value::TimeSpan(interval(stamp, config.time_span_offset))
        }
        other => other,
    }
}

/// True if `raw` is the integer standing in for NULL.
pub fn is_null_sentinel(raw: &Value, sentinel: Option<i32>) -> bool {
    match (raw, sentinel) {
        (Value::Int(v), Some(s)) => *v == s,
        _ => false,
    }
}

/// Encode a nullable integer for a position where the engine cannot take NULL.
pub fn encode_nullable_int32(value: Option<i32>, sentinel: Option<i32>) -> Value {
    match (value, sentinel) {
        (Some(v), _) => Value::Int(v),
        (None, Some(s)) => Value::Int(s),
        (None, None) => Value::Null,
    }
}
