//! Paging, coercing wrapper over a driver cursor.
//!
//! Jet SQL has no `OFFSET`/`LIMIT`. A query that needs paging is issued without it
//! and wrapped here: `skip` rows are consumed while the reader is built and `top`
//! caps how many rows the caller sees. Once the cap is hit `read` keeps answering
//! `false` without asking the driver again.
//!
//! ```ignore
//! let mut reader = connection
//!     .create_command("SELECT Id, Active FROM Students ORDER BY Id", None)
//!     .execute_paged_reader(20, 10)?;
//! while reader.read()? {
//!     let id = reader.get_int32(0)?;
//!     let active = reader.get_boolean(1)?;
//! }
//! reader.close()?;
//! ```

use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use jetmodel_core::{ColumnInfo, DriverCursor, JetConfig, Result, SqlType, Value};
use uuid::Uuid;

use crate::coerce;

/// Result cursor adapter.
///
/// Owns exactly one driver cursor for its whole life.
pub struct JetDataReader<R: DriverCursor> {
    inner: R,
    config: Arc<JetConfig>,
    /// Row cap, `0` for none
    top_count: usize,
    /// Calls to `read` so far
    read_count: usize,
}

impl<R: DriverCursor> JetDataReader<R> {
    /// Wrap a cursor without paging.
    pub fn new(cursor: R, config: Arc<JetConfig>) -> Self {
        Self {
            inner: cursor,
            config,
            top_count: 0,
            read_count: 0,
        }
    }

    /// Wrap a cursor, skipping its first `skip` rows and capping at `top` rows.
    ///
    /// Skipping past the end of the cursor is not an error; the reader then simply
    /// yields nothing.
    pub fn with_paging(
        mut cursor: R,
        config: Arc<JetConfig>,
        skip: usize,
        top: usize,
    ) -> Result<Self> {
        let mut skipped = 0;
        while skipped < skip && cursor.read()? {
            skipped += 1;
        }
        tracing::trace!(skip, skipped, top, "Emulated row paging");
        Ok(Self {
            inner: cursor,
            config,
            top_count: top,
            read_count: 0,
        })
    }

    /// Advance to the next row.
    pub fn read(&mut self) -> Result<bool> {
        self.read_count = self.read_count.saturating_add(1);
        if self.top_count != 0 && self.read_count > self.top_count {
            return Ok(false);
        }
        self.inner.read()
    }

    /// Number of `read` calls made so far, including the one that reported the end.
    pub fn rows_read(&self) -> usize {
        self.read_count
    }

    pub fn top_count(&self) -> usize {
        self.top_count
    }

    pub fn next_result(&mut self) -> Result<bool> {
        self.inner.next_result()
    }

    pub fn close(&mut self) -> Result<()> {
        if self.inner.is_closed() {
            return Ok(());
        }
        self.inner.close()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn has_rows(&self) -> bool {
        self.inner.has_rows()
    }

    pub fn depth(&self) -> usize {
        self.inner.depth()
    }

    pub fn records_affected(&self) -> Option<u64> {
        self.inner.records_affected()
    }

    pub fn field_count(&self) -> usize {
        self.inner.field_count()
    }

    pub fn name(&self, ordinal: usize) -> Result<&str> {
        self.inner.name(ordinal)
    }

    pub fn ordinal(&self, name: &str) -> Result<usize> {
        self.inner.ordinal(name)
    }

    pub fn data_type_name(&self, ordinal: usize) -> Result<&'static str> {
        self.inner.data_type_name(ordinal)
    }

    pub fn field_type(&self, ordinal: usize) -> Result<SqlType> {
        self.inner.field_type(ordinal)
    }

    /// Metadata of every column in the current result set.
    pub fn schema_table(&self) -> Result<Vec<ColumnInfo>> {
        self.inner.schema_table()
    }

    // ==================== Coercing accessors ====================

    /// Read a Yes/No column that may arrive as a 16-bit integer.
    pub fn get_boolean(&self, ordinal: usize) -> Result<bool> {
        let raw = self.inner.value(ordinal)?;
        coerce::boolean(&raw).map_err(|e| e.with_column(ordinal))
    }

    /// Read a Long Integer, undoing the driver's string boxing when present.
    pub fn get_int32(&self, ordinal: usize) -> Result<i32> {
        match self.inner.value(ordinal)? {
            Value::Utf16(units) => {
                coerce::int32_from_text(&units).map_err(|e| e.with_column(ordinal))
            }
            Value::Text(text) => coerce::int32_from_str(&text).map_err(|e| e.with_column(ordinal)),
            _ => self.inner.get(ordinal),
        }
    }

    /// Read a Replication ID, which may arrive as raw bytes.
    pub fn get_guid(&self, ordinal: usize) -> Result<Uuid> {
        match self.inner.value(ordinal)? {
            Value::Bytes(bytes) => {
                coerce::guid_from_bytes(&bytes).map_err(|e| e.with_column(ordinal))
            }
            _ => self.inner.get(ordinal),
        }
    }

    /// The column value, with date/time stamps decoded to intervals.
    pub fn get_value(&self, ordinal: usize) -> Result<Value> {
        let raw = self.inner.value(ordinal)?;
        Ok(coerce::decode_value(raw, &self.config))
    }

    /// Read an interval stored as a date relative to the configured epoch.
    pub fn get_time_span(&self, ordinal: usize) -> Result<TimeDelta> {
        let stamp = self.get_date_time(ordinal)?;
        Ok(coerce::interval(stamp, self.config.time_span_offset))
    }

    /// True for a driver NULL or for the configured integer null sentinel.
    pub fn is_null(&self, ordinal: usize) -> Result<bool> {
        if self.inner.is_null(ordinal)? {
            return Ok(true);
        }
        let Some(sentinel) = self.config.integer_null_value else {
            return Ok(false);
        };
        let raw = self.inner.value(ordinal)?;
        Ok(coerce::is_null_sentinel(&raw, Some(sentinel)))
    }

    /// Fill `values` with the current row, returning how many were written.
    pub fn get_values(&self, values: &mut [Value]) -> Result<usize> {
        let n = values.len().min(self.field_count());
        for (ordinal, slot) in values.iter_mut().take(n).enumerate() {
            *slot = self.get_value(ordinal)?;
        }
        Ok(n)
    }

    /// Column value by name.
    pub fn get_by_name(&self, name: &str) -> Result<Value> {
        let ordinal = self.ordinal(name)?;
        self.get_value(ordinal)
    }

    // ==================== Delegated accessors ====================

    pub fn get_byte(&self, ordinal: usize) -> Result<u8> {
        self.inner.get(ordinal)
    }

    pub fn get_int16(&self, ordinal: usize) -> Result<i16> {
        self.inner.get(ordinal)
    }

    pub fn get_int64(&self, ordinal: usize) -> Result<i64> {
        self.inner.get(ordinal)
    }

    pub fn get_float(&self, ordinal: usize) -> Result<f32> {
        self.inner.get(ordinal)
    }

    pub fn get_double(&self, ordinal: usize) -> Result<f64> {
        self.inner.get(ordinal)
    }

    /// Decimal or Currency in canonical text form.
    pub fn get_decimal(&self, ordinal: usize) -> Result<String> {
        match self.inner.value(ordinal)? {
            Value::Decimal(s) => Ok(s),
            other => Err(jetmodel_core::Error::type_mismatch("decimal", other.type_name())
                .with_column(ordinal)),
        }
    }

    pub fn get_string(&self, ordinal: usize) -> Result<String> {
        self.inner.get(ordinal)
    }

    pub fn get_char(&self, ordinal: usize) -> Result<char> {
        self.inner.get(ordinal)
    }

    pub fn get_date_time(&self, ordinal: usize) -> Result<NaiveDateTime> {
        self.inner.get(ordinal)
    }

    pub fn get_bytes(&self, ordinal: usize, data_offset: usize, buffer: &mut [u8]) -> Result<usize> {
        self.inner.get_bytes(ordinal, data_offset, buffer)
    }

    pub fn get_chars(
        &self,
        ordinal: usize,
        data_offset: usize,
        buffer: &mut [char],
    ) -> Result<usize> {
        self.inner.get_chars(ordinal, data_offset, buffer)
    }

    /// The wrapped driver cursor.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Give up the adapter and return the driver cursor.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: DriverCursor> std::fmt::Debug for JetDataReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JetDataReader")
            .field("top_count", &self.top_count)
            .field("read_count", &self.read_count)
            .field("closed", &self.inner.is_closed())
            .finish_non_exhaustive()
    }
}
