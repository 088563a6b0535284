//! Reader diagnostics.

use jetmodel_core::{DriverCursor, Result};

use crate::reader::JetDataReader;

/// Advance `reader` to its end and return how many rows it yielded.
pub fn count_rows<R: DriverCursor>(reader: &mut JetDataReader<R>) -> Result<usize> {
    let mut count = 0;
    while reader.read()? {
        count += 1;
    }
    Ok(count)
}

/// Dump the remaining rows of `reader` as tab-separated text, header first.
///
/// Nulls (including the integer sentinel) print as `NULL`.
pub fn render_tab_separated<R: DriverCursor>(reader: &mut JetDataReader<R>) -> Result<String> {
    let mut out = String::new();
    let fields = reader.field_count();

    for ordinal in 0..fields {
        if ordinal > 0 {
            out.push('\t');
        }
        out.push_str(reader.name(ordinal)?);
    }
    out.push('\n');

    while reader.read()? {
        for ordinal in 0..fields {
            if ordinal > 0 {
                out.push('\t');
            }
            if reader.is_null(ordinal)? {
                out.push_str("NULL");
            } else {
                out.push_str(&reader.get_value(ordinal)?.to_string());
            }
        }
        out.push('\n');
    }

    Ok(out)
}
