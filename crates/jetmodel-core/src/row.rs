//! Result column metadata.

use crate::types::SqlType;

/// Name and declared type of one result column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub sql_type: SqlType,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            name: name.into(),
            sql_type,
        }
    }

    /// Declared type name, e.g. `INTEGER`.
    pub fn type_name(&self) -> &'static str {
        self.sql_type.jet_name()
    }
}

/// Find the ordinal of `name` among `columns`.
///
/// An exact match wins; otherwise the first case-insensitive match is used, since
/// Jet identifiers are case-insensitive.
pub fn find_ordinal<'a, I>(columns: I, name: &str) -> Option<usize>
where
    I: IntoIterator<Item = &'a ColumnInfo>,
    I::IntoIter: Clone,
{
    let iter = columns.into_iter();
    iter.clone()
        .position(|c| c.name == name)
        .or_else(|| iter.clone().position(|c| c.name.eq_ignore_ascii_case(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ordinal_prefers_exact_match() {
        let cols = [
            ColumnInfo::new("NAME", SqlType::Text),
            ColumnInfo::new("name", SqlType::Text),
        ];
        assert_eq!(find_ordinal(&cols, "name"), Some(1));
        assert_eq!(find_ordinal(&cols, "Name"), Some(0));
        assert_eq!(find_ordinal(&cols, "missing"), None);
    }

    #[test]
    fn test_type_name() {
        assert_eq!(ColumnInfo::new("id", SqlType::Counter).type_name(), "COUNTER");
    }
}
