//! Strongly-typed column name wrapper.

use crate::newtype_string::define_identifier;

define_identifier! {
    /// Strongly-typed wrapper for column names.
    ///
    /// Normalized to ASCII lowercase at construction, so merge identity and
    /// column-order lookups are case-insensitive regardless of which catalog
    /// the name came from.
    pub struct ColumnName;
}
