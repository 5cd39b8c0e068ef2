//! Strongly-typed table name wrapper.

use crate::newtype_string::define_identifier;

define_identifier! {
    /// Strongly-typed wrapper for table names.
    ///
    /// Prevents accidental mixing of table names with column names or other
    /// string types. Normalized to ASCII lowercase at construction so names
    /// coming from differently-cased database catalogs compare equal.
    pub struct TableName;
}
