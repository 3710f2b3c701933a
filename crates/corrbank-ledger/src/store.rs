//! The table store contract.
//!
//! Modeled on a chaincode-style state table: rows are ordered lists of typed
//! columns, the key is the subset of columns flagged `key` in the schema.
//! Insert succeeds only for a new key, replace only for an existing one.
//! There is no multi-row transaction.

use std::fmt;

use corrbank_types::Result;

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    String,
    Uint64,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "STRING"),
            Self::Uint64 => write!(f, "UINT64"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    pub column_type: ColumnType,
    /// Part of the primary key.
    pub key: bool,
}

impl ColumnDefinition {
    #[must_use]
    pub fn new(name: &str, column_type: ColumnType, key: bool) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

/// One typed cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    String(String),
    Uint64(u64),
}

impl Column {
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::String(_) => ColumnType::String,
            Self::Uint64(_) => ColumnType::Uint64,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Uint64(_) => None,
        }
    }

    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint64(v) => Some(*v),
            Self::String(_) => None,
        }
    }
}

/// A full row, columns in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub columns: Vec<Column>,
}

/// Row-level key/value table store.
///
/// Implementations provide single-row atomicity at most. Callers that
/// update several rows get no isolation between those updates.
pub trait TableStore {
    /// Create a table. Fails if a table with that name exists.
    fn create_table(&mut self, schema: TableSchema) -> Result<()>;

    /// Insert a row. Returns `Ok(false)` without writing if the key exists.
    fn insert_row(&mut self, table: &str, row: Row) -> Result<bool>;

    /// Overwrite a row. Returns `Ok(false)` without writing if the key is
    /// absent.
    fn replace_row(&mut self, table: &str, row: Row) -> Result<bool>;

    /// Fetch the row with the given key columns.
    fn get_row(&self, table: &str, key: &[Column]) -> Result<Option<Row>>;

    /// Delete the row with the given key columns. Returns whether a row was
    /// removed.
    fn delete_row(&mut self, table: &str, key: &[Column]) -> Result<bool>;

    /// All rows in key order.
    fn scan(&self, table: &str) -> Result<Vec<Row>>;
}
