//! In-process [`TableStore`] backed by ordered maps.

use std::collections::{BTreeMap, HashMap};

use corrbank_types::{CorrbankError, Result};

use crate::store::{Column, Row, TableSchema, TableStore};

struct MemoryTable {
    schema: TableSchema,
    rows: BTreeMap<Vec<Column>, Row>,
}

impl MemoryTable {
    /// Check the row against the schema and extract its key.
    fn key_of(&self, row: &Row) -> Result<Vec<Column>> {
        let defs = &self.schema.columns;
        if row.columns.len() != defs.len() {
            return Err(CorrbankError::Storage(format!(
                "table {}: row has {} columns, schema has {}",
                self.schema.name,
                row.columns.len(),
                defs.len()
            )));
        }
        for (def, col) in defs.iter().zip(&row.columns) {
            if def.column_type != col.column_type() {
                return Err(CorrbankError::Storage(format!(
                    "table {}: column {} expects {}, got {}",
                    self.schema.name,
                    def.name,
                    def.column_type,
                    col.column_type()
                )));
            }
        }
        Ok(defs
            .iter()
            .zip(&row.columns)
            .filter(|(def, _)| def.key)
            .map(|(_, col)| col.clone())
            .collect())
    }
}

/// Reference table store. Not thread-safe; wrap it if it must be shared.
#[derive(Default)]
pub struct MemoryTableStore {
    tables: HashMap<String, MemoryTable>,
}

impl MemoryTableStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in `table`, or `None` if the table does not exist.
    #[must_use]
    pub fn row_count(&self, table: &str) -> Option<usize> {
        self.tables.get(table).map(|t| t.rows.len())
    }

    fn table(&self, name: &str) -> Result<&MemoryTable> {
        self.tables
            .get(name)
            .ok_or_else(|| CorrbankError::Storage(format!("table {name} does not exist")))
    }

    fn table_mut(&mut self, name: &str) -> Result<&mut MemoryTable> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| CorrbankError::Storage(format!("table {name} does not exist")))
    }
}

impl TableStore for MemoryTableStore {
    fn create_table(&mut self, schema: TableSchema) -> Result<()> {
        if self.tables.contains_key(&schema.name) {
            return Err(CorrbankError::Storage(format!(
                "table {} already exists",
                schema.name
            )));
        }
        if !schema.columns.iter().any(|c| c.key) {
            return Err(CorrbankError::Storage(format!(
                "table {} has no key column",
                schema.name
            )));
        }
        self.tables.insert(
            schema.name.clone(),
            MemoryTable {
                schema,
                rows: BTreeMap::new(),
            },
        );
        Ok(())
    }

    fn insert_row(&mut self, table: &str, row: Row) -> Result<bool> {
        let table = self.table_mut(table)?;
        let key = table.key_of(&row)?;
        if table.rows.contains_key(&key) {
            return Ok(false);
        }
        table.rows.insert(key, row);
        Ok(true)
    }

    fn replace_row(&mut self, table: &str, row: Row) -> Result<bool> {
        let table = self.table_mut(table)?;
        let key = table.key_of(&row)?;
        match table.rows.get_mut(&key) {
            Some(existing) => {
                *existing = row;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_row(&self, table: &str, key: &[Column]) -> Result<Option<Row>> {
        Ok(self.table(table)?.rows.get(key).cloned())
    }

    fn delete_row(&mut self, table: &str, key: &[Column]) -> Result<bool> {
        Ok(self.table_mut(table)?.rows.remove(key).is_some())
    }

    fn scan(&self, table: &str) -> Result<Vec<Row>> {
        Ok(self.table(table)?.rows.values().cloned().collect())
    }
}
