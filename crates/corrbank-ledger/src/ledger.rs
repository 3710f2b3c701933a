//! Account ledger over the ownership table.
//!
//! Owns the encoding of [`Account`] into table rows. Each method performs a
//! single row operation; there is no batching and no rollback.

use corrbank_types::{Account, AccountId, CorrbankError, Currency, Result, constants};
use sha2::{Digest, Sha256};

use crate::store::{Column, ColumnDefinition, ColumnType, Row, TableSchema, TableStore};

/// Typed CRUD over `AssetsOwnership`.
///
/// The ledger is the only writer of account rows. It never caches: every
/// read goes to the store.
pub struct AccountLedger<S> {
    store: S,
}

impl<S: TableStore> AccountLedger<S> {
    /// Wrap a store. The table must be created with [`create_table`]
    /// before accounts can be written.
    ///
    /// [`create_table`]: AccountLedger::create_table
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Schema of the ownership table.
    #[must_use]
    pub fn schema() -> TableSchema {
        TableSchema {
            name: constants::TABLE_NAME.to_string(),
            columns: vec![
                ColumnDefinition::new(constants::COLUMN_ACCOUNT_ID, ColumnType::String, true),
                ColumnDefinition::new(constants::COLUMN_CONTACT_INFO, ColumnType::String, false),
                ColumnDefinition::new(constants::COLUMN_AMOUNT, ColumnType::Uint64, false),
                ColumnDefinition::new(constants::COLUMN_CURRENCY, ColumnType::String, false),
            ],
        }
    }

    /// Create the ownership table in the store.
    pub fn create_table(&mut self) -> Result<()> {
        self.store.create_table(Self::schema())
    }

    /// Insert a new account.
    ///
    /// # Errors
    /// Returns `AlreadyExists` if a row with this id is present; the existing
    /// row is left unchanged.
    pub fn create(&mut self, account: &Account) -> Result<()> {
        tracing::debug!(account = %account.id, balance = account.balance, currency = %account.currency, "insert account");
        if self.store.insert_row(constants::TABLE_NAME, encode(account))? {
            Ok(())
        } else {
            tracing::warn!(account = %account.id, "asset was already assigned");
            Err(CorrbankError::AlreadyExists(account.id.clone()))
        }
    }

    /// Overwrite every column of an existing account.
    ///
    /// # Errors
    /// Returns `AccountNotFound` if no row with this id exists.
    pub fn replace(&mut self, account: &Account) -> Result<()> {
        tracing::debug!(account = %account.id, balance = account.balance, currency = %account.currency, "replace account");
        if self.store.replace_row(constants::TABLE_NAME, encode(account))? {
            Ok(())
        } else {
            Err(CorrbankError::AccountNotFound(account.id.clone()))
        }
    }

    /// Fetch an account.
    ///
    /// # Errors
    /// Returns `AccountNotFound` if absent, `Storage` if the row is malformed.
    pub fn read(&self, id: &AccountId) -> Result<Account> {
        self.store
            .get_row(constants::TABLE_NAME, &key(id))?
            .ok_or_else(|| CorrbankError::AccountNotFound(id.clone()))
            .and_then(|row| decode(&row))
    }

    /// Remove an account. Administrative only; no operation of the engine
    /// deletes accounts.
    pub fn delete(&mut self, id: &AccountId) -> Result<()> {
        tracing::debug!(account = %id, "delete account");
        if self.store.delete_row(constants::TABLE_NAME, &key(id))? {
            Ok(())
        } else {
            Err(CorrbankError::AccountNotFound(id.clone()))
        }
    }

    /// Every account, ordered by id.
    pub fn accounts(&self) -> Result<Vec<Account>> {
        self.store
            .scan(constants::TABLE_NAME)?
            .iter()
            .map(decode)
            .collect()
    }

    /// SHA-256 over every row in id order, hex encoded. Two ledgers with the
    /// same digest hold identical accounts.
    pub fn state_digest(&self) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(b"corrbank:ledger:v1:");
        for account in self.accounts()? {
            hasher.update(account.id.as_str().as_bytes());
            hasher.update([0u8]);
            hasher.update(account.contact_info.as_bytes());
            hasher.update([0u8]);
            hasher.update(account.balance.to_le_bytes());
            hasher.update(account.currency.code().as_bytes());
            hasher.update([0x1e]);
        }
        Ok(hex::encode(hasher.finalize()))
    }

    /// Access the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn key(id: &AccountId) -> [Column; 1] {
    [Column::String(id.as_str().to_string())]
}

fn encode(account: &Account) -> Row {
    Row {
        columns: vec![
            Column::String(account.id.as_str().to_string()),
            Column::String(account.contact_info.clone()),
            Column::Uint64(account.balance),
            Column::String(account.currency.code().to_string()),
        ],
    }
}

fn decode(row: &Row) -> Result<Account> {
    let missing = || CorrbankError::Storage("row or column value not found".into());
    let [id, contact, amount, currency] = row.columns.as_slice() else {
        return Err(missing());
    };
    let currency: Currency = currency
        .as_str()
        .ok_or_else(missing)?
        .parse()
        .map_err(|_| CorrbankError::Storage(format!("row has invalid currency: {currency:?}")))?;
    Ok(Account {
        id: AccountId::from(id.as_str().ok_or_else(missing)?),
        contact_info: contact.as_str().ok_or_else(missing)?.to_string(),
        balance: amount.as_u64().ok_or_else(missing)?,
        currency,
    })
}
