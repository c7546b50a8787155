use std::path::Path;

use cnpj_scan_core::cnpj::{Cnpj, CnpjError, CnpjRegistry};
use rusqlite::{params, Connection, OptionalExtension};
use scan_logging::scan_debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error(transparent)]
    Cnpj(#[from] CnpjError),
    #[error("stored value is not a CNPJ: {0}")]
    InvalidValue(i64),
}

/// Company registry backed by an `empresas` table keyed by the numeric CNPJ.
pub struct SqliteRegistry {
    conn: Connection,
}

impl SqliteRegistry {
    pub fn open(path: &Path) -> Result<Self, RegistryError> {
        let conn = Connection::open(path)?;
        scan_debug!("opened registry {:?}", path);
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, RegistryError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn create_schema(&self) -> Result<(), RegistryError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS empresas (
                 cnpj_numerico INTEGER PRIMARY KEY
             );",
        )?;
        Ok(())
    }

    pub fn insert(&self, cnpj: Cnpj) -> Result<(), RegistryError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO empresas (cnpj_numerico) VALUES (?1)",
            params![to_sql_value(cnpj)],
        )?;
        Ok(())
    }
}

impl CnpjRegistry for SqliteRegistry {
    type Error = RegistryError;

    fn exists(&self, cnpj: Cnpj) -> Result<bool, RegistryError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM empresas WHERE cnpj_numerico = ?1",
                params![to_sql_value(cnpj)],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn branches(&self, cnpj: Cnpj) -> Result<Vec<Cnpj>, RegistryError> {
        let mut stmt = self.conn.prepare(
            "SELECT cnpj_numerico FROM empresas
             WHERE cnpj_numerico / 10000 = ?1 / 10000
             ORDER BY cnpj_numerico",
        )?;
        let rows = stmt.query_map(params![to_sql_value(cnpj)], |row| row.get::<_, i64>(0))?;

        let mut branches = Vec::new();
        for value in rows {
            let value = value?;
            let unsigned = u64::try_from(value).map_err(|_| RegistryError::InvalidValue(value))?;
            branches.push(Cnpj::from_value(unsigned)?);
        }
        Ok(branches)
    }
}

// Fourteen digits always fit in an i64.
fn to_sql_value(cnpj: Cnpj) -> i64 {
    cnpj.value() as i64
}
