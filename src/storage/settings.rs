use rusqlite::{OptionalExtension, params};

use super::{Db, StorageError};

pub const DOWNLOAD_FOLDER: &str = "download_folder";
pub const SESSDATA: &str = "sessdata";

impl Db {
    pub fn get_setting(&self, name: &str) -> Result<Option<String>, StorageError> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM settings WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .optional()
        })
    }

    pub fn set_setting(&self, name: &str, value: &str) -> Result<(), StorageError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO settings (name, value) VALUES (?1, ?2) \
                 ON CONFLICT(name) DO UPDATE SET value = excluded.value",
                params![name, value],
            )?;
            Ok(())
        })
    }
}
