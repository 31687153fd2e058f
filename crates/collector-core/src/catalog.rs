use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Result};
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

const ENTRY_UUID_SQL: &str = "SELECT uuid FROM entries WHERE location = ?1";
const COLLECTION_UUIDS_SQL: &str = "SELECT uuid FROM entries WHERE type = 'Collection'";
const COLLECTION_EXISTS_SQL: &str =
    "SELECT 1 FROM entries WHERE type = 'Collection' AND uuid = ?1";

/// Read-only view of the device content catalog.
///
/// A single connection is held for the whole run and statements are cached
/// on it, so repeated lookups during a scan do not reopen the database.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        // fail early on a file that is not a catalog at all
        conn.prepare(ENTRY_UUID_SQL)?;
        debug!("Catalog opened read-only: {}", path.as_ref().display());
        Ok(Catalog { conn })
    }

    /// Wrap an already open connection.
    pub fn from_connection(conn: Connection) -> Self {
        Catalog { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// UUID of the entry stored at exactly `location`. Rows whose uuid does
    /// not parse are treated as missing.
    pub fn lookup_entry_uuid(&self, location: &str) -> Result<Option<Uuid>> {
        let mut stmt = self.conn.prepare_cached(ENTRY_UUID_SQL)?;
        let raw: Option<Option<String>> = stmt
            .query_row(params![location], |row| row.get(0))
            .optional()?;

        Ok(raw.flatten().and_then(|text| parse_uuid(&text)))
    }

    pub fn list_collection_uuids(&self) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare_cached(COLLECTION_UUIDS_SQL)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))?
            .collect::<Result<Vec<_>>>()?;

        Ok(rows
            .into_iter()
            .flatten()
            .filter_map(|text| parse_uuid(&text))
            .collect())
    }

    pub fn collection_exists(&self, uuid: &Uuid) -> Result<bool> {
        let mut stmt = self.conn.prepare_cached(COLLECTION_EXISTS_SQL)?;
        stmt.exists(params![uuid.hyphenated().to_string()])
    }
}

fn parse_uuid(text: &str) -> Option<Uuid> {
    match Uuid::try_parse(text) {
        Ok(uuid) => Some(uuid),
        Err(err) => {
            warn!("Ignoring malformed catalog uuid '{}': {}", text, err);
            None
        }
    }
}
