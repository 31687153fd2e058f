use crate::error::Error;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

/// Sidecar file holding a directory's collection UUID.
pub const IDENTITY_MARKER: &str = ".collection";
/// Presence-only sidecar excluding a directory from collection management.
pub const SKIP_MARKER: &str = ".collection-skip";

const UUID_TEXT_LEN: usize = 36;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    /// A new UUID was generated and written to the marker.
    Created(Uuid),
    /// The marker already held a valid UUID.
    Existing(Uuid),
    /// The directory carries a skip marker.
    Skipped,
}

impl Identity {
    pub fn uuid(&self) -> Option<Uuid> {
        match self {
            Identity::Created(uuid) | Identity::Existing(uuid) => Some(*uuid),
            Identity::Skipped => None,
        }
    }
}

pub fn is_marker_file(name: &str) -> bool {
    name == IDENTITY_MARKER || name == SKIP_MARKER
}

pub fn has_skip_marker(dir: &Path) -> bool {
    dir.join(SKIP_MARKER).exists()
}

/// Resolve the persistent collection UUID of `dir`.
///
/// A marker that cannot be parsed is overwritten with a fresh UUID. Any
/// reference to the previous value is orphaned.
pub fn get_or_create_identity(dir: &Path) -> Result<Identity, Error> {
    if has_skip_marker(dir) {
        debug!("Skipping collection {}", dir.display());
        return Ok(Identity::Skipped);
    }

    let marker_path = dir.join(IDENTITY_MARKER);
    let mut marker = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&marker_path)?;

    let mut contents = String::new();
    // non-UTF-8 contents are as good as a corrupt marker
    if marker.read_to_string(&mut contents).is_ok() {
        if let Some(uuid) = parse_marker(&contents) {
            return Ok(Identity::Existing(uuid));
        }
    }

    let uuid = Uuid::new_v4();
    marker.seek(SeekFrom::Start(0))?;
    marker.set_len(0)?;
    marker.write_all(uuid.hyphenated().to_string().as_bytes())?;
    marker.sync_all()?;

    info!("Generated new uuid {} for collection {}", uuid, dir.display());
    Ok(Identity::Created(uuid))
}

fn parse_marker(contents: &str) -> Option<Uuid> {
    let text = contents.get(..UUID_TEXT_LEN)?;
    Uuid::try_parse(text).ok()
}
