use crate::catalog::Catalog;
use crate::collection::{Collection, CollectionEntry, CollectionMap};
use crate::identity::{self, Identity};
use crate::paths;
use crate::scanner::{DirectoryEntry, Visitor};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Trailing-segment suffix of the device's per-book index directories.
pub const INDEX_DIR_SUFFIX: &str = ".sdr";

/// Tree visitor grouping catalog-known files into per-directory collections.
pub struct CollectionAggregator<'a> {
    catalog: &'a Catalog,
    collections: &'a mut CollectionMap,
    /// Directories that were skipped or whose identity could not be resolved.
    rejected: HashSet<PathBuf>,
    on_match: Option<Box<dyn FnMut(usize, &Path) + 'a>>,
    matches: usize,
}

impl<'a> CollectionAggregator<'a> {
    pub fn new(catalog: &'a Catalog, collections: &'a mut CollectionMap) -> Self {
        Self {
            catalog,
            collections,
            rejected: HashSet::new(),
            on_match: None,
            matches: 0,
        }
    }

    /// Register a callback fired after every added entry with the running
    /// match count and the entry's path.
    pub fn with_progress(mut self, callback: impl FnMut(usize, &Path) + 'a) -> Self {
        self.on_match = Some(Box::new(callback));
        self
    }

    /// Make sure `dir` has a collection, resolving its identity on first use.
    /// Returns false when the directory cannot contribute to any collection.
    fn ensure_collection(&mut self, dir: &Path) -> bool {
        if self.collections.contains_key(dir) {
            return true;
        }
        if self.rejected.contains(dir) {
            return false;
        }

        let identity = match identity::get_or_create_identity(dir) {
            Ok(identity) => identity,
            Err(err) => {
                warn!("Unable to access collection marker in {}: {}", dir.display(), err);
                self.rejected.insert(dir.to_path_buf());
                return false;
            }
        };

        let (uuid, fresh) = match identity {
            Identity::Created(uuid) => (uuid, true),
            Identity::Existing(uuid) => (uuid, false),
            Identity::Skipped => {
                self.rejected.insert(dir.to_path_buf());
                return false;
            }
        };

        let collection = Collection::new(uuid, paths::display_name(dir), fresh);
        debug!(
            "New collection '{}' ({}) for {}",
            collection.name,
            uuid,
            dir.display()
        );
        self.collections.insert(dir.to_path_buf(), collection);
        true
    }
}

impl Visitor for CollectionAggregator<'_> {
    fn visit(&mut self, entry: &DirectoryEntry) -> bool {
        if !entry.is_file() {
            return false;
        }

        let name = entry.name().to_string_lossy();
        if identity::is_marker_file(&name) {
            return false;
        }

        let dir = entry.parent();
        if paths::last_segment_has_suffix(dir, INDEX_DIR_SUFFIX) {
            return false;
        }

        if !self.ensure_collection(dir) {
            return false;
        }

        let location = paths::join_paths(&dir.to_string_lossy(), &name);
        let uuid = match self.catalog.lookup_entry_uuid(&location) {
            Ok(Some(uuid)) => uuid,
            Ok(None) => {
                debug!("Not in catalog: {}", location);
                return false;
            }
            Err(err) => {
                warn!("Catalog lookup failed for {}: {}", location, err);
                return false;
            }
        };

        let Some(collection) = self.collections.get_mut(dir) else {
            return false;
        };
        if !collection.add_entry(CollectionEntry {
            path: location.clone(),
            uuid,
        }) {
            debug!("Duplicate member {} in '{}'", uuid, collection.name);
            return false;
        }
        debug!("Added book {} to collection '{}'", location, collection.name);

        self.matches += 1;
        if let Some(callback) = self.on_match.as_mut() {
            callback(self.matches, Path::new(&location));
        }
        true
    }
}

/// Remove collections that ended the scan without entries. Returns the
/// number of collections dropped.
pub fn drop_empty_collections(collections: &mut CollectionMap) -> usize {
    let before = collections.len();
    collections.retain(|_, collection| !collection.is_empty());
    let dropped = before - collections.len();
    info!("Dropped {} of {} empty collections", dropped, before);
    dropped
}
