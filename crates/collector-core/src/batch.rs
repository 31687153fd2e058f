use crate::catalog::Catalog;
use crate::collection::{Collection, CollectionMap};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

const COLLECTION_TYPE: &str = "Collection";
const CHANGE_REQUEST_TYPE: &str = "ChangeRequest";

/// Body of a single POST to the content manager.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChangeRequest {
    pub commands: Vec<Command>,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: i64,
}

impl ChangeRequest {
    pub fn new(id: i64, commands: Vec<Command>) -> Self {
        Self {
            commands,
            kind: CHANGE_REQUEST_TYPE,
            id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Insert(InsertCollection),
    Update(UpdateCollection),
    Delete(DeleteCollection),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub uuid: Uuid,
    pub last_access: i64,
    pub titles: Vec<Title>,
    pub is_visible_in_home: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub display: String,
    pub direction: &'static str,
    pub language: &'static str,
}

impl Title {
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            direction: "LTR",
            language: "en-US",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UpdateCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub uuid: Uuid,
    pub members: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DeleteCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub uuid: Uuid,
}

impl Command {
    pub fn insert(collection: &Collection, last_access: i64, visible: bool) -> Self {
        Command::Insert(InsertCollection {
            kind: COLLECTION_TYPE,
            uuid: collection.uuid,
            last_access,
            titles: vec![Title::new(collection.name.clone())],
            is_visible_in_home: visible,
        })
    }

    pub fn update(uuid: Uuid, members: Vec<Uuid>) -> Self {
        Command::Update(UpdateCollection {
            kind: COLLECTION_TYPE,
            uuid,
            members,
        })
    }

    pub fn delete(uuid: Uuid) -> Self {
        Command::Delete(DeleteCollection {
            kind: COLLECTION_TYPE,
            uuid,
        })
    }

    pub fn uuid(&self) -> Uuid {
        match self {
            Command::Insert(op) => op.uuid,
            Command::Update(op) => op.uuid,
            Command::Delete(op) => op.uuid,
        }
    }
}

/// A collection shows up in the home screen when it groups more than one
/// book, or when single-entry visibility is forced.
pub fn is_visible(collection: &Collection, force_visible: bool) -> bool {
    collection.len() > 1 || force_visible
}

/// Turns scanned collections into an ordered list of change commands.
#[derive(Debug, Clone, Copy)]
pub struct BatchBuilder {
    pub force_visible: bool,
    /// Epoch seconds stamped into `lastAccess` of every insert.
    pub last_access: i64,
}

impl BatchBuilder {
    pub fn new(force_visible: bool) -> Self {
        Self {
            force_visible,
            last_access: chrono::Utc::now().timestamp(),
        }
    }

    pub fn with_last_access(mut self, last_access: i64) -> Self {
        self.last_access = last_access;
        self
    }

    /// Inserts for collections the catalog does not know yet, then one update
    /// per collection carrying its members. Invisible collections get an
    /// empty member list.
    pub fn build_update_batch(
        &self,
        catalog: &Catalog,
        collections: &CollectionMap,
    ) -> rusqlite::Result<Vec<Command>> {
        let mut inserts = Vec::new();
        let mut updates = Vec::with_capacity(collections.len());

        for collection in collections.values() {
            if collection.is_empty() {
                continue;
            }

            let visible = is_visible(collection, self.force_visible);
            if !catalog.collection_exists(&collection.uuid)? {
                debug!("Collection '{}' will be inserted", collection.name);
                inserts.push(Command::insert(collection, self.last_access, visible));
            }

            let members = if visible {
                collection.member_uuids()
            } else {
                Vec::new()
            };
            updates.push(Command::update(collection.uuid, members));
        }

        inserts.extend(updates);
        Ok(inserts)
    }
}

/// One delete per collection currently known to the catalog.
pub fn build_delete_all_batch(catalog: &Catalog) -> rusqlite::Result<Vec<Command>> {
    Ok(catalog
        .list_collection_uuids()?
        .into_iter()
        .map(Command::delete)
        .collect())
}
