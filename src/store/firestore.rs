use firestore::FirestoreDb;
use serde::Deserialize;

use super::{Error, FoodRecord};

/// One collection per location; each food is a document named after it.
#[derive(Debug)]
pub struct Firestore {
    db: FirestoreDb,
}

#[derive(Deserialize)]
struct StoredName {
    name: String,
}

impl Firestore {
    pub async fn open(project_id: &str) -> Result<Self, Error> {
        let db = FirestoreDb::new(project_id).await?;
        Ok(Self { db })
    }

    pub async fn clear(&self, location: &str) -> Result<(), Error> {
        let collection = firestore_id(location);
        let stored: Vec<StoredName> = self
            .db
            .fluent()
            .select()
            .from(collection.as_str())
            .filter(|q| q.field("name").is_not_null())
            .obj::<StoredName>()
            .query()
            .await?;
        log::info!("Deleting {} stale rows from {location}", stored.len());
        for doc in stored {
            self.db
                .fluent()
                .delete()
                .from(collection.as_str())
                .document_id(firestore_id(&doc.name))
                .execute()
                .await?;
        }
        Ok(())
    }

    pub async fn upsert(&self, location: &str, record: &FoodRecord) -> Result<(), Error> {
        let collection = firestore_id(location);
        self.db
            .fluent()
            .update()
            .in_col(collection.as_str())
            .document_id(firestore_id(&record.name))
            .object(record)
            // need to specify type because of dependency_on_unit_never_type_fallback
            .execute::<()>()
            .await?;
        Ok(())
    }
}

/// Maps a name onto a valid Firestore id without merging distinct names: `%` and `/`
/// are percent-encoded, and so is the first character of the reserved ids `.`, `..`
/// and `__*__`. Decoding the `%XX` escapes gives the name back.
fn firestore_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '%' => id.push_str("%25"),
            '/' => id.push_str("%2F"),
            _ => id.push(c),
        }
    }
    if id == "." || id == ".." {
        id.replace_range(..1, "%2E");
    } else if id.len() >= 4 && id.starts_with("__") && id.ends_with("__") {
        id.replace_range(..1, "%5F");
    }
    id
}
