use std::path::{Path, PathBuf};
use tokio::fs;

use super::{Error, FoodRecord};
use crate::stage::sanitize_key;

/// One pretty-printed JSON array of records per location.
#[derive(Debug)]
pub struct FileStore(PathBuf);

impl FileStore {
    pub async fn open(p: impl AsRef<Path>) -> Result<Self, Error> {
        let p = p.as_ref();
        fs::create_dir_all(p).await?;
        Ok(Self(p.to_owned()))
    }

    fn table_path(&self, location: &str) -> PathBuf {
        self.0.join(format!("{}.json", sanitize_key(location)))
    }

    pub async fn load(&self, location: &str) -> Result<Vec<FoodRecord>, Error> {
        let path = self.table_path(location);
        if fs::try_exists(&path).await? {
            let bytes = fs::read(&path).await?;
            serde_json::from_slice(&bytes).map_err(From::from)
        } else {
            Ok(Vec::new())
        }
    }

    async fn save(&self, location: &str, records: &[FoodRecord]) -> Result<(), Error> {
        let json = serde_json::to_vec_pretty(records)?;
        fs::write(self.table_path(location), json).await?;
        Ok(())
    }

    pub async fn clear(&self, location: &str) -> Result<(), Error> {
        // every stored record has a name
        self.save(location, &[]).await
    }

    pub async fn upsert(&self, location: &str, record: &FoodRecord) -> Result<(), Error> {
        let mut records = self.load(location).await?;
        match records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => existing.clone_from(record),
            None => records.push(record.clone()),
        }
        self.save(location, &records).await
    }
}
