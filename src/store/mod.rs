mod error;
mod firestore;
mod local;
mod memory;
mod supabase;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::StoreKind;
use crate::parse::{FoodItem, LocationCatalog, MealTime, MealTimeFlags, NutritionFacts};

pub use error::Error;
use firestore::Firestore;
use local::FileStore;
use memory::MemoryStore;
use supabase::Supabase;

/// The row persisted for one distinct food.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub name: String,
    pub meal_time: Vec<MealTime>,
    pub allergens: Vec<String>,
    pub traits: Vec<String>,
    pub nutrition_facts: NutritionFacts,
    pub is_breakfast: bool,
    pub is_lunch: bool,
    pub is_dinner: bool,
    pub is_brunch: bool,
}

impl From<&FoodItem> for FoodRecord {
    fn from(item: &FoodItem) -> Self {
        let flags = item.meal_time_flags();
        Self {
            name: item.name().to_owned(),
            meal_time: item.meal_times().to_vec(),
            allergens: item.allergens().to_vec(),
            traits: item.traits().to_vec(),
            nutrition_facts: item.nutrition().clone(),
            is_breakfast: flags.contains(MealTimeFlags::Breakfast),
            is_lunch: flags.contains(MealTimeFlags::Lunch),
            is_dinner: flags.contains(MealTimeFlags::Dinner),
            is_brunch: flags.contains(MealTimeFlags::Brunch),
        }
    }
}

/// How one location's catalog fared on its way into the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistSummary {
    pub written: usize,
    pub failed: usize,
}

#[derive(Debug)]
#[non_exhaustive]
pub enum Store {
    Cloud(Firestore),
    Supabase(Supabase),
    Local(FileStore),
    Memory(MemoryStore),
}

impl Store {
    #[inline]
    pub async fn cloud(project_id: &str) -> Result<Self, Error> {
        Firestore::open(project_id).await.map(Self::Cloud)
    }

    #[inline]
    pub fn supabase(client: reqwest::Client, url: &str, key: &str) -> Result<Self, Error> {
        Supabase::new(client, url, key).map(Self::Supabase)
    }

    #[inline]
    pub async fn local(p: impl AsRef<Path>) -> Result<Self, Error> {
        FileStore::open(p).await.map(Self::Local)
    }

    #[inline]
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::default())
    }

    pub async fn open(kind: &StoreKind, client: &reqwest::Client) -> Result<Self, Error> {
        match kind {
            StoreKind::Firestore { project_id } => Self::cloud(project_id).await,
            StoreKind::Supabase { url, key } => Self::supabase(client.clone(), url, key),
            StoreKind::Local(p) => Self::local(p).await,
            StoreKind::Memory => Ok(Self::memory()),
        }
    }

    /// Deletes every row whose name is set.
    pub async fn clear(&mut self, location: &str) -> Result<(), Error> {
        match self {
            Self::Cloud(db) => db.clear(location).await,
            Self::Supabase(db) => db.clear(location).await,
            Self::Local(f) => f.clear(location).await,
            Self::Memory(m) => {
                m.clear(location);
                Ok(())
            }
        }
    }

    pub async fn upsert(&mut self, location: &str, record: &FoodRecord) -> Result<(), Error> {
        match self {
            Self::Cloud(db) => db.upsert(location, record).await,
            Self::Supabase(db) => db.upsert(location, record).await,
            Self::Local(f) => f.upsert(location, record).await,
            Self::Memory(m) => {
                m.upsert(location, record);
                Ok(())
            }
        }
    }

    /// Clears the location's table, then writes its foods one at a time. Failures are logged
    /// and counted; they never stop the remaining writes.
    pub async fn persist(&mut self, catalog: &LocationCatalog) -> PersistSummary {
        let location = catalog.name();
        if let Err(e) = self.clear(location).await {
            log::error!("Error deleting rows from {location}: {e}");
        }
        let mut summary = PersistSummary::default();
        for item in catalog.items() {
            let record = FoodRecord::from(item);
            match self.upsert(location, &record).await {
                Ok(()) => summary.written += 1,
                Err(e) => {
                    log::error!("Error writing {} to {location}: {e}", record.name);
                    summary.failed += 1;
                }
            }
        }
        log::info!(
            "Persisted {} of {} foods for {location}",
            summary.written,
            catalog.len()
        );
        summary
    }

    #[cfg(test)]
    pub fn memory_table(&self, location: &str) -> &[FoodRecord] {
        match self {
            Self::Memory(m) => m.table(location),
            _ => &[],
        }
    }
}
