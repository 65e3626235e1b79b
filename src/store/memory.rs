use std::collections::HashMap;

use super::FoodRecord;

/// Keeps every table in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore(HashMap<String, Vec<FoodRecord>>);

impl MemoryStore {
    pub fn clear(&mut self, location: &str) {
        if let Some(table) = self.0.get_mut(location) {
            table.clear();
        }
    }

    pub fn upsert(&mut self, location: &str, record: &FoodRecord) {
        let table = self.0.entry(location.to_owned()).or_default();
        match table.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => existing.clone_from(record),
            None => table.push(record.clone()),
        }
    }

    pub fn table(&self, location: &str) -> &[FoodRecord] {
        self.0.get(location).map_or(&[], Vec::as_slice)
    }
}
