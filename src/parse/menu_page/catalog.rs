use std::collections::HashMap;

use super::food_item::FoodItem;

/// The distinct foods served at one location, in first-seen order.
///
/// A food listed under several meal times is kept once; later listings only add their
/// meal time. Allergens, traits and nutrition always come from the first listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationCatalog {
    name: String,
    items: Vec<FoodItem>,
    by_name: HashMap<String, usize>,
}

impl LocationCatalog {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn merge(name: impl Into<String>, items: impl IntoIterator<Item = FoodItem>) -> Self {
        items.into_iter().fold(Self::new(name), |mut catalog, item| {
            catalog.insert(item);
            catalog
        })
    }

    pub fn insert(&mut self, item: FoodItem) {
        if let Some(&index) = self.by_name.get(item.name()) {
            let existing = &mut self.items[index];
            for &meal_time in item.meal_times() {
                existing.add_meal_time(meal_time);
            }
        } else {
            self.by_name.insert(item.name().to_owned(), self.items.len());
            self.items.push(item);
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&FoodItem> {
        self.by_name.get(name).map(|&index| &self.items[index])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
