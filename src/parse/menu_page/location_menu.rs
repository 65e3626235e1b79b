use scraper::Html;

use super::{catalog::LocationCatalog, food_item::FoodItem, meal_time::MealTimeTags};
use crate::parse::{element_text, Error};
use crate::static_selector;

/// Everything read from one location's menu page.
#[derive(Debug, Clone)]
pub struct LocationMenu {
    /// Every listing in page order, repeats included.
    export: Vec<FoodItem>,
    catalog: LocationCatalog,
}

impl LocationMenu {
    pub fn from_html(html: &str) -> Result<Self, Error> {
        let document = Html::parse_document(html);
        Self::from_html_element(document.root_element())
    }

    pub fn from_html_element(element: scraper::ElementRef) -> Result<Self, Error> {
        static_selector!(ACTIVE_LOCATION_SELECTOR <- "a.level_2.active");
        static_selector!(ITEM_SELECTOR <- "ul.items > li");

        let name = element
            .select(&ACTIVE_LOCATION_SELECTOR)
            .next()
            .map(element_text)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::html_parse_error("Active location marker not found"))?;

        let tags = MealTimeTags::from_html_element(element);
        let export: Vec<FoodItem> = element
            .select(&ITEM_SELECTOR)
            .filter_map(|li| FoodItem::from_html_element(li, tags.get(li)))
            .collect();
        let catalog = LocationCatalog::merge(name, export.iter().cloned());
        log::trace!(
            "parsed {} listings ({} distinct) for {}",
            export.len(),
            catalog.len(),
            catalog.name()
        );

        Ok(Self { export, catalog })
    }

    pub fn name(&self) -> &str {
        self.catalog.name()
    }

    pub fn export(&self) -> &[FoodItem] {
        &self.export
    }

    pub const fn catalog(&self) -> &LocationCatalog {
        &self.catalog
    }
}
