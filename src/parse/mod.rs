mod error;
mod index_page;
mod menu_page;
mod static_selector;
mod text;

pub use error::Error;
pub use index_page::{LocationLink, LocationLinks};
pub use menu_page::{FoodItem, LocationCatalog, LocationMenu, MealTime, MealTimeFlags, NutritionFacts};
pub use text::{element_text, numeric_only, remove_excess_whitespace};
