mod catalog;
mod food_item;
mod location_menu;
mod meal_time;
mod nutrition;

pub use catalog::LocationCatalog;
pub use food_item::FoodItem;
pub use location_menu::LocationMenu;
pub use meal_time::{MealTime, MealTimeFlags};
pub use nutrition::NutritionFacts;
