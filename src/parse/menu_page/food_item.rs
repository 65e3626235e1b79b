use serde::{ser::SerializeTuple, Serialize, Serializer};

use super::meal_time::{MealTime, MealTimeFlags};
use super::nutrition::NutritionFacts;
use crate::parse::{element_text, remove_excess_whitespace};
use crate::static_selector;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodItem {
    name: String,
    meal_times: Vec<MealTime>,
    allergens: Vec<String>,
    traits: Vec<String>,
    nutrition: NutritionFacts,
}

impl FoodItem {
    pub fn new(
        name: impl Into<String>,
        meal_times: Vec<MealTime>,
        allergens: Vec<String>,
        traits: Vec<String>,
        nutrition: NutritionFacts,
    ) -> Self {
        Self {
            name: name.into(),
            meal_times,
            allergens,
            traits,
            nutrition,
        }
    }

    /// Reads one `ul.items > li` entry. Returns `None` for entries without a name.
    pub fn from_html_element(element: scraper::ElementRef, meal_time: Option<MealTime>) -> Option<Self> {
        // example html li element at ./html_examples/menu_page/dining_hall.html
        static_selector!(NAME_SELECTOR <- ".item-name");
        static_selector!(ALLERGEN_SELECTOR <- ".allergens ul li");
        static_selector!(TRAIT_SELECTOR <- ".traits li");
        static_selector!(NUTRITION_ROW_SELECTOR <- ".nutrition-facts tbody tr");

        let name: String = element
            .select(&NAME_SELECTOR)
            .map(element_text)
            .collect();
        let name = remove_excess_whitespace(&name).into_owned();
        if name.is_empty() {
            log::trace!("skipping menu entry without a name");
            return None;
        }

        let allergens = element.select(&ALLERGEN_SELECTOR).map(element_text).collect();
        let traits = element.select(&TRAIT_SELECTOR).map(element_text).collect();
        let nutrition = NutritionFacts::from_html_elements(element.select(&NUTRITION_ROW_SELECTOR));
        if nutrition.is_empty() {
            log::trace!("{name} has no nutrition facts");
        }

        Some(Self::new(
            name,
            meal_time.into_iter().collect(),
            allergens,
            traits,
            nutrition,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn meal_times(&self) -> &[MealTime] {
        &self.meal_times
    }

    pub fn allergens(&self) -> &[String] {
        &self.allergens
    }

    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    pub const fn nutrition(&self) -> &NutritionFacts {
        &self.nutrition
    }

    pub fn meal_time_flags(&self) -> MealTimeFlags {
        self.meal_times.as_slice().into()
    }

    /// Appends `meal_time` unless it is already listed.
    pub(super) fn add_meal_time(&mut self, meal_time: MealTime) {
        if !self.meal_times.contains(&meal_time) {
            self.meal_times.push(meal_time);
        }
    }
}

/// Exported as `[name, meal_times, allergens, traits, nutrition]`.
impl Serialize for FoodItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(5)?;
        tuple.serialize_element(&self.name)?;
        tuple.serialize_element(&self.meal_times)?;
        tuple.serialize_element(&self.allergens)?;
        tuple.serialize_element(&self.traits)?;
        tuple.serialize_element(&self.nutrition)?;
        tuple.end()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::parse::menu_page::nutrition::FieldKey;

    const HTML: &str = r##"
<ul class="items">
  <li>
    <a class="item-name" href="#">
      Belgian  Waffle
    </a>
    <div class="allergens"><ul><li> eggs </li><li>milk</li><li>wheat/barley/rye</li></ul></div>
    <ul class="traits"><li>Vegetarian</li></ul>
    <table class="nutrition-facts">
      <tr><td>Serving Size 1 each (150g)</td><td></td></tr>
      <tr><td>Calories 320</td><td></td></tr>
      <tr><td>Iron</td><td>10%</td></tr>
    </table>
  </li>
</ul>"##;

    fn first_item(html: &str) -> Option<FoodItem> {
        static_selector!(ITEM_SELECTOR <- "ul.items > li");
        let doc = scraper::Html::parse_document(html);
        let li = doc.select(&ITEM_SELECTOR).next().unwrap();
        FoodItem::from_html_element(li, Some(MealTime::Breakfast))
    }

    #[test]
    fn test_food_item_from_html_element() {
        let item = first_item(HTML).expect("The example html should be valid");
        assert_eq!(item.name(), "Belgian Waffle");
        assert_eq!(item.meal_times(), [MealTime::Breakfast]);
        assert_eq!(item.allergens(), ["eggs", "milk", "wheat/barley/rye"]);
        assert_eq!(item.traits(), ["Vegetarian"]);
        assert_eq!(item.nutrition().get(FieldKey::ServingSize), Some("150"));
        assert_eq!(item.nutrition().get(FieldKey::Calories), Some("320"));
        assert_eq!(item.nutrition().get(FieldKey::Iron), Some("10"));
    }

    #[test]
    fn test_missing_parts_degrade() {
        let item = first_item(r#"<ul class="items"><li><span class="item-name">Toast</span></li></ul>"#)
            .expect("a named item should parse");
        assert!(item.allergens().is_empty());
        assert!(item.traits().is_empty());
        assert!(item.nutrition().is_empty());
    }

    #[test]
    fn test_nameless_entry_is_skipped() {
        assert!(first_item(r#"<ul class="items"><li><span class="item-name">  </span></li></ul>"#).is_none());
    }

    #[test]
    fn test_add_meal_time_is_set_like() {
        let mut item = FoodItem::new("Apple", vec![], vec![], vec![], NutritionFacts::default());
        item.add_meal_time(MealTime::Lunch);
        item.add_meal_time(MealTime::Breakfast);
        item.add_meal_time(MealTime::Lunch);
        assert_eq!(item.meal_times(), [MealTime::Lunch, MealTime::Breakfast]);
        assert_eq!(
            item.meal_time_flags(),
            MealTimeFlags::Lunch | MealTimeFlags::Breakfast
        );
    }

    #[test]
    fn test_serialize_as_tuple() {
        let mut nutrition = NutritionFacts::default();
        nutrition.add_row("Calories 95", "");
        let item = FoodItem::new(
            "Apple",
            vec![MealTime::Lunch],
            vec![],
            vec!["Vegan".into()],
            nutrition,
        );
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!(["Apple", ["lunch"], [], ["Vegan"], {"calories": "95"}])
        );
    }
}
