mod label;
mod value;

use std::{collections::BTreeMap, fmt};

use scraper::ElementRef;
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::parse::{element_text, numeric_only};
use crate::static_selector;

pub use label::{classify, normalize_label, Classification, FieldKey};
pub use value::extract;

/// Nutrition amounts for one food. Known fields keep the first amount seen; labels that are
/// not known fields are kept verbatim in a fallback bucket, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionFacts {
    fields: BTreeMap<FieldKey, String>,
    other: Vec<(String, String)>,
}

impl NutritionFacts {
    /// Reads every `tr` of a `.nutrition-facts` table body.
    pub fn from_html_elements<'a>(rows: impl Iterator<Item = ElementRef<'a>>) -> Self {
        static_selector!(CELL_SELECTOR <- "td");
        let mut facts = Self::default();
        for row in rows {
            let mut cells = row.select(&CELL_SELECTOR);
            let Some(first) = cells.next() else {
                continue;
            };
            let last = cells.last().unwrap_or(first);
            let label = element_text(first);
            let value = element_text(last);
            facts.add_row(&label, &value);
        }
        facts
    }

    /// Classifies one label/value pair and records whatever amount it carries.
    pub fn add_row(&mut self, label: &str, value: &str) {
        let label = normalize_label(label);
        let label: &str = &label;
        match classify(label) {
            Classification::Field(key) => match extract(key, label, value) {
                Some(amount) => {
                    self.fields.entry(key).or_insert(amount);
                }
                None => log::trace!("no amount for {key} in row {label:?}"),
            },
            Classification::Unrecognized if !label.is_empty() && !value.is_empty() => {
                self.insert_other(label, numeric_only(value));
            }
            Classification::Unrecognized | Classification::Discarded => {
                log::trace!("skipping nutrition row {label:?}");
            }
        }
    }

    fn insert_other(&mut self, label: &str, amount: String) {
        match self.other.iter_mut().find(|(l, _)| l == label) {
            Some((_, existing)) => *existing = amount,
            None => self.other.push((label.to_owned(), amount)),
        }
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn other(&self, label: &str) -> Option<&str> {
        self.other
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, amount)| amount.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len() + self.other.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, amount)| (key.as_str(), amount.as_str()))
            .chain(self.other.iter().map(|(l, a)| (l.as_str(), a.as_str())))
    }
}

impl Serialize for NutritionFacts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, amount) in self.iter() {
            map.serialize_entry(key, amount)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for NutritionFacts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FactsVisitor;

        impl<'de> Visitor<'de> for FactsVisitor {
            type Value = NutritionFacts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of nutrition labels to numeric strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut facts = NutritionFacts::default();
                while let Some((label, amount)) = access.next_entry::<String, String>()? {
                    match label.parse::<FieldKey>() {
                        Ok(key) => {
                            facts.fields.insert(key, amount);
                        }
                        Err(_) => facts.insert_other(&label, amount),
                    }
                }
                Ok(facts)
            }
        }

        deserializer.deserialize_map(FactsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"
<table class="nutrition-facts">
  <tbody>
    <tr><td colspan="2">Amount Per Serving</td></tr>
    <tr><td>Serving Size 1 cup (226g)</td><td></td></tr>
    <tr><td>Calories 250</td><td></td></tr>
    <tr><td>Total Fat
        8g</td><td>12%</td></tr>
    <tr><td>Saturated Fat 3g</td><td>15%</td></tr>
    <tr><td>Trans Fat 0g</td><td></td></tr>
    <tr><td>Cholesterol 30mg</td><td>10%</td></tr>
    <tr><td>Sodium 470mg</td><td>20%</td></tr>
    <tr><td>Total Carbohydrate 37g</td><td>12%</td></tr>
    <tr><td>Dietary Fiber 0g</td><td>0%</td></tr>
    <tr><td>Sugars 12g</td><td></td></tr>
    <tr><td>Protein 5g</td><td></td></tr>
    <tr><td>Vitamin A:</td><td>4%</td></tr>
    <tr><td>Vitamin C:</td><td>2%</td></tr>
    <tr><td>Calcium:</td><td>20%</td></tr>
    <tr><td>Iron:</td><td>4%</td></tr>
    <tr><td>Potassium</td><td>350mg</td></tr>
    <tr><th>Daily Value</th></tr>
  </tbody>
</table>"#;

    fn parse(html: &str) -> NutritionFacts {
        static_selector!(ROW_SELECTOR <- ".nutrition-facts tbody tr");
        let doc = scraper::Html::parse_fragment(html);
        NutritionFacts::from_html_elements(doc.select(&ROW_SELECTOR))
    }

    #[test]
    fn test_parse_table() {
        let facts = parse(TABLE);
        let expected = [
            (FieldKey::ServingSize, "226"),
            (FieldKey::Calories, "250"),
            (FieldKey::Sugars, "12"),
            (FieldKey::Protein, "5"),
            (FieldKey::Sodium, "470"),
            (FieldKey::Cholesterol, "30"),
            (FieldKey::TotalFat, "8"),
            (FieldKey::TotalCarbohydrate, "37"),
            (FieldKey::SaturatedFat, "3"),
            (FieldKey::DietaryFiber, "0"),
            (FieldKey::Iron, "4"),
            (FieldKey::Calcium, "20"),
            (FieldKey::VitaminA, "4"),
            (FieldKey::VitaminC, "2"),
        ];
        for (key, amount) in expected {
            assert_eq!(facts.get(key), Some(amount), "{key}");
        }
        // an empty value cell keeps an unknown label out of the fallback bucket
        assert_eq!(facts.other("Trans Fat 0g"), None);
        assert_eq!(facts.other("Potassium"), Some("350"));
        assert_eq!(facts.other("Amount Per Serving"), None);
        assert_eq!(facts.len(), 15);
    }

    #[test]
    fn test_fallback_bucket_keyed_by_label() {
        let mut facts = NutritionFacts::default();
        facts.add_row("Trans Fat", "0.5g");
        facts.add_row("Added Sugars", "");
        assert_eq!(facts.other("Trans Fat"), Some("0.5"));
        assert_eq!(facts.other("Added Sugars"), None);
    }

    #[test]
    fn test_first_amount_wins_for_known_fields() {
        let mut facts = NutritionFacts::default();
        facts.add_row("Calories 250", "");
        facts.add_row("Calories from Fat 90", "");
        assert_eq!(facts.get(FieldKey::Calories), Some("250"));

        facts.add_row("Potassium", "300mg");
        facts.add_row("Potassium", "350mg");
        assert_eq!(facts.other("Potassium"), Some("350"));
    }

    #[test]
    fn test_absent_amount_leaves_key_unset() {
        let mut facts = NutritionFacts::default();
        facts.add_row("Calories", "");
        facts.add_row("Serving Size 1 cup", "");
        assert!(facts.is_empty());
        facts.add_row("Calories 0", "");
        assert_eq!(facts.get(FieldKey::Calories), Some("0"));
    }

    #[test]
    fn test_colon_after_head_word() {
        let facts = parse(
            r#"<table class="nutrition-facts"><tbody>
                <tr><td>Calories: 250</td><td></td></tr>
                <tr><td>Sodium: 480mg</td><td>21%</td></tr>
            </tbody></table>"#,
        );
        assert_eq!(facts.get(FieldKey::Calories), Some("250"));
        assert_eq!(facts.get(FieldKey::Sodium), Some("480"));
        assert_eq!(facts.other("Sodium: 480mg"), None);
        assert_eq!(facts.len(), 2);
    }

    #[test]
    fn test_missing_table_is_empty() {
        assert!(parse("<div class=\"item-name\">Toast</div>").is_empty());
    }

    #[test]
    fn test_serde() {
        let mut facts = NutritionFacts::default();
        facts.add_row("Potassium", "350mg");
        facts.add_row("Vitamin C", "2%");
        facts.add_row("Calories 250", "");
        let serialized = serde_json::to_string(&facts).unwrap();
        assert_eq!(
            serialized,
            r#"{"calories":"250","vitamin_c":"2","Potassium":"350"}"#
        );
        let deserialized: NutritionFacts = serde_json::from_str(&serialized).unwrap();
        assert_eq!(facts, deserialized);
    }
}
