use std::{collections::HashMap, fmt::Display};

use bitflags::bitflags;
use ego_tree::NodeId;
use scraper::ElementRef;
use serde::{Deserialize, Serialize};

use crate::parse::element_text;
use crate::static_selector;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealTime {
    Breakfast,
    Lunch,
    Dinner,
    Brunch,
}

impl MealTime {
    /// Matches a section heading such as `" Lunch "`; anything else is not a meal time.
    pub fn from_heading(heading: &str) -> Option<Self> {
        match heading.trim().to_lowercase().as_str() {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "brunch" => Some(Self::Brunch),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Brunch => "brunch",
        }
    }
}

impl Display for MealTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MealTimeFlags: u8 {
        const Breakfast = 1;
        const Lunch = 1 << 1;
        const Dinner = 1 << 2;
        const Brunch = 1 << 3;
    }
}

impl From<MealTime> for MealTimeFlags {
    fn from(meal_time: MealTime) -> Self {
        match meal_time {
            MealTime::Breakfast => Self::Breakfast,
            MealTime::Lunch => Self::Lunch,
            MealTime::Dinner => Self::Dinner,
            MealTime::Brunch => Self::Brunch,
        }
    }
}

impl From<&[MealTime]> for MealTimeFlags {
    fn from(meal_times: &[MealTime]) -> Self {
        meal_times
            .iter()
            .fold(Self::empty(), |acc, &x| acc | x.into())
    }
}

/// The meal time owning each list item on a menu page, keyed by the item's node.
#[derive(Debug, Default)]
pub struct MealTimeTags(HashMap<NodeId, MealTime>);

impl MealTimeTags {
    /// Walks the `h3 > a` section headings in document order and tags every `li` in the
    /// element right after each heading. Headings that are not meal times tag nothing.
    pub fn from_html_element(element: ElementRef) -> Self {
        static_selector!(HEADING_SELECTOR <- "h3 > a");
        static_selector!(ITEM_SELECTOR <- "li");

        let mut tags = HashMap::new();
        for heading in element.select(&HEADING_SELECTOR) {
            let text = element_text(heading);
            let Some(meal_time) = MealTime::from_heading(&text) else {
                log::trace!("ignoring menu section {text:?}");
                continue;
            };
            let Some(section) = heading
                .parent()
                .and_then(|h3| h3.next_siblings().find_map(ElementRef::wrap))
            else {
                log::trace!("menu section {text:?} has no list after it");
                continue;
            };
            for item in section.select(&ITEM_SELECTOR) {
                tags.insert(item.id(), meal_time);
            }
        }
        Self(tags)
    }

    pub fn get(&self, item: ElementRef) -> Option<MealTime> {
        self.0.get(&item.id()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HTML: &str = r##"
<div id="mdining-items">
  <h3><a href="#breakfast"> Breakfast </a></h3>
  <div class="courses">
    <ul class="items">
      <li><div class="item-name">Scrambled Eggs</div></li>
      <li><div class="item-name">Oatmeal</div></li>
    </ul>
  </div>
  <h3><a href="#late">Late Night</a></h3>
  <div class="courses">
    <ul class="items"><li><div class="item-name">Pizza</div></li></ul>
  </div>
  <h3><a href="#lunch">LUNCH</a></h3>
  <div class="courses">
    <ul class="items"><li><div class="item-name">Oatmeal</div></li></ul>
  </div>
</div>
"##;

    #[test]
    fn test_from_heading() {
        assert_eq!(MealTime::from_heading("  Brunch\n"), Some(MealTime::Brunch));
        assert_eq!(MealTime::from_heading("DINNER"), Some(MealTime::Dinner));
        assert_eq!(MealTime::from_heading("Late Night"), None);
        assert_eq!(MealTime::from_heading(""), None);
    }

    #[test]
    fn test_tags_follow_nearest_heading() {
        static_selector!(ITEMS <- "ul.items > li");
        let doc = scraper::Html::parse_document(HTML);
        let tags = MealTimeTags::from_html_element(doc.root_element());
        let tagged: Vec<_> = doc.select(&ITEMS).map(|li| tags.get(li)).collect();
        assert_eq!(
            tagged,
            [
                Some(MealTime::Breakfast),
                Some(MealTime::Breakfast),
                None,
                Some(MealTime::Lunch)
            ]
        );
    }

    #[test]
    fn test_flags() {
        let flags = MealTimeFlags::from([MealTime::Lunch, MealTime::Brunch].as_slice());
        assert!(flags.contains(MealTimeFlags::Lunch));
        assert!(flags.contains(MealTimeFlags::Brunch));
        assert!(!flags.contains(MealTimeFlags::Breakfast));
        assert!(MealTimeFlags::from(&[] as &[MealTime]).is_empty());
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&[MealTime::Breakfast, MealTime::Brunch]).unwrap();
        assert_eq!(json, r#"["breakfast","brunch"]"#);
        let back: Vec<MealTime> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, [MealTime::Breakfast, MealTime::Brunch]);
    }
}
