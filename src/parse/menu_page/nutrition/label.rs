use std::{borrow::Cow, fmt::Display, str::FromStr};

/// Canonical nutrition fields, in the order they are serialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey {
    ServingSize,
    Calories,
    Sugars,
    Protein,
    Sodium,
    Cholesterol,
    TotalFat,
    TotalCarbohydrate,
    SaturatedFat,
    DietaryFiber,
    Iron,
    Calcium,
    VitaminA,
    VitaminC,
}

impl FieldKey {
    pub const ALL: [Self; 14] = [
        Self::ServingSize,
        Self::Calories,
        Self::Sugars,
        Self::Protein,
        Self::Sodium,
        Self::Cholesterol,
        Self::TotalFat,
        Self::TotalCarbohydrate,
        Self::SaturatedFat,
        Self::DietaryFiber,
        Self::Iron,
        Self::Calcium,
        Self::VitaminA,
        Self::VitaminC,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ServingSize => "serving_size",
            Self::Calories => "calories",
            Self::Sugars => "sugars",
            Self::Protein => "protein",
            Self::Sodium => "sodium",
            Self::Cholesterol => "cholesterol",
            Self::TotalFat => "total_fat",
            Self::TotalCarbohydrate => "total_carbohydrate",
            Self::SaturatedFat => "saturated_fat",
            Self::DietaryFiber => "dietary_fiber",
            Self::Iron => "iron",
            Self::Calcium => "calcium",
            Self::VitaminA => "vitamin_a",
            Self::VitaminC => "vitamin_c",
        }
    }

    /// The phrase in a row label that the amount follows.
    pub const fn label_phrase(self) -> &'static str {
        match self {
            Self::ServingSize => "Size",
            Self::Calories => "Calories",
            Self::Sugars => "Sugars",
            Self::Protein => "Protein",
            Self::Sodium => "Sodium",
            Self::Cholesterol => "Cholesterol",
            Self::TotalFat => "Total Fat",
            Self::TotalCarbohydrate => "Total Carbohydrate",
            Self::SaturatedFat => "Saturated Fat",
            Self::DietaryFiber => "Dietary Fiber",
            Self::Iron => "Iron",
            Self::Calcium => "Calcium",
            Self::VitaminA => "Vitamin A",
            Self::VitaminC => "Vitamin C",
        }
    }

    /// Whether the amount sits in the value column rather than inside the label.
    pub const fn reads_value_column(self) -> bool {
        matches!(
            self,
            Self::Iron | Self::Calcium | Self::VitaminA | Self::VitaminC
        )
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownFieldKey;

impl FromStr for FieldKey {
    type Err = UnknownFieldKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or(UnknownFieldKey)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Classification {
    Field(FieldKey),
    /// Not a known field; the row belongs in the fallback bucket under its own label.
    Unrecognized,
    /// Header noise, or a `Total`/`Vitamin` row naming neither of its known fields.
    Discarded,
}

const AMOUNT_PER_SERVING: &str = "Amount Per Serving";

/// Strips surrounding whitespace and the first colon, wherever it sits
/// (`"Calories: 250"`, `"Iron:"`).
pub fn normalize_label(label: &str) -> Cow<'_, str> {
    let label = label.trim();
    match label.split_once(':') {
        Some((head, tail)) => Cow::Owned(format!("{head}{tail}").trim().to_owned()),
        None => Cow::Borrowed(label),
    }
}

/// Classifies a label that already went through [`normalize_label`].
pub fn classify(label: &str) -> Classification {
    let head = label
        .split_once(char::is_whitespace)
        .map_or(label, |(head, _)| head);

    let field = match head {
        "Serving" => FieldKey::ServingSize,
        "Calories" => FieldKey::Calories,
        "Sugars" => FieldKey::Sugars,
        "Protein" => FieldKey::Protein,
        "Sodium" => FieldKey::Sodium,
        "Cholesterol" => FieldKey::Cholesterol,
        "Saturated" => FieldKey::SaturatedFat,
        "Dietary" => FieldKey::DietaryFiber,
        "Total" => return by_phrase(label, [FieldKey::TotalFat, FieldKey::TotalCarbohydrate]),
        "Vitamin" => return by_phrase(label, [FieldKey::VitaminA, FieldKey::VitaminC]),
        _ => match label {
            "Iron" => FieldKey::Iron,
            "Calcium" => FieldKey::Calcium,
            AMOUNT_PER_SERVING => return Classification::Discarded,
            _ => return Classification::Unrecognized,
        },
    };
    Classification::Field(field)
}

// first candidate whose phrase appears in the label wins
fn by_phrase(label: &str, candidates: [FieldKey; 2]) -> Classification {
    candidates
        .into_iter()
        .find(|key| label.contains(key.label_phrase()))
        .map_or(Classification::Discarded, Classification::Field)
}
