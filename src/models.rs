//! Frontend Models
//!
//! Data structures matching API responses, plus their bindings to the list
//! synchronizer (`Keyed` identity and patchable `Field`s).

use chrono::DateTime;
use list_sync::{Field, Keyed};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::{Deserialize, Deserializer, Serialize};

/// Recipe card data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_favourite: bool,
    #[serde(default, deserialize_with = "flag")]
    pub is_private: bool,
    #[serde(default)]
    pub ingredients_match: Option<String>,
    #[serde(default)]
    pub steps_count: u32,
    #[serde(default)]
    pub types: Vec<String>,
}

impl Recipe {
    pub fn ingredient_match(&self) -> IngredientMatch {
        IngredientMatch::from_label(self.ingredients_match.as_deref().unwrap_or(""))
    }
}

impl Keyed for Recipe {
    type Key = u64;

    fn key(&self) -> u64 {
        self.id
    }
}

/// Recipe flags that can be toggled optimistically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeField {
    Favourite,
    Private,
}

impl Field<Recipe> for RecipeField {
    type Value = bool;

    fn read(&self, item: &Recipe) -> bool {
        match self {
            RecipeField::Favourite => item.is_favourite,
            RecipeField::Private => item.is_private,
        }
    }

    fn write(&self, item: &mut Recipe, value: bool) {
        match self {
            RecipeField::Favourite => item.is_favourite = value,
            RecipeField::Private => item.is_private = value,
        }
    }
}

/// Full recipe as shown on its own page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: Recipe,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    pub creator: Creator,
}

impl RecipeDetail {
    pub fn is_created_by(&self, user: Option<&User>) -> bool {
        user.is_some_and(|user| user.id == self.creator.id)
    }
}

impl Keyed for RecipeDetail {
    type Key = u64;

    fn key(&self) -> u64 {
        self.summary.id
    }
}

impl Field<RecipeDetail> for RecipeField {
    type Value = bool;

    fn read(&self, item: &RecipeDetail) -> bool {
        Field::<Recipe>::read(self, &item.summary)
    }

    fn write(&self, item: &mut RecipeDetail, value: bool) {
        Field::<Recipe>::write(self, &mut item.summary, value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    #[serde(default, deserialize_with = "number_or_string")]
    pub quantity: f64,
    /// A `Unit` key, or `taste` for "to taste"
    pub unit: String,
}

impl RecipeIngredient {
    pub fn is_to_taste(&self) -> bool {
        self.unit == "taste"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: u64,
    pub name: String,
}

/// Recipe category offered by the create form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeType {
    pub id: u64,
    pub name: String,
}

/// First letter upper-cased, as names are shown on the detail page
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Whether the pantry covers a recipe's ingredients.
/// The server sends the label in the request language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientMatch {
    Missing,
    DifferentUnits,
    NotEnough,
    CanMake,
    Unknown,
}

impl IngredientMatch {
    pub fn from_label(label: &str) -> Self {
        match label {
            "MISSING" | "NO TIENE" => IngredientMatch::Missing,
            "DIFFERENT UNITS" | "UNIDADES DISTINTAS" => IngredientMatch::DifferentUnits,
            "NOT ENOUGH" | "NO SUFICIENTE" => IngredientMatch::NotEnough,
            "CAN MAKE" | "PUEDE HACERLO" => IngredientMatch::CanMake,
            _ => IngredientMatch::Unknown,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            IngredientMatch::Missing => "❌",
            IngredientMatch::DifferentUnits => "⚠️",
            IngredientMatch::NotEnough => "❗",
            IngredientMatch::CanMake => "✅",
            IngredientMatch::Unknown => "❓",
        }
    }

    /// Translation key of the tooltip
    pub fn label_key(&self) -> &'static str {
        match self {
            IngredientMatch::Missing => "recipe_donthave",
            IngredientMatch::DifferentUnits => "recipe_differentunits",
            IngredientMatch::NotEnough => "recipe_notenough",
            IngredientMatch::CanMake => "recipe_canmake",
            IngredientMatch::Unknown => "recipe_unknown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "unit_gr")]
    Grams,
    #[serde(rename = "unit_ml")]
    Milliliters,
    #[serde(rename = "unit_u")]
    Units,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Grams, Unit::Milliliters, Unit::Units];

    /// Wire name, also used as translation key
    pub fn key(&self) -> &'static str {
        match self {
            Unit::Grams => "unit_gr",
            Unit::Milliliters => "unit_ml",
            Unit::Units => "unit_u",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Unit::ALL.into_iter().find(|unit| unit.key() == key)
    }
}

pub const MIN_QUANTITY: f64 = 1.0;
pub const MAX_QUANTITY: f64 = 99999.0;

/// Quantity + unit of a pantry entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Amount {
    pub quantity: f64,
    pub unit: Unit,
}

/// Parse a quantity typed by the user; blank or invalid input becomes the
/// minimum, anything else is clamped into range.
pub fn parse_quantity(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value.clamp(MIN_QUANTITY, MAX_QUANTITY),
        _ => MIN_QUANTITY,
    }
}

/// Whole quantities without decimals, the rest with two
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{}", quantity as i64)
    } else {
        format!("{:.2}", quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PantryEntry {
    pub ingredient_id: u64,
    pub name: String,
    #[serde(deserialize_with = "number_or_string")]
    pub quantity: f64,
    #[serde(default)]
    pub unit: Unit,
}

impl PantryEntry {
    pub fn amount(&self) -> Amount {
        Amount {
            quantity: self.quantity,
            unit: self.unit,
        }
    }

    /// Case-insensitive name filter of the pantry search box
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.trim().to_lowercase())
    }
}

impl Keyed for PantryEntry {
    type Key = u64;

    fn key(&self) -> u64 {
        self.ingredient_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PantryField {
    Amount,
}

impl Field<PantryEntry> for PantryField {
    type Value = Amount;

    fn read(&self, item: &PantryEntry) -> Amount {
        item.amount()
    }

    fn write(&self, item: &mut PantryEntry, value: Amount) {
        item.quantity = value.quantity;
        item.unit = value.unit;
    }
}

/// Ingredient that can be added to the pantry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogIngredient {
    pub id: u64,
    pub name: String,
}

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Uploaded avatar, or a generated one from the user name
    pub fn avatar_url(&self) -> String {
        match self.avatar.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!(
                "https://avatar.iran.liara.run/username?username={}",
                utf8_percent_encode(&self.name, NON_ALPHANUMERIC)
            ),
        }
    }

    /// Registration date as `02 Jan 2024`
    pub fn member_since(&self) -> Option<String> {
        let created = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(created)
            .ok()
            .map(|date| date.format("%d %b %Y").to_string())
    }
}

/// Accept `true`/`false` as well as `1`/`0`
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Null(()),
    }
    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
        Flag::Null(()) => false,
    })
}

/// Decimal columns arrive as strings (`"250.00"`); null reads as zero
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Float(f64),
        Text(String),
        Null(()),
    }
    match Number::deserialize(deserializer)? {
        Number::Float(value) => Ok(value),
        Number::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
        Number::Null(()) => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recipe_flags_accept_ints() {
        let recipe: Recipe = serde_json::from_value(json!({
            "id": 7,
            "name": "Tortilla",
            "is_favourite": 1,
            "is_private": false,
            "steps_count": 4,
            "types": ["Cena"],
        }))
        .unwrap();
        assert!(recipe.is_favourite);
        assert!(!recipe.is_private);
        assert_eq!(recipe.description, None);
        assert_eq!(recipe.ingredient_match(), IngredientMatch::Unknown);
    }

    #[test]
    fn test_ingredient_match_labels() {
        assert_eq!(IngredientMatch::from_label("NO TIENE"), IngredientMatch::Missing);
        assert_eq!(IngredientMatch::from_label("DIFFERENT UNITS"), IngredientMatch::DifferentUnits);
        assert_eq!(IngredientMatch::from_label("NO SUFICIENTE"), IngredientMatch::NotEnough);
        assert_eq!(IngredientMatch::from_label("CAN MAKE").icon(), "✅");
        assert_eq!(IngredientMatch::from_label("maybe").label_key(), "recipe_unknown");
    }

    #[test]
    fn test_pantry_quantity_as_string() {
        let entry: PantryEntry = serde_json::from_value(json!({
            "ingredient_id": 3,
            "name": "Harina",
            "quantity": "250.00",
            "unit": "unit_gr",
        }))
        .unwrap();
        assert_eq!(entry.quantity, 250.0);
        assert_eq!(entry.unit, Unit::Grams);
        assert!(entry.matches("HAR"));
        assert!(!entry.matches("leche"));
    }

    #[test]
    fn test_parse_quantity_clamps() {
        assert_eq!(parse_quantity(""), 1.0);
        assert_eq!(parse_quantity("abc"), 1.0);
        assert_eq!(parse_quantity("0.5"), 1.0);
        assert_eq!(parse_quantity("120000"), 99999.0);
        assert_eq!(parse_quantity(" 42.5 "), 42.5);
    }

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(250.0), "250");
        assert_eq!(format_quantity(1.5), "1.50");
    }

    #[test]
    fn test_unit_keys() {
        assert_eq!(Unit::from_key("unit_ml"), Some(Unit::Milliliters));
        assert_eq!(Unit::from_key("unit_kg"), None);
        assert_eq!(serde_json::to_value(Unit::Units).unwrap(), json!("unit_u"));
    }

    #[test]
    fn test_user_avatar_and_date() {
        let mut user = User {
            id: 1,
            name: "Ana María".to_string(),
            email: "ana@example.com".to_string(),
            avatar: Some("  ".to_string()),
            created_at: Some("2024-03-05T10:20:30.000000Z".to_string()),
        };
        assert_eq!(
            user.avatar_url(),
            "https://avatar.iran.liara.run/username?username=Ana%20Mar%C3%ADa"
        );
        assert_eq!(user.member_since().as_deref(), Some("05 Mar 2024"));

        user.avatar = Some("https://cdn.example.com/a.png".to_string());
        assert_eq!(user.avatar_url(), "https://cdn.example.com/a.png");
    }

    #[test]
    fn test_field_patch() {
        let mut entry = PantryEntry {
            ingredient_id: 1,
            name: "Leche".to_string(),
            quantity: 1.0,
            unit: Unit::Milliliters,
        };
        let amount = Amount { quantity: 500.0, unit: Unit::Units };
        PantryField::Amount.write(&mut entry, amount);
        assert_eq!(PantryField::Amount.read(&entry), amount);
    }

    #[test]
    fn test_recipe_detail_shape() {
        let detail: RecipeDetail = serde_json::from_value(json!({
            "id": 12,
            "name": "gazpacho",
            "description": "Sopa fría",
            "image": "https://cdn.example.com/12.webp",
            "is_favourite": 0,
            "is_private": 1,
            "ingredients_match": "NOT ENOUGH",
            "types": ["Verano"],
            "ingredients": [
                {"name": "tomate", "quantity": "500.00", "unit": "unit_gr"},
                {"name": "sal", "quantity": null, "unit": "taste"},
            ],
            "steps": ["Triturar", "Enfriar"],
            "creator": {"id": 3, "name": "marta"},
        }))
        .unwrap();
        assert_eq!(detail.key(), 12);
        assert!(detail.summary.is_private);
        assert_eq!(detail.summary.ingredient_match(), IngredientMatch::NotEnough);
        assert_eq!(detail.ingredients[0].quantity, 500.0);
        assert!(detail.ingredients[1].is_to_taste());
        assert_eq!(detail.steps.len(), 2);
        assert_eq!(capitalize(&detail.creator.name), "Marta");
    }

    #[test]
    fn test_detail_fields_patch_summary() {
        let mut detail: RecipeDetail = serde_json::from_value(json!({
            "id": 1,
            "name": "x",
            "creator": {"id": 2, "name": "y"},
        }))
        .unwrap();
        RecipeField::Favourite.write(&mut detail, true);
        assert!(detail.summary.is_favourite);
        assert!(Field::<RecipeDetail>::read(&RecipeField::Favourite, &detail));

        let owner = User { id: 2, name: "y".to_string(), email: String::new(), avatar: None, created_at: None };
        assert!(detail.is_created_by(Some(&owner)));
        assert!(!detail.is_created_by(None));
    }
}
