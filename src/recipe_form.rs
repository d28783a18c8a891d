//! Recipe Creation Form
//!
//! Draft of a new recipe as typed in the create screen, its validation, and
//! the flattened multipart field list the API expects
//! (`names[0][language]`, `steps[3][order]`, `types[]`, ...).

use crate::i18n::Locale;
use crate::models::{parse_quantity, Unit, MAX_QUANTITY, MIN_QUANTITY};
use crate::validators::is_blank;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 100;
pub const MAX_STEP_LEN: usize = 500;
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;
pub const IMAGE_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/jpg", "image/webp"];
/// `accept` attribute of the file input
pub const IMAGE_ACCEPT: &str = "image/png, image/jpeg, image/jpg, image/webp";

/// One text in both supported languages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bilingual {
    pub es: String,
    pub en: String,
}

impl Bilingual {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Es => &self.es,
            Locale::En => &self.en,
        }
    }

    pub fn set(&mut self, locale: Locale, text: String) {
        match locale {
            Locale::Es => self.es = text,
            Locale::En => self.en = text,
        }
    }

    fn is_valid(&self, max_len: usize) -> bool {
        Locale::ALL.into_iter().all(|locale| {
            let text = self.get(locale);
            !is_blank(text) && text.chars().count() <= max_len
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngredientLine {
    pub ingredient_id: Option<u64>,
    pub quantity: String,
    pub unit: Unit,
}

impl IngredientLine {
    fn quantity_in_range(&self) -> bool {
        match self.quantity.trim().parse::<f64>() {
            Ok(value) => (MIN_QUANTITY..=MAX_QUANTITY).contains(&value),
            Err(_) => false,
        }
    }
}

/// Picked image file, already read into memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeImage {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub names: Bilingual,
    pub descriptions: Bilingual,
    pub ingredients: Vec<IngredientLine>,
    pub steps: Vec<Bilingual>,
    pub types: Vec<u64>,
    pub is_private: bool,
    pub image: Option<RecipeImage>,
}

impl Default for NewRecipe {
    /// Starts with one empty ingredient row and one empty step
    fn default() -> Self {
        Self {
            names: Bilingual::default(),
            descriptions: Bilingual::default(),
            ingredients: vec![IngredientLine::default()],
            steps: vec![Bilingual::default()],
            types: Vec::new(),
            is_private: false,
            image: None,
        }
    }
}

/// A rejected form field. Row errors carry the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeFormError {
    Name,
    Description,
    Ingredient(usize),
    Quantity(usize),
    Step(usize),
    Types,
    ImageRequired,
    ImageTooLarge,
    ImageFormat,
}

impl RecipeFormError {
    /// Translation key of the message shown under the field
    pub fn key(&self) -> &'static str {
        match self {
            RecipeFormError::Name => "name_error",
            RecipeFormError::Description => "recipes.create.descriptionError",
            RecipeFormError::Ingredient(_) => "ingredient_error",
            RecipeFormError::Quantity(_) => "quantity_error",
            RecipeFormError::Step(_) => "recipes.create.stepRequired",
            RecipeFormError::Types => "recipes.create.typesRequired",
            RecipeFormError::ImageRequired => "recipes.create.imageRequired",
            RecipeFormError::ImageTooLarge => "recipes.create.imageTooLarge",
            RecipeFormError::ImageFormat => "recipes.create.imageFormats",
        }
    }
}

/// Check a file before reading it: type from the accepted list, at most 2 MB
pub fn check_image(mime: &str, size: u64) -> Result<(), RecipeFormError> {
    if !IMAGE_TYPES.contains(&mime) {
        return Err(RecipeFormError::ImageFormat);
    }
    if size > MAX_IMAGE_BYTES {
        return Err(RecipeFormError::ImageTooLarge);
    }
    Ok(())
}

impl NewRecipe {
    /// Every problem of the draft, in form order. Empty when it can be sent.
    pub fn validate(&self) -> Vec<RecipeFormError> {
        let mut errors = Vec::new();
        if !self.names.is_valid(MAX_NAME_LEN) {
            errors.push(RecipeFormError::Name);
        }
        if !self.descriptions.is_valid(MAX_DESCRIPTION_LEN) {
            errors.push(RecipeFormError::Description);
        }

        if self.ingredients.is_empty() {
            errors.push(RecipeFormError::Ingredient(0));
        }
        for (index, line) in self.ingredients.iter().enumerate() {
            if line.ingredient_id.is_none() {
                errors.push(RecipeFormError::Ingredient(index));
            }
            if !line.quantity_in_range() {
                errors.push(RecipeFormError::Quantity(index));
            }
        }

        if self.steps.is_empty() {
            errors.push(RecipeFormError::Step(0));
        }
        for (index, step) in self.steps.iter().enumerate() {
            if !step.is_valid(MAX_STEP_LEN) {
                errors.push(RecipeFormError::Step(index));
            }
        }

        if self.types.is_empty() {
            errors.push(RecipeFormError::Types);
        }
        match &self.image {
            None => errors.push(RecipeFormError::ImageRequired),
            Some(image) => {
                if let Err(error) = check_image(&image.mime, image.bytes.len() as u64) {
                    errors.push(error);
                }
            }
        }
        errors
    }

    /// Text parts of the multipart body, in the order they are appended.
    /// The image goes in a separate `image` file part.
    pub fn text_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![("is_private".to_string(), u8::from(self.is_private).to_string())];

        for (index, locale) in Locale::ALL.into_iter().enumerate() {
            fields.push((format!("names[{}][language]", index), locale.code().to_string()));
            fields.push((format!("names[{}][name]", index), self.names.get(locale).trim().to_string()));
        }
        for (index, locale) in Locale::ALL.into_iter().enumerate() {
            fields.push((format!("descriptions[{}][language]", index), locale.code().to_string()));
            fields.push((
                format!("descriptions[{}][description]", index),
                self.descriptions.get(locale).trim().to_string(),
            ));
        }

        let lines = self
            .ingredients
            .iter()
            .filter_map(|line| line.ingredient_id.map(|id| (id, line)));
        for (index, (id, line)) in lines.enumerate() {
            fields.push((format!("ingredients[{}][id]", index), id.to_string()));
            fields.push((
                format!("ingredients[{}][quantity]", index),
                parse_quantity(&line.quantity).to_string(),
            ));
            fields.push((format!("ingredients[{}][unit]", index), line.unit.key().to_string()));
        }

        // One entry per language and step; `order` is the 1-based step number
        let steps = self.steps.iter().enumerate().flat_map(|(order, step)| {
            Locale::ALL
                .into_iter()
                .filter(move |locale| !is_blank(step.get(*locale)))
                .map(move |locale| (order + 1, locale, step.get(locale).trim().to_string()))
        });
        for (index, (order, locale, text)) in steps.enumerate() {
            fields.push((format!("steps[{}][language]", index), locale.code().to_string()));
            fields.push((format!("steps[{}][order]", index), order.to_string()));
            fields.push((format!("steps[{}][step]", index), text));
        }

        for id in &self.types {
            fields.push(("types[]".to_string(), id.to_string()));
        }
        fields
    }
}
