//! UI Components
//!
//! Reusable Leptos components.

mod auth_form;
mod delete_confirm_button;
mod ingredient_item;
mod language_select;
mod navbar;
mod recipe_card;
mod recipe_grid;
mod share_modal;
mod toast;

pub use auth_form::{AuthForm, AuthMode};
pub use delete_confirm_button::DeleteConfirmButton;
pub use ingredient_item::IngredientItem;
pub use language_select::LanguageSelect;
pub use navbar::{use_sign_out, Navbar};
pub use recipe_card::RecipeCard;
pub use recipe_grid::RecipeGrid;
pub use share_modal::ShareModal;
pub use toast::{error_toast, use_toaster, ToastKind, ToastStack, Toaster};
