//! Pages
//!
//! One component per screen of the app.

mod create_recipe;
mod home;
mod pantry;
mod profile;
mod profile_visit;
mod recipe_details;
mod settings;

pub use create_recipe::CreateRecipePage;
pub use home::HomePage;
pub use pantry::PantryPage;
pub use profile::ProfilePage;
pub use profile_visit::ProfileVisitPage;
pub use recipe_details::RecipeDetailsPage;
pub use settings::SettingsPage;
