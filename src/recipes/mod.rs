pub mod controller;
pub mod dto;
pub mod filter;
pub mod repo;
pub mod repo_types;
mod seed;
pub mod services;

pub use controller::{CatalogController, FilterInputs};
pub use filter::{AuthorScope, RecipeFilter};
pub use repo_types::{Category, Difficulty, Recipe};
pub use services::RecipeCatalog;
