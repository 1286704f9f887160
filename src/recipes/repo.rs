use indexmap::IndexSet;

use crate::error::AppResult;
use crate::storage::{Store, FAVORITES_KEY, RECIPES_KEY};

use super::repo_types::Recipe;

pub type Favorites = IndexSet<i64>;

/// Load all recipes in stored order.
pub fn load_recipes(store: &Store) -> AppResult<Vec<Recipe>> {
    store.load(RECIPES_KEY)
}

pub fn save_recipes(store: &Store, recipes: &[Recipe]) -> AppResult<()> {
    store.save(RECIPES_KEY, recipes)
}

/// Load favorite ids; the stored array is read as an ordered set.
pub fn load_favorites(store: &Store) -> AppResult<Favorites> {
    store.load(FAVORITES_KEY)
}

pub fn save_favorites(store: &Store, favorites: &Favorites) -> AppResult<()> {
    store.save(FAVORITES_KEY, favorites)
}
