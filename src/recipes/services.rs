use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::ids::fresh_id;
use crate::state::AppState;
use crate::storage::Store;

use super::dto::{CatalogStats, RecipeCard, RecipeDetail, RecipeForm, ViewMode};
use super::filter::RecipeFilter;
use super::repo::{self, Favorites};
use super::repo_types::{Recipe, USER_AUTHOR};
use super::seed::default_recipes;

/// In-memory recipe list and favorites, written through to the store on
/// every mutation.
pub struct RecipeCatalog {
    store: Store,
    recipes: Vec<Recipe>,
    favorites: Favorites,
    filter: RecipeFilter,
    view_mode: ViewMode,
}

impl RecipeCatalog {
    #[instrument(skip(state))]
    pub fn load(state: &AppState) -> AppResult<Self> {
        let store = state.store.clone();
        let mut recipes = repo::load_recipes(&store)?;
        let mut favorites = repo::load_favorites(&store)?;

        if recipes.is_empty() && state.config.seed_on_empty {
            recipes = default_recipes(OffsetDateTime::now_utc());
            repo::save_recipes(&store, &recipes)?;
            info!(count = recipes.len(), "seeded default recipes");
        }

        let before = favorites.len();
        favorites.retain(|id| recipes.iter().any(|r| r.id == *id));
        if favorites.len() != before {
            warn!(dropped = before - favorites.len(), "pruned favorites of missing recipes");
            repo::save_favorites(&store, &favorites)?;
        }

        debug!(recipes = recipes.len(), favorites = favorites.len(), "catalog loaded");
        Ok(Self {
            store,
            recipes,
            favorites,
            filter: RecipeFilter::default(),
            view_mode: ViewMode::default(),
        })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn get(&self, id: i64) -> AppResult<&Recipe> {
        self.recipes
            .iter()
            .find(|r| r.id == id)
            .ok_or(AppError::RecipeNotFound(id))
    }

    pub fn is_favorite(&self, id: i64) -> bool {
        self.favorites.contains(&id)
    }

    pub fn filter(&self) -> &RecipeFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: RecipeFilter) {
        debug!(?filter, "filter changed");
        self.filter = filter;
    }

    pub fn visible(&self) -> Vec<&Recipe> {
        self.filter.apply(&self.recipes)
    }

    pub fn cards(&self) -> Vec<RecipeCard> {
        self.visible()
            .into_iter()
            .map(|r| RecipeCard::new(r, self.is_favorite(r.id)))
            .collect()
    }

    pub fn detail(&self, id: i64) -> AppResult<RecipeDetail> {
        let recipe = self.get(id)?;
        Ok(RecipeDetail::new(recipe, self.is_favorite(id)))
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats {
            total: self.recipes.len(),
            user_recipes: self.recipes.iter().filter(|r| r.author == USER_AUTHOR).count(),
            favorites: self.favorites.len(),
            shown: self.visible().len(),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        self.view_mode
    }

    /// Adds a recipe at the front of the list.
    #[instrument(skip(self, form), fields(name = %form.name))]
    pub fn create(&mut self, form: &RecipeForm) -> AppResult<&Recipe> {
        let draft = form.parse()?;
        let now = OffsetDateTime::now_utc();
        let id = fresh_id(now, |id| self.recipes.iter().any(|r| r.id == id));

        let mut recipes = Vec::with_capacity(self.recipes.len() + 1);
        recipes.push(draft.into_recipe(id, USER_AUTHOR, now));
        recipes.extend(self.recipes.iter().cloned());
        repo::save_recipes(&self.store, &recipes)?;

        self.recipes = recipes;
        info!(recipe_id = id, "recipe created");
        Ok(&self.recipes[0])
    }

    /// Rewrites a recipe's content in place, keeping its position.
    #[instrument(skip(self, form))]
    pub fn update(&mut self, id: i64, form: &RecipeForm) -> AppResult<&Recipe> {
        let index = self.index_of(id)?;
        let draft = form.parse()?;

        let mut recipes = self.recipes.clone();
        draft.apply_to(&mut recipes[index], OffsetDateTime::now_utc());
        repo::save_recipes(&self.store, &recipes)?;

        self.recipes = recipes;
        info!(recipe_id = id, "recipe updated");
        Ok(&self.recipes[index])
    }

    /// Removes a recipe and its favorite mark. The favorite goes first, so a
    /// failed write never leaves a favorite pointing at a missing recipe.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: i64) -> AppResult<Recipe> {
        let index = self.index_of(id)?;

        if self.favorites.contains(&id) {
            let mut favorites = self.favorites.clone();
            favorites.shift_remove(&id);
            repo::save_favorites(&self.store, &favorites)?;
            self.favorites = favorites;
        }

        let mut recipes = self.recipes.clone();
        let removed = recipes.remove(index);
        repo::save_recipes(&self.store, &recipes)?;

        self.recipes = recipes;
        info!(recipe_id = id, "recipe deleted");
        Ok(removed)
    }

    /// Flips favorite membership and returns the new state.
    #[instrument(skip(self))]
    pub fn toggle_favorite(&mut self, id: i64) -> AppResult<bool> {
        self.get(id)?;
        let mut favorites = self.favorites.clone();
        let favorited = if favorites.shift_remove(&id) {
            false
        } else {
            favorites.insert(id);
            true
        };
        repo::save_favorites(&self.store, &favorites)?;

        self.favorites = favorites;
        debug!(recipe_id = id, favorited, "favorite toggled");
        Ok(favorited)
    }

    fn index_of(&self, id: i64) -> AppResult<usize> {
        self.recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or(AppError::RecipeNotFound(id))
    }
}
