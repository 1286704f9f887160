use std::str::FromStr;

use crate::error::{AppError, AppResult, FieldError};

use super::repo_types::{Category, Difficulty, Recipe};

/// Which authors a listing includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorScope {
    #[default]
    All,
    /// Anything not loaded by the seed.
    Mine,
    Seeded,
}

impl FromStr for AuthorScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "all" => Ok(AuthorScope::All),
            "mine" => Ok(AuthorScope::Mine),
            "seeded" => Ok(AuthorScope::Seeded),
            other => Err(format!("unknown author scope '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub search: String,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub max_time: Option<u32>,
    pub author: AuthorScope,
}

impl RecipeFilter {
    /// Builds a filter from raw control values, where `""` and `"all"` mean
    /// "no filter" and a time ceiling of `0` means no ceiling.
    pub fn from_inputs(
        search: &str,
        category: &str,
        difficulty: &str,
        max_time: &str,
        author: &str,
    ) -> AppResult<Self> {
        let mut errors = Vec::new();

        let category = match category.trim() {
            "" | "all" => None,
            raw => match raw.parse::<Category>() {
                Ok(c) => Some(c),
                Err(e) => {
                    errors.push(FieldError::new("categoryFilter", e));
                    None
                }
            },
        };
        let difficulty = match difficulty.trim() {
            "" | "all" => None,
            raw => match raw.parse::<Difficulty>() {
                Ok(d) => Some(d),
                Err(e) => {
                    errors.push(FieldError::new("difficultyFilter", e));
                    None
                }
            },
        };
        let max_time = match max_time.trim() {
            "" | "all" => None,
            raw => match raw.parse::<u32>() {
                Ok(0) => None,
                Ok(t) => Some(t),
                Err(_) => {
                    errors.push(FieldError::new("timeFilter", "must be a number of minutes"));
                    None
                }
            },
        };
        let author = author.trim().parse::<AuthorScope>().unwrap_or_else(|e| {
            errors.push(FieldError::new("authorFilter", e));
            AuthorScope::All
        });

        if !errors.is_empty() {
            return Err(AppError::ValidationFailed(errors));
        }
        Ok(Self {
            search: search.to_string(),
            category,
            difficulty,
            max_time,
            author,
        })
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || self.category.is_some()
            || self.difficulty.is_some()
            || self.max_time.is_some()
            || self.author != AuthorScope::All
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.matches_search(recipe)
            && self.category.map_or(true, |c| recipe.category == c)
            && self.difficulty.map_or(true, |d| recipe.difficulty == d)
            && self.max_time.map_or(true, |max| recipe.time <= max)
            && match self.author {
                AuthorScope::All => true,
                AuthorScope::Mine => !recipe.is_seeded(),
                AuthorScope::Seeded => recipe.is_seeded(),
            }
    }

    fn matches_search(&self, recipe: &Recipe) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        recipe.name.to_lowercase().contains(&needle)
            || recipe.description.to_lowercase().contains(&needle)
            || recipe.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    /// Matching recipes in list order.
    pub fn apply<'a>(&self, recipes: &'a [Recipe]) -> Vec<&'a Recipe> {
        recipes.iter().filter(|r| self.matches(r)).collect()
    }
}
