use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{AppError, AppResult, FieldError};

use super::repo_types::{Category, Difficulty, Recipe, USER_AUTHOR};

/// Raw values of the add/edit recipe form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeForm {
    pub name: String,
    pub category: String,
    pub difficulty: String,
    pub time: String,
    pub servings: String,
    pub description: String,
    pub ingredients: String,  // one per line
    pub instructions: String, // one per line
    pub image: String,
    pub tags: String, // comma separated
}

/// Validated recipe content, without identity or timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    pub name: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub time: u32,
    pub servings: u32,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image: String,
    pub tags: Vec<String>,
}

/// Splits on line breaks, trimming each line and dropping empty ones.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn placeholder_image(name: &str) -> String {
    let query: String =
        url::form_urlencoded::byte_serialize(format!("{} food dish", name.trim()).as_bytes()).collect();
    format!("/placeholder.svg?height=200&width=300&query={}", query)
}

fn positive_number(raw: &str, field: &'static str, errors: &mut Vec<FieldError>) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => {
            errors.push(FieldError::new(field, "must be a positive whole number"));
            0
        }
    }
}

impl RecipeForm {
    /// Prefills the form for editing an existing recipe.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            category: recipe.category.to_string(),
            difficulty: recipe.difficulty.to_string(),
            time: recipe.time.to_string(),
            servings: recipe.servings.to_string(),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.join("\n"),
            instructions: recipe.instructions.join("\n"),
            image: recipe.image.clone(),
            tags: recipe.tags.join(", "),
        }
    }

    pub fn parse(&self) -> AppResult<RecipeDraft> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "is required"));
        }
        let category = self
            .category
            .trim()
            .parse::<Category>()
            .map_err(|e| errors.push(FieldError::new("category", e)))
            .ok();
        let difficulty = self
            .difficulty
            .trim()
            .parse::<Difficulty>()
            .map_err(|e| errors.push(FieldError::new("difficulty", e)))
            .ok();
        let time = positive_number(&self.time, "time", &mut errors);
        let servings = positive_number(&self.servings, "servings", &mut errors);

        let (Some(category), Some(difficulty), true) = (category, difficulty, errors.is_empty())
        else {
            return Err(AppError::ValidationFailed(errors));
        };

        let image = match self.image.trim() {
            "" => placeholder_image(&name),
            given => given.to_string(),
        };

        Ok(RecipeDraft {
            name,
            category,
            difficulty,
            time,
            servings,
            description: self.description.trim().to_string(),
            ingredients: split_lines(&self.ingredients),
            instructions: split_lines(&self.instructions),
            image,
            tags: split_tags(&self.tags),
        })
    }
}

impl RecipeDraft {
    pub fn into_recipe(self, id: i64, author: &str, now: OffsetDateTime) -> Recipe {
        Recipe {
            id,
            name: self.name,
            category: self.category,
            difficulty: self.difficulty,
            time: self.time,
            servings: self.servings,
            description: self.description,
            ingredients: self.ingredients,
            instructions: self.instructions,
            image: self.image,
            tags: self.tags,
            author: author.to_string(),
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Overwrites content fields and claims the recipe for the end user;
    /// `id` and `created_at` stay.
    pub fn apply_to(self, recipe: &mut Recipe, now: OffsetDateTime) {
        recipe.author = USER_AUTHOR.to_string();
        recipe.name = self.name;
        recipe.category = self.category;
        recipe.difficulty = self.difficulty;
        recipe.time = self.time;
        recipe.servings = self.servings;
        recipe.description = self.description;
        recipe.ingredients = self.ingredients;
        recipe.instructions = self.instructions;
        recipe.image = self.image;
        recipe.tags = self.tags;
        recipe.updated_at = Some(now);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }
}

/// What a listing shows for one recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeCard {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    pub difficulty: Difficulty,
    pub difficulty_label: &'static str,
    pub time_label: String,
    pub tags: Vec<String>,
    pub favorited: bool,
}

impl RecipeCard {
    pub fn new(recipe: &Recipe, favorited: bool) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            image: recipe.image.clone(),
            difficulty: recipe.difficulty,
            difficulty_label: recipe.difficulty.label(),
            time_label: format!("{} phút", recipe.time),
            tags: recipe.tags.clone(),
            favorited,
        }
    }
}

/// Full recipe view, including whether edit/delete are offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeDetail {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub category_label: &'static str,
    pub difficulty_label: &'static str,
    pub time_label: String,
    pub servings_label: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    pub favorited: bool,
    pub editable: bool,
}

impl RecipeDetail {
    pub fn new(recipe: &Recipe, favorited: bool) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            category_label: recipe.category.label(),
            difficulty_label: recipe.difficulty.label(),
            time_label: format!("{} phút", recipe.time),
            servings_label: format!("{} người", recipe.servings),
            description: recipe.description.clone(),
            ingredients: recipe.ingredients.clone(),
            instructions: recipe.instructions.clone(),
            tags: recipe.tags.clone(),
            favorited,
            editable: recipe.author == USER_AUTHOR || recipe.is_seeded(),
        }
    }
}

/// Text shared when the platform has no native share sheet.
pub fn share_text(recipe: &Recipe, page_url: &str) -> String {
    format!(
        "{}\n\n{}\n\nXem công thức tại: {}",
        recipe.name, recipe.description, page_url
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub user_recipes: usize,
    pub favorites: usize,
    pub shown: usize,
}
