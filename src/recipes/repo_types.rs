use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Author marking records loaded by the seed rather than by an end user.
pub const SEED_AUTHOR: &str = "Admin";
/// Author assigned to recipes created from the form.
pub const USER_AUTHOR: &str = "User";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Appetizer,
    Main,
    Dessert,
    Drink,
    Soup,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Appetizer,
        Category::Main,
        Category::Dessert,
        Category::Drink,
        Category::Soup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Appetizer => "appetizer",
            Category::Main => "main",
            Category::Dessert => "dessert",
            Category::Drink => "drink",
            Category::Soup => "soup",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Appetizer => "Khai vị",
            Category::Main => "Món chính",
            Category::Dessert => "Tráng miệng",
            Category::Drink => "Đồ uống",
            Category::Soup => "Canh/Súp",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category '{}'", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Dễ",
            Difficulty::Medium => "Trung bình",
            Difficulty::Hard => "Khó",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown difficulty '{}'", s))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipe record as stored under the `recipes` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub time: u32,     // minutes
    pub servings: u32,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<OffsetDateTime>,
}

impl Recipe {
    pub fn is_seeded(&self) -> bool {
        self.author == SEED_AUTHOR
    }
}
