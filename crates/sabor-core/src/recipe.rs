//! Recipe-creation request body.
//!
//! Field names follow the remote API (snake_case). The image travels in the
//! legacy `image_url` string; in memory it is an [`ImageRef`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::field::{legacy_field, ImageRef};

/// Recipe difficulty as the API spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Facil,
    Medio,
    Dificil,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown difficulty: {0}")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    /// Lenient parse of user input: case and Portuguese accents are ignored.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let folded: String = input
            .trim()
            .chars()
            .map(|c| match c {
                'á' | 'Á' | 'à' | 'À' => 'a',
                'é' | 'É' | 'ê' | 'Ê' => 'e',
                'í' | 'Í' => 'i',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        match folded.as_str() {
            "facil" => Ok(Difficulty::Facil),
            "medio" => Ok(Difficulty::Medio),
            "dificil" => Ok(Difficulty::Dificil),
            _ => Err(UnknownDifficulty(input.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Facil => "FACIL",
            Difficulty::Medio => "MEDIO",
            Difficulty::Dificil => "DIFICIL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default, with = "legacy_field")]
    pub image_url: Option<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: i64,
    pub name: String,
    #[serde(default, with = "legacy_field")]
    pub image_url: Option<ImageRef>,
}

/// An ingredient with quantity, as attached to a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Absent while the recipe is being created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ingredient_id: Option<i64>,
    pub amount: Option<f32>,
    pub unit: Option<String>,
    pub ingredient: Ingredient,
}

/// Rows of an ingredient list: either a bare ingredient or one bound to a
/// recipe with its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IngredientListItem {
    IngredientOnly { ingredient: Ingredient },
    RecipeIngredient { recipe_ingredient: RecipeIngredient },
}

impl IngredientListItem {
    pub fn ingredient(&self) -> &Ingredient {
        match self {
            IngredientListItem::IngredientOnly { ingredient } => ingredient,
            IngredientListItem::RecipeIngredient { recipe_ingredient } => {
                &recipe_ingredient.ingredient
            }
        }
    }
}

/// Body of the recipe-creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCreate {
    pub author_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Minutes.
    pub preparation_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    #[serde(default, with = "legacy_field")]
    pub image_url: Option<ImageRef>,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub categories: Vec<Category>,
}

impl RecipeCreate {
    /// Attach the outcome of an image capture.
    ///
    /// A failed capture leaves the recipe without an image instead of
    /// blocking submission.
    pub fn attach_image<E: fmt::Display>(&mut self, result: Result<ImageRef, E>) {
        match result {
            Ok(image) => self.image_url = Some(image),
            Err(e) => {
                log::warn!("Submitting recipe without image: {}", e);
                self.image_url = None;
            }
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
