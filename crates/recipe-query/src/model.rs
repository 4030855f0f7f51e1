//! Recipe records as stored and served.

use serde::Serialize;
use sqlx::FromRow;

/// A stored recipe. Immutable once imported.
///
/// `ingredients`, `instructions` and `nutrients` hold serialized JSON text and
/// are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f32>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    pub description: Option<String>,
    pub serves: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub nutrients: Option<String>,
}

/// A recipe waiting to be inserted; the store assigns the id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRecipe {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f32>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    pub description: Option<String>,
    pub serves: Option<String>,
    pub ingredients: Option<String>,
    pub instructions: Option<String>,
    pub nutrients: Option<String>,
}

impl NewRecipe {
    pub fn with_id(self, id: i64) -> Recipe {
        Recipe {
            id,
            title: self.title,
            cuisine: self.cuisine,
            rating: self.rating,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            total_time: self.total_time,
            description: self.description,
            serves: self.serves,
            ingredients: self.ingredients,
            instructions: self.instructions,
            nutrients: self.nutrients,
        }
    }
}
