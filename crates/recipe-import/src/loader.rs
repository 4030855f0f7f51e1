//! JSON recipe file decoding.
//!
//! Any field that is absent, `null`, or the string `"NaN"` decodes to `None`.
//! `ingredients`, `instructions` and `nutrients` are kept as compact JSON text.

use std::path::Path;

use recipe_query::NewRecipe;
use serde_json::Value;

use crate::error::ImportError;

pub async fn read_recipes_file(path: &Path) -> Result<Vec<NewRecipe>, ImportError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    parse_recipes(&content)
}

pub fn parse_recipes(json: &str) -> Result<Vec<NewRecipe>, ImportError> {
    let root: Value = serde_json::from_str(json)?;
    let Value::Array(items) = root else {
        return Err(ImportError::NotAnArray(kind(&root)));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, node)| parse_recipe(index, node))
        .collect()
}

fn parse_recipe(index: usize, node: &Value) -> Result<NewRecipe, ImportError> {
    if !node.is_object() {
        return Err(ImportError::InvalidField {
            index,
            field: "record",
            reason: format!("is {}, expected an object", kind(node)),
        });
    }

    Ok(NewRecipe {
        title: text(node, "title"),
        cuisine: text(node, "cuisine"),
        rating: float(index, node, "rating")?,
        prep_time: int(index, node, "prep_time")?,
        cook_time: int(index, node, "cook_time")?,
        total_time: int(index, node, "total_time")?,
        description: text(node, "description"),
        serves: text(node, "serves"),
        ingredients: raw_json(node, "ingredients"),
        instructions: raw_json(node, "instructions"),
        nutrients: raw_json(node, "nutrients"),
    })
}

fn present<'a>(node: &'a Value, field: &str) -> Option<&'a Value> {
    match node.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.eq_ignore_ascii_case("nan") => None,
        Some(value) => Some(value),
    }
}

fn text(node: &Value, field: &str) -> Option<String> {
    present(node, field).map(|value| match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn raw_json(node: &Value, field: &str) -> Option<String> {
    present(node, field).map(Value::to_string)
}

fn float(index: usize, node: &Value, field: &'static str) -> Result<Option<f32>, ImportError> {
    let Some(value) = present(node, field) else {
        return Ok(None);
    };
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    // Finite f64 values beyond f32::MAX become infinite after the cast.
    match parsed.map(|v| v as f32) {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ImportError::InvalidField {
            index,
            field,
            reason: format!("expected a number, found {}", value),
        }),
    }
}

fn int(index: usize, node: &Value, field: &'static str) -> Result<Option<i32>, ImportError> {
    let Some(value) = present(node, field) else {
        return Ok(None);
    };
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };
    parsed
        .and_then(|v| i32::try_from(v).ok())
        .map(Some)
        .ok_or_else(|| ImportError::InvalidField {
            index,
            field,
            reason: format!("expected an integer, found {}", value),
        })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Per-field null counts for a decoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub records: usize,
    pub null_counts: Vec<(&'static str, usize)>,
}

pub fn report(recipes: &[NewRecipe]) -> ImportReport {
    let count = |is_null: fn(&NewRecipe) -> bool| recipes.iter().filter(|r| is_null(r)).count();
    ImportReport {
        records: recipes.len(),
        null_counts: vec![
            ("title", count(|r| r.title.is_none())),
            ("cuisine", count(|r| r.cuisine.is_none())),
            ("rating", count(|r| r.rating.is_none())),
            ("prep_time", count(|r| r.prep_time.is_none())),
            ("cook_time", count(|r| r.cook_time.is_none())),
            ("total_time", count(|r| r.total_time.is_none())),
            ("description", count(|r| r.description.is_none())),
            ("serves", count(|r| r.serves.is_none())),
            ("ingredients", count(|r| r.ingredients.is_none())),
            ("instructions", count(|r| r.instructions.is_none())),
            ("nutrients", count(|r| r.nutrients.is_none())),
        ],
    }
}
