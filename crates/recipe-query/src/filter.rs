//! Filter criteria and the predicate tree they compose into.
//!
//! A [`Predicate`] can be evaluated two ways: directly against a [`Recipe`]
//! (used by the in-memory store) or rendered into a Postgres `WHERE` clause
//! with bound parameters. Both evaluators agree on null handling: a null
//! column never satisfies a text or numeric filter.

use std::cmp::Ordering;

use sqlx::{Postgres, QueryBuilder};

use crate::error::QueryError;
use crate::model::Recipe;

/// Text columns that accept substring or case-insensitive equality filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Title,
    Cuisine,
}

impl TextField {
    pub fn column(self) -> &'static str {
        match self {
            TextField::Title => "title",
            TextField::Cuisine => "cuisine",
        }
    }

    fn value(self, recipe: &Recipe) -> Option<&str> {
        match self {
            TextField::Title => recipe.title.as_deref(),
            TextField::Cuisine => recipe.cuisine.as_deref(),
        }
    }
}

/// Numeric columns that accept comparison filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Rating,
    PrepTime,
    CookTime,
    TotalTime,
}

impl NumericField {
    pub fn column(self) -> &'static str {
        match self {
            NumericField::Rating => "rating",
            NumericField::PrepTime => "prep_time",
            NumericField::CookTime => "cook_time",
            NumericField::TotalTime => "total_time",
        }
    }

    fn value(self, recipe: &Recipe) -> Option<f64> {
        match self {
            NumericField::Rating => recipe.rating.map(f64::from),
            NumericField::PrepTime => recipe.prep_time.map(f64::from),
            NumericField::CookTime => recipe.cook_time.map(f64::from),
            NumericField::TotalTime => recipe.total_time.map(f64::from),
        }
    }
}

/// The right-hand side of a comparison, typed to match its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Float(f32),
    Int(i32),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Float(v) => f64::from(v),
            Number::Int(v) => f64::from(v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Lt,
    Eq,
}

impl CompareOp {
    /// Resolve an operator symbol. Only `>`, `<` and `=` are supported.
    pub fn from_symbol(symbol: &str) -> Result<Self, QueryError> {
        match symbol {
            ">" => Ok(CompareOp::Gt),
            "<" => Ok(CompareOp::Lt),
            "=" => Ok(CompareOp::Eq),
            other => Err(QueryError::UnsupportedOperator(other.to_string())),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
            CompareOp::Eq => "=",
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Eq => ordering == Ordering::Equal,
        }
    }
}

/// A single decoded request filter. The comparison operator is kept as the
/// raw symbol; resolving it is the builder's job.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCriterion {
    TextContains { field: TextField, value: String },
    EqualsIgnoreCase { field: TextField, value: String },
    Comparison { field: NumericField, op: String, value: Number },
}

/// Composite predicate over recipe fields.
///
/// `Always` is the identity of conjunction: it matches every record and
/// disappears when combined with anything else.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Always,
    /// `needle` is stored lower-cased.
    Contains { field: TextField, needle: String },
    /// `value` is stored lower-cased.
    EqualsIgnoreCase { field: TextField, value: String },
    Compare { field: NumericField, op: CompareOp, value: Number },
    And(Vec<Predicate>),
}

impl Predicate {
    pub fn from_criterion(criterion: &FilterCriterion) -> Result<Self, QueryError> {
        Ok(match criterion {
            FilterCriterion::TextContains { field, value } => Predicate::Contains {
                field: *field,
                needle: value.to_lowercase(),
            },
            FilterCriterion::EqualsIgnoreCase { field, value } => Predicate::EqualsIgnoreCase {
                field: *field,
                value: value.to_lowercase(),
            },
            FilterCriterion::Comparison { field, op, value } => Predicate::Compare {
                field: *field,
                op: CompareOp::from_symbol(op)?,
                value: *value,
            },
        })
    }

    /// Conjunction, flattening nested `And`s and absorbing `Always`.
    pub fn and(self, other: Predicate) -> Predicate {
        match (self, other) {
            (Predicate::Always, p) | (p, Predicate::Always) => p,
            (Predicate::And(mut left), Predicate::And(right)) => {
                left.extend(right);
                Predicate::And(left)
            }
            (Predicate::And(mut left), p) => {
                left.push(p);
                Predicate::And(left)
            }
            (p, Predicate::And(right)) => {
                let mut parts = Vec::with_capacity(right.len() + 1);
                parts.push(p);
                parts.extend(right);
                Predicate::And(parts)
            }
            (p, q) => Predicate::And(vec![p, q]),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Predicate::Always)
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::Contains { field, needle } => field
                .value(recipe)
                .is_some_and(|v| v.to_lowercase().contains(needle.as_str())),
            Predicate::EqualsIgnoreCase { field, value } => field
                .value(recipe)
                .is_some_and(|v| v.to_lowercase() == *value),
            Predicate::Compare { field, op, value } => field
                .value(recipe)
                .and_then(|v| v.partial_cmp(&value.as_f64()))
                .is_some_and(|ordering| op.holds(ordering)),
            Predicate::And(parts) => parts.iter().all(|p| p.matches(recipe)),
        }
    }

    /// Append ` WHERE ...` to `qb`, or nothing for `Always` (or an empty `And`).
    pub fn push_where(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Predicate::Always => {}
            Predicate::And(parts) if parts.is_empty() => {}
            Predicate::And(parts) => {
                qb.push(" WHERE ");
                push_conjunction(parts, qb);
            }
            other => {
                qb.push(" WHERE ");
                other.push_sql(qb);
            }
        }
    }

    fn push_sql(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        match self {
            Predicate::Always => {
                qb.push("TRUE");
            }
            Predicate::Contains { field, needle } => {
                qb.push("STRPOS(LOWER(")
                    .push(field.column())
                    .push("), ")
                    .push_bind(needle.clone())
                    .push(") > 0");
            }
            Predicate::EqualsIgnoreCase { field, value } => {
                qb.push("LOWER(")
                    .push(field.column())
                    .push(") = ")
                    .push_bind(value.clone());
            }
            Predicate::Compare { field, op, value } => {
                qb.push(field.column()).push(" ").push(op.symbol()).push(" ");
                match value {
                    Number::Float(v) => qb.push_bind(*v),
                    Number::Int(v) => qb.push_bind(*v),
                };
            }
            Predicate::And(parts) if parts.is_empty() => {
                qb.push("TRUE");
            }
            Predicate::And(parts) => {
                qb.push("(");
                push_conjunction(parts, qb);
                qb.push(")");
            }
        }
    }
}

fn push_conjunction(parts: &[Predicate], qb: &mut QueryBuilder<'static, Postgres>) {
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            qb.push(" AND ");
        }
        part.push_sql(qb);
    }
}

/// Fold criteria into one predicate. No criteria yields `Predicate::Always`.
pub fn build_predicate(criteria: &[FilterCriterion]) -> Result<Predicate, QueryError> {
    criteria.iter().try_fold(Predicate::Always, |acc, criterion| {
        Ok(acc.and(Predicate::from_criterion(criterion)?))
    })
}
