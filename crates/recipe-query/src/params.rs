//! Request parameter decoding.
//!
//! Raw query-string values arrive as optional strings. Decoding is pure and
//! fails fast: nothing here touches the store.

use serde::Deserialize;

use crate::error::QueryError;
use crate::filter::{FilterCriterion, NumericField, Number, TextField};
use crate::page::{PageRequest, Sort, SortDirection, SortField};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

const OPERATORS: [char; 3] = ['>', '<', '='];

/// Raw parameters of the list operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Raw parameters of the search operation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    /// `<op><float>`, e.g. `>4.5`
    pub rating: Option<String>,
    /// `<op><integer>`, e.g. `<30`
    pub total_time: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// A validated search: criteria in a fixed order plus the page to fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub criteria: Vec<FilterCriterion>,
    pub page: PageRequest,
}

impl ListParams {
    pub fn parse(&self) -> Result<PageRequest, QueryError> {
        parse_page(self.page.as_deref(), self.limit.as_deref())
    }
}

impl SearchParams {
    pub fn parse(&self) -> Result<SearchRequest, QueryError> {
        let mut criteria = Vec::new();

        if let Some(title) = non_empty(self.title.as_deref()) {
            criteria.push(FilterCriterion::TextContains {
                field: TextField::Title,
                value: title.to_string(),
            });
        }
        if let Some(cuisine) = non_empty(self.cuisine.as_deref()) {
            criteria.push(FilterCriterion::EqualsIgnoreCase {
                field: TextField::Cuisine,
                value: cuisine.to_string(),
            });
        }
        if let Some(raw) = self.rating.as_deref() {
            criteria.push(parse_comparison("rating", NumericField::Rating, raw)?);
        }
        if let Some(raw) = self.total_time.as_deref() {
            criteria.push(parse_comparison("total_time", NumericField::TotalTime, raw)?);
        }

        let mut page = parse_page(self.page.as_deref(), self.limit.as_deref())?;
        if let Some(sort) = parse_sort(self.sort.as_deref(), self.order.as_deref())? {
            page = page.with_sort(sort);
        }

        Ok(SearchRequest { criteria, page })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Decode `<op><number>`. Rating takes a finite float, time fields an integer.
pub fn parse_comparison(
    param: &'static str,
    field: NumericField,
    raw: &str,
) -> Result<FilterCriterion, QueryError> {
    let invalid = |reason: String| QueryError::InvalidFilterEncoding { param, reason };

    let mut chars = raw.chars();
    let op = match chars.next() {
        Some(c) if OPERATORS.contains(&c) => c,
        Some(_) => {
            return Err(invalid(format!(
                "expected '>', '<' or '=' followed by a number, got '{}'",
                raw
            )))
        }
        None => return Err(invalid("value is empty".to_string())),
    };

    let rest = chars.as_str();
    if rest.is_empty() {
        return Err(invalid(format!("missing number after '{}'", op)));
    }

    let value = match field {
        NumericField::Rating => rest
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Number::Float)
            .ok_or_else(|| invalid(format!("'{}' is not a number", rest)))?,
        NumericField::PrepTime | NumericField::CookTime | NumericField::TotalTime => rest
            .parse::<i32>()
            .map(Number::Int)
            .map_err(|_| invalid(format!("'{}' is not an integer", rest)))?,
    };

    Ok(FilterCriterion::Comparison {
        field,
        op: op.to_string(),
        value,
    })
}

pub fn parse_page(page: Option<&str>, limit: Option<&str>) -> Result<PageRequest, QueryError> {
    Ok(PageRequest::new(
        parse_positive("page", page, DEFAULT_PAGE)?,
        parse_positive("limit", limit, DEFAULT_LIMIT)?,
    ))
}

fn parse_positive(param: &'static str, raw: Option<&str>, default: u32) -> Result<u32, QueryError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(value) => value
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| QueryError::InvalidPagination {
                param,
                value: value.to_string(),
            }),
    }
}

fn parse_sort(sort: Option<&str>, order: Option<&str>) -> Result<Option<Sort>, QueryError> {
    let Some(field) = non_empty(sort) else {
        return Ok(None);
    };
    let field = SortField::from_param(field).ok_or_else(|| QueryError::InvalidSort {
        param: "sort",
        value: field.to_string(),
    })?;
    let direction = match non_empty(order) {
        None => SortDirection::default(),
        Some(order) => SortDirection::from_param(order).ok_or_else(|| QueryError::InvalidSort {
            param: "order",
            value: order.to_string(),
        })?,
    };
    Ok(Some(Sort::new(field, direction)))
}
