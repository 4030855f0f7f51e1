//! Page requests, ordering, and the response envelope.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::model::Recipe;

/// A requested page. `page` is 1-based, as callers see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// 0-based page number used against the store.
    pub fn page_index(&self) -> u64 {
        u64::from(self.page.saturating_sub(1))
    }

    pub fn window(&self) -> Window {
        Window {
            offset: self.page_index() * u64::from(self.limit),
            limit: self.limit,
        }
    }
}

/// Offset/limit slice of an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: u64,
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Cuisine,
    Rating,
    PrepTime,
    CookTime,
    TotalTime,
}

impl SortField {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "id" => Some(SortField::Id),
            "title" => Some(SortField::Title),
            "cuisine" => Some(SortField::Cuisine),
            "rating" => Some(SortField::Rating),
            "prep_time" => Some(SortField::PrepTime),
            "cook_time" => Some(SortField::CookTime),
            "total_time" => Some(SortField::TotalTime),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Cuisine => "cuisine",
            SortField::Rating => "rating",
            SortField::PrepTime => "prep_time",
            SortField::CookTime => "cook_time",
            SortField::TotalTime => "total_time",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_param(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Ordering for a query. Nulls always sort last and ties fall back to `id`
/// ascending, so a given sort yields stable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub const fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// The default listing order.
    pub const fn rating_desc() -> Self {
        Self::new(SortField::Rating, SortDirection::Desc)
    }

    pub fn compare(&self, a: &Recipe, b: &Recipe) -> Ordering {
        let primary = match self.field {
            SortField::Id => return self.direction.apply(a.id.cmp(&b.id)),
            SortField::Title => nulls_last(a.title.as_deref(), b.title.as_deref(), self.direction),
            SortField::Cuisine => {
                nulls_last(a.cuisine.as_deref(), b.cuisine.as_deref(), self.direction)
            }
            SortField::Rating => nulls_last(a.rating, b.rating, self.direction),
            SortField::PrepTime => nulls_last(a.prep_time, b.prep_time, self.direction),
            SortField::CookTime => nulls_last(a.cook_time, b.cook_time, self.direction),
            SortField::TotalTime => nulls_last(a.total_time, b.total_time, self.direction),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// Append ` ORDER BY ...` to `qb`.
    pub fn push_order_by(&self, qb: &mut QueryBuilder<'static, Postgres>) {
        qb.push(" ORDER BY ")
            .push(self.field.column())
            .push(" ")
            .push(self.direction.keyword());
        if self.field != SortField::Id {
            qb.push(" NULLS LAST, id ASC");
        }
    }
}

fn nulls_last<T: PartialOrd>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => direction.apply(a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// One page of records plus the count of everything that matched.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub total: u64,
}

/// Output envelope returned by both list and search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub data: Vec<T>,
}

impl<T> PageResponse<T> {
    /// Wrap a page as-is. The external page number and limit are echoed back
    /// unchanged.
    pub fn assemble(request: &PageRequest, page: Page<T>) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            total: page.total,
            data: page.records,
        }
    }
}
