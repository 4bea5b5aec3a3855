//! Predicate lists, sort-column lookup and paginated lists shared by every
//! list query.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::error::AppError;
use crate::validation::{NumberRules, RuleSet, TextRules};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Conjunction of predicates. An empty list matches everything.
pub struct PredicateList<T> {
    predicates: Vec<Predicate<T>>,
}

impl<T: 'static> PredicateList<T> {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Adds `predicate` only when `value` is present.
    pub fn when<V, F>(mut self, value: Option<V>, predicate: F) -> Self
    where
        V: Send + Sync + 'static,
        F: Fn(&T, &V) -> bool + Send + Sync + 'static,
    {
        if let Some(value) = value {
            self.predicates
                .push(Box::new(move |item: &T| predicate(item, &value)));
        }
        self
    }

    pub fn push(mut self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn matches(&self, item: &T) -> bool {
        self.predicates.iter().all(|p| p(item))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl<T: 'static> Default for PredicateList<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_SIZE,
            sort_by: None,
            sort_direction: SortDirection::Asc,
        }
    }
}

impl ListParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    pub fn sorted_by(mut self, column: &str, direction: SortDirection) -> Self {
        self.sort_by = Some(column.to_string());
        self.sort_direction = direction;
        self
    }
}

/// Per-entity filter: turns optional query parameters into predicates and
/// resolves sort columns by name.
pub trait ListFilter<T: 'static> {
    /// Column names accepted by `sort_by`; the first one is the default.
    const SORT_COLUMNS: &'static [&'static str];

    fn predicates(&self) -> PredicateList<T>;

    fn sort_column(name: &str) -> Option<Comparator<T>>;

    /// Case-insensitive lookup; no column means the default one.
    fn resolve_sort(sort_by: Option<&str>) -> Result<Comparator<T>, AppError> {
        let name = sort_by.unwrap_or(Self::SORT_COLUMNS[0]).to_ascii_lowercase();
        Self::sort_column(&name).ok_or_else(|| {
            AppError::validation("sort_by", format!("'{}' is not a sortable column", name))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_count: usize,
    pub total_pages: u32,
    pub has_previous: bool,
    pub has_next: bool,
}

impl<T> PagedList<T> {
    /// Sorts `items` (stable) by `compare` in `params.sort_direction`, then
    /// cuts out the requested page.
    pub fn create(mut items: Vec<T>, params: &ListParams, compare: Comparator<T>) -> Self {
        match params.sort_direction {
            SortDirection::Asc => items.sort_by(compare),
            SortDirection::Desc => items.sort_by(|a, b| compare(b, a)),
        }

        let page = params.page.max(1);
        let limit = params.limit.clamp(1, MAX_PAGE_SIZE);
        let total_count = items.len();
        let total_pages = total_count.div_ceil(limit as usize) as u32;
        let skip = (page as usize - 1).saturating_mul(limit as usize);

        let items: Vec<T> = items.into_iter().skip(skip).take(limit as usize).collect();

        Self {
            items,
            page,
            limit,
            total_count,
            total_pages,
            has_previous: page > 1,
            has_next: page < total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PagedList<U> {
        PagedList {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total_count: self.total_count,
            total_pages: self.total_pages,
            has_previous: self.has_previous,
            has_next: self.has_next,
        }
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Paging and sort rules every list query carries.
pub fn list_rules<T: 'static>(
    rules: RuleSet<T>,
    params: fn(&T) -> &ListParams,
    sort_columns: &'static [&'static str],
) -> RuleSet<T> {
    rules
        .number(
            "page",
            move |q: &T| Some(params(q).page),
            NumberRules::new().greater_than_or_equal(1),
        )
        .number(
            "limit",
            move |q: &T| Some(params(q).limit),
            NumberRules::new().between(1, MAX_PAGE_SIZE),
        )
        .text(
            "sort_by",
            move |q: &T| params(q).sort_by.as_deref(),
            TextRules::new().one_of_ignore_case(sort_columns),
        )
}

/// `min <= max` when both ends of a range filter are given.
pub fn range_is_ordered<N: PartialOrd>(min: Option<N>, max: Option<N>) -> bool {
    match (min, max) {
        (Some(min), Some(max)) => min <= max,
        _ => true,
    }
}
