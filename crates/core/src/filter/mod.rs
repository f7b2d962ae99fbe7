//! Client-side filter, sort and paging of fetched lists
//!
//! Every list page holds a [`ListQuery`] describing what the user picked:
//! a search text, one value set per categorical dimension, a sort key and a
//! page. Applying it to the fetched items yields the visible subset. The
//! dimensions are typed per list through [`Listable`].

mod classes;
mod criteria;
mod slots;

pub use classes::{ClassFacet, ClassFacetValue, ClassField, ClassSortKey};
pub use criteria::{CriterionFacet, CriterionFacetValue, CriterionField, CriterionSortKey};
pub use slots::{SlotFacet, SlotFacetValue, SlotField, SlotSortKey};

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use chrono::NaiveDateTime;

/// A value an item exposes for sorting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
    /// Missing timestamps sort first
    Timestamp(Option<NaiveDateTime>),
}

impl SortValue<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => compare_text(a, b),
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Timestamp(a), SortValue::Timestamp(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Case-insensitive first, then by exact text so "a" and "A" stay ordered.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Describes the searchable, filterable and sortable dimensions of a list item
pub trait Listable: Clone {
    /// String fields searched by the free-text box
    type Field: Copy + Eq + Debug;
    /// Categorical dimensions filtered by set membership
    type Facet: Copy + Eq + Hash + Debug;
    /// A value within one dimension
    type FacetValue: Copy + Eq + Hash + Debug;
    type SortKey: Copy + Eq + Debug;

    fn text(&self, field: Self::Field) -> Option<&str>;

    fn facet(&self, facet: Self::Facet) -> Self::FacetValue;

    /// The dimension a value belongs to
    fn facet_of(value: Self::FacetValue) -> Self::Facet;

    fn sort_value(&self, key: Self::SortKey) -> SortValue<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// One page of a filtered list
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// The filter/sort/page state of one list view
#[derive(Debug, Clone)]
pub struct ListQuery<T: Listable> {
    search: String,
    search_fields: Vec<T::Field>,
    facets: HashMap<T::Facet, HashSet<T::FacetValue>>,
    sort: Option<(T::SortKey, SortDirection)>,
    page: usize,
    page_size: Option<usize>,
}

impl<T: Listable> ListQuery<T> {
    /// A query that searches `search_fields` and has nothing selected yet
    pub fn new(search_fields: Vec<T::Field>) -> Self {
        Self {
            search: String::new(),
            search_fields,
            facets: HashMap::new(),
            sort: None,
            page: 1,
            page_size: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Changing the search jumps back to the first page
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.page = 1;
    }

    /// Add `value` to its dimension's set, or remove it if already selected
    pub fn toggle(&mut self, value: T::FacetValue) {
        let set = self.facets.entry(T::facet_of(value)).or_default();
        if !set.remove(&value) {
            set.insert(value);
        }
        self.page = 1;
    }

    /// Replace the selected set of one dimension
    pub fn set_facet(&mut self, facet: T::Facet, values: impl IntoIterator<Item = T::FacetValue>) {
        let values: HashSet<T::FacetValue> = values.into_iter().collect();
        debug_assert!(
            values.iter().all(|v| T::facet_of(*v) == facet),
            "facet values must belong to {:?}",
            facet
        );
        self.facets.insert(facet, values);
        self.page = 1;
    }

    pub fn is_selected(&self, value: T::FacetValue) -> bool {
        self.facets
            .get(&T::facet_of(value))
            .is_some_and(|set| set.contains(&value))
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.facets.clear();
        self.page = 1;
    }

    pub fn sort(&self) -> Option<(T::SortKey, SortDirection)> {
        self.sort
    }

    pub fn set_sort(&mut self, key: T::SortKey, direction: SortDirection) {
        self.sort = Some((key, direction));
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn matches(&self, item: &T) -> bool {
        self.matches_search(item) && self.matches_facets(item)
    }

    fn matches_search(&self, item: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields.iter().any(|field| {
            item.text(*field)
                .is_some_and(|text| text.to_lowercase().contains(&needle))
        })
    }

    fn matches_facets(&self, item: &T) -> bool {
        self.facets
            .iter()
            .all(|(facet, values)| values.is_empty() || values.contains(&item.facet(*facet)))
    }

    /// Filtered and sorted items, without paging.
    ///
    /// Sorting is stable: equal items keep their original relative order in
    /// both directions.
    pub fn apply(&self, items: &[T]) -> Vec<T> {
        let mut visible: Vec<T> = items.iter().filter(|i| self.matches(i)).cloned().collect();

        if let Some((key, direction)) = self.sort {
            visible.sort_by(|a, b| {
                let ord = a.sort_value(key).compare(&b.sort_value(key));
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        visible
    }

    /// The current page of [`apply`](Self::apply). Without a page size the
    /// whole result is one page.
    pub fn paged(&self, items: &[T]) -> Paged<T> {
        let visible = self.apply(items);
        let total_items = visible.len();
        let page_size = self.page_size.unwrap_or(total_items.max(1));
        let total_pages = total_items.div_ceil(page_size);

        let items = visible
            .into_iter()
            .skip((self.page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();

        Paged {
            items,
            page: self.page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
