//! Class list view model

use sonatina_core::filter::{ClassFacetValue, ClassField, ClassSortKey};
use sonatina_core::{ClassStatus, ClassSummary, ListQuery, Paged, SortDirection};
use sonatina_net::{AuthContext, SchedulerApi};
use tracing::{info, warn};

use crate::error::Result;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Fetched classes plus the user's filter, sort and page choice.
///
/// Every setter recomputes the visible page right away.
pub struct ClassListViewModel {
    classes: Vec<ClassSummary>,
    query: ListQuery<ClassSummary>,
    visible: Paged<ClassSummary>,
}

impl ClassListViewModel {
    pub fn new(page_size: usize) -> Self {
        let query = ListQuery::<ClassSummary>::new(vec![ClassField::Name, ClassField::Teacher])
            .with_page_size(page_size);
        let visible = query.paged(&[]);
        Self {
            classes: Vec::new(),
            query,
            visible,
        }
    }

    pub async fn load<A>(&mut self, api: &A, auth: &AuthContext) -> Result<()>
    where
        A: SchedulerApi + ?Sized,
    {
        match api.fetch_classes(auth).await {
            Ok(classes) => {
                info!(count = classes.len(), "Loaded classes");
                self.set_classes(classes);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to load classes");
                Err(e.into())
            }
        }
    }

    pub fn set_classes(&mut self, classes: Vec<ClassSummary>) {
        self.classes = classes;
        self.recompute();
    }

    pub fn visible(&self) -> &Paged<ClassSummary> {
        &self.visible
    }

    pub fn query(&self) -> &ListQuery<ClassSummary> {
        &self.query
    }

    pub fn set_search(&mut self, text: &str) {
        self.query.set_search(text);
        self.recompute();
    }

    pub fn toggle_status(&mut self, status: ClassStatus) {
        self.query.toggle(ClassFacetValue::Status(status));
        self.recompute();
    }

    pub fn toggle_level(&mut self, level: u8) {
        self.query.toggle(ClassFacetValue::Level(level));
        self.recompute();
    }

    pub fn sort_by(&mut self, key: ClassSortKey, direction: SortDirection) {
        self.query.set_sort(key, direction);
        self.recompute();
    }

    pub fn set_page(&mut self, page: usize) {
        self.query.set_page(page);
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.query.clear_filters();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.visible = self.query.paged(&self.classes);
    }
}

impl Default for ClassListViewModel {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}
