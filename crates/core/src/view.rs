//! The directory view: store plus the client-side filter state that shapes what is shown.

use crate::backend::ClinicBackend;
use crate::filters::{FilterColumn, FilterPanel, FilterSet};
use crate::projector::{highlight_row, project, DisplayRow, HighlightedRow};
use crate::store::DirectoryStore;
use crate::ClinicResult;

pub struct DirectoryView<B> {
    store: DirectoryStore<B>,
    filters: FilterSet,
    search_term: String,
    panel: FilterPanel,
}

impl<B: ClinicBackend> DirectoryView<B> {
    pub fn new(backend: B) -> Self {
        Self {
            store: DirectoryStore::new(backend),
            filters: FilterSet::new(),
            search_term: String::new(),
            panel: FilterPanel::Closed,
        }
    }

    pub fn store(&self) -> &DirectoryStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DirectoryStore<B> {
        &mut self.store
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn panel(&self) -> &FilterPanel {
        &self.panel
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    pub fn set_filter(&mut self, column: FilterColumn, value: impl AsRef<str>) {
        self.filters.set(column, value);
    }

    pub fn clear_filter(&mut self, column: FilterColumn) {
        self.filters.clear(column);
    }

    /// Open (or, if already open, close) the filter pill for `column`.
    pub fn toggle_filter(&mut self, column: FilterColumn) {
        self.panel.toggle(column, &self.filters);
    }

    pub fn edit_filter_draft(&mut self, text: impl Into<String>) {
        self.panel.edit(text);
    }

    pub fn apply_filter_draft(&mut self) -> Option<FilterColumn> {
        self.panel.apply(&mut self.filters)
    }

    pub fn clear_open_filter(&mut self) -> Option<FilterColumn> {
        self.panel.clear(&mut self.filters)
    }

    pub fn close_filter(&mut self) {
        self.panel.close();
    }

    /// Rows that pass the current filters and search term, in store order.
    pub fn visible_rows(&self) -> Vec<DisplayRow> {
        project(self.store.clinics(), &self.filters, &self.search_term)
    }

    pub fn highlighted_rows(&self) -> Vec<HighlightedRow> {
        self.visible_rows()
            .iter()
            .map(|row| highlight_row(row, &self.filters, &self.search_term))
            .collect()
    }

    pub fn search_summary(&self) -> String {
        self.filters.summary()
    }

    /// Reset filters, search term and panel, then reload the full list.
    pub async fn clear_all_filters(&mut self) -> ClinicResult<()> {
        self.filters.clear_all();
        self.search_term.clear();
        self.panel.close();
        self.store.load().await
    }
}
