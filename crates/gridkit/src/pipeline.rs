//! The full pipeline: row data in, one page of rows out.
//!
//! [`run`] wires the stages together for a single query:
//!
//! ```text
//! rows → search + filter → sort (whole set) → slice page → TableView
//! ```
//!
//! [`Table`] is a stateful controller on top of it. It owns the columns,
//! the collection and the caches, and holds the current search, sort,
//! filter and page so a UI only forwards user events and renders
//! [`Table::view`].

use std::sync::Arc;

use serde::Serialize;

use crate::column::{Column, FilterColumn};
use crate::config::TableConfig;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{GridError, Result};
use crate::evaluate::{filter_rows, FilterArgs};
use crate::filter::TableFilter;
use crate::mapper::RowData;
use crate::memo::{FilterCache, RowDataCache};
use crate::pagination::{PageSummary, Pagination};
use crate::record::Record;
use crate::reducer::FilterAction;
use crate::sort::{paginate, sort_rows, toggle_sort, SortSpec};
use crate::structure::FilterStructure;

/// Everything a single pipeline run needs besides the rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableQuery {
    pub search: Option<String>,
    pub filter: Option<TableFilter>,
    pub sort: Option<SortSpec>,
    pub pagination: Option<Pagination>,
}

impl TableQuery {
    /// A query that keeps every row in input order.
    pub fn new() -> Self {
        TableQuery::default()
    }

    /// Sets the search text.
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the filter state.
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Sets the sort.
    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the page to produce.
    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    fn filter_args(&self) -> FilterArgs<'_> {
        FilterArgs {
            search: self.search.as_deref(),
            filter: self.filter.as_ref(),
        }
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    /// The requested page, sorted.
    #[serde(skip)]
    pub rows: Vec<RowData>,
    /// Page position, when the query was paginated.
    pub summary: Option<PageSummary>,
    /// Rows matching search and filter, across all pages.
    pub total_matching: usize,
    /// Placeholder text, set when `rows` is empty.
    pub empty_message: Option<String>,
}

impl TableView {
    /// Returns `true` if the page holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The summary's message, if the view is paginated.
    pub fn message(&self) -> Option<String> {
        self.summary.as_ref().map(PageSummary::message)
    }
}

/// Runs `query` over `rows` with the default configuration, reporting data
/// anomalies through `tracing`.
pub fn run(rows: &[RowData], query: &TableQuery) -> TableView {
    run_with(rows, query, &TableConfig::default(), &TracingSink)
}

/// Runs `query` over `rows`.
pub fn run_with(
    rows: &[RowData],
    query: &TableQuery,
    config: &TableConfig,
    sink: &dyn DiagnosticSink,
) -> TableView {
    let mut matching = filter_rows(rows, &query.filter_args(), sink);
    if let Some(spec) = &query.sort {
        sort_rows(&mut matching, spec, sink);
    }

    let total_matching = matching.len();
    let page: Vec<RowData> = paginate(&matching, query.pagination.as_ref())
        .iter()
        .map(|row| (*row).clone())
        .collect();
    let summary = query
        .pagination
        .as_ref()
        .map(|p| PageSummary::for_pagination(p, total_matching));
    let empty_message = page.is_empty().then(|| config.no_entries_message.clone());

    TableView {
        rows: page,
        summary,
        total_matching,
        empty_message,
    }
}

/// A table's data and interaction state.
pub struct Table<T> {
    columns: Arc<[Column<T>]>,
    filter_columns: Arc<[FilterColumn]>,
    collection: Arc<[T]>,
    config: TableConfig,
    rows: RowDataCache<T>,
    filters: FilterCache<T>,
    search: String,
    sort: Option<SortSpec>,
    pagination: Option<Pagination>,
}

impl<T: Record> Table<T> {
    /// Creates an empty table. Fails if `config` is invalid.
    pub fn new(
        columns: Vec<Column<T>>,
        filter_columns: Vec<FilterColumn>,
        config: TableConfig,
    ) -> Result<Self> {
        config.validate()?;
        let pagination = config.items_per_page.map(Pagination::first);

        let mut table = Table {
            columns: Arc::from(columns),
            filter_columns: Arc::from(filter_columns),
            collection: Arc::from(Vec::new()),
            config,
            rows: RowDataCache::new(),
            filters: FilterCache::new(),
            search: String::new(),
            sort: None,
            pagination,
        };
        table.refresh_filters(&TracingSink);
        Ok(table)
    }

    /// Replaces the collection. Filter selections that still apply to the
    /// new data are kept.
    pub fn set_collection(&mut self, collection: impl Into<Arc<[T]>>) {
        self.set_collection_with(collection, &TracingSink);
    }

    /// Like [`set_collection`](Self::set_collection), reporting data
    /// anomalies to `sink`.
    pub fn set_collection_with(
        &mut self,
        collection: impl Into<Arc<[T]>>,
        sink: &dyn DiagnosticSink,
    ) {
        self.collection = collection.into();
        self.refresh_filters(sink);
    }

    fn refresh_filters(&mut self, sink: &dyn DiagnosticSink) {
        self.filters.refresh_with(&self.filter_columns, &self.collection, sink);
    }

    /// The records currently listed.
    pub fn collection(&self) -> &Arc<[T]> {
        &self.collection
    }

    /// The display columns.
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// The table's configuration.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Current search text.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replaces the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Current sort, if any.
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    /// Replaces the sort. `None` restores input order.
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Handles a click on `column`'s header, see [`toggle_sort`].
    pub fn toggle_sort(&mut self, column: &str) -> &SortSpec {
        self.sort.insert(toggle_sort(self.sort.as_ref(), column))
    }

    /// Current live filter state.
    pub fn filter(&self) -> &TableFilter {
        self.filters.filter()
    }

    /// Filter controls available for the current collection.
    pub fn filter_structure(&self) -> &FilterStructure {
        self.filters.structure()
    }

    /// Bumped whenever the filter structure is rebuilt.
    pub fn filter_version(&self) -> u64 {
        self.filters.version()
    }

    /// Applies a filter action. On error the filter is left unchanged.
    pub fn dispatch(&mut self, action: &FilterAction) -> Result<()> {
        self.filters.dispatch(action)?;
        Ok(())
    }

    /// Current page request, `None` when the table is not paginated.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Moves to `page`. Does nothing when the table is not paginated.
    ///
    /// The page is not clamped; a page past the end shows no rows.
    pub fn set_page(&mut self, page: usize) {
        if let Some(pagination) = &mut self.pagination {
            pagination.page = page;
        }
    }

    /// Changes the page size, keeping the current page index.
    ///
    /// Zero is rejected, as it is in [`TableConfig::validate`].
    pub fn set_items_per_page(&mut self, items_per_page: usize) -> Result<()> {
        if items_per_page == 0 {
            return Err(GridError::Config("items_per_page must be greater than zero".into()));
        }
        let page = self.pagination.map_or(0, |p| p.page);
        self.pagination = Some(Pagination::new(page, items_per_page));
        Ok(())
    }

    /// Page sizes to offer for the current page size.
    pub fn page_size_options(&self) -> Vec<usize> {
        let current = self.pagination.map_or(0, |p| p.items_per_page);
        self.config.page_size_options_for(current)
    }

    /// The current query, as [`run`] would receive it.
    pub fn query(&self) -> TableQuery {
        TableQuery {
            search: Some(self.search.clone()),
            filter: Some(self.filters.filter().clone()),
            sort: self.sort.clone(),
            pagination: self.pagination,
        }
    }

    /// Produces the current page, reporting data anomalies through `tracing`.
    pub fn view(&mut self) -> TableView {
        self.view_with(&TracingSink)
    }

    /// Like [`view`](Self::view), reporting to `sink`.
    pub fn view_with(&mut self, sink: &dyn DiagnosticSink) -> TableView {
        let rows = self.rows.rows(&self.collection, &self.columns);
        run_with(&rows, &self.query(), &self.config, sink)
    }
}

impl<T> std::fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns)
            .field("filter_columns", &self.filter_columns)
            .field("records", &self.collection.len())
            .field("config", &self.config)
            .field("search", &self.search)
            .field("sort", &self.sort)
            .field("pagination", &self.pagination)
            .finish_non_exhaustive()
    }
}
