//! Identity-keyed caches for derived table state.
//!
//! Rebuilding the filter structure on every view would throw away the
//! user's selections. [`FilterCache`] rebuilds only when the filterable
//! columns or the collection are a different allocation than last time
//! (`Arc::ptr_eq`), and lays the fresh structure under the live filter so
//! selections that still make sense survive. Each rebuild bumps a version
//! counter callers can compare to know that the structure changed.
//!
//! [`RowDataCache`] does the same for mapped row data.

use std::sync::Arc;

use crate::column::{Column, FilterColumn};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::Result;
use crate::filter::TableFilter;
use crate::mapper::{map_to_data, RowData};
use crate::record::Record;
use crate::reducer::{reduce, FilterAction};
use crate::structure::{build_filter_structure_with, FilterStructure};

fn same_arc<T: ?Sized>(cached: Option<&Arc<T>>, current: &Arc<T>) -> bool {
    cached.is_some_and(|cached| Arc::ptr_eq(cached, current))
}

/// Filter structure and live filter state for one table.
pub struct FilterCache<R> {
    columns: Option<Arc<[FilterColumn]>>,
    collection: Option<Arc<[R]>>,
    structure: FilterStructure,
    filter: TableFilter,
    version: u64,
}

impl<R> Default for FilterCache<R> {
    fn default() -> Self {
        FilterCache {
            columns: None,
            collection: None,
            structure: FilterStructure::new(),
            filter: TableFilter::new(),
            version: 0,
        }
    }
}

impl<R> std::fmt::Debug for FilterCache<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterCache")
            .field("structure", &self.structure)
            .field("filter", &self.filter)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl<R: Record> FilterCache<R> {
    /// An empty cache at version 0.
    pub fn new() -> Self {
        FilterCache::default()
    }

    /// Returns `true` if the cache was built from exactly these inputs.
    pub fn is_current(&self, columns: &Arc<[FilterColumn]>, collection: &Arc<[R]>) -> bool {
        same_arc(self.columns.as_ref(), columns) && same_arc(self.collection.as_ref(), collection)
    }

    /// Rebuilds if either input changed identity, reporting data anomalies
    /// through `tracing`. Returns `true` if a rebuild happened.
    pub fn refresh(&mut self, columns: &Arc<[FilterColumn]>, collection: &Arc<[R]>) -> bool {
        self.refresh_with(columns, collection, &TracingSink)
    }

    /// Like [`refresh`](Self::refresh), reporting to `sink`.
    pub fn refresh_with(
        &mut self,
        columns: &Arc<[FilterColumn]>,
        collection: &Arc<[R]>,
        sink: &dyn DiagnosticSink,
    ) -> bool {
        if self.is_current(columns, collection) {
            return false;
        }

        self.structure = build_filter_structure_with(columns, collection, sink);
        // An empty collection offers no values; keep selections for when data returns.
        if !collection.is_empty() {
            self.filter = self.filter.rebase(&self.structure);
        }
        self.columns = Some(Arc::clone(columns));
        self.collection = Some(Arc::clone(collection));
        self.version += 1;

        tracing::debug!(
            target: "gridkit",
            version = self.version,
            columns = self.structure.len(),
            records = collection.len(),
            "rebuilt filter structure"
        );
        true
    }

    /// Pristine structure from the last rebuild.
    pub fn structure(&self) -> &FilterStructure {
        &self.structure
    }

    /// Live filter state.
    pub fn filter(&self) -> &TableFilter {
        &self.filter
    }

    /// Number of rebuilds so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Applies `action` to the live filter.
    ///
    /// On error the live filter is left unchanged.
    pub fn dispatch(&mut self, action: &FilterAction) -> Result<&TableFilter> {
        self.filter = reduce(&self.filter, action)?;
        Ok(&self.filter)
    }
}

/// Mapped row data for one table.
pub struct RowDataCache<T> {
    columns: Option<Arc<[Column<T>]>>,
    collection: Option<Arc<[T]>>,
    rows: Arc<[RowData]>,
    version: u64,
}

impl<T> Default for RowDataCache<T> {
    fn default() -> Self {
        RowDataCache {
            columns: None,
            collection: None,
            rows: Arc::from(Vec::new()),
            version: 0,
        }
    }
}

impl<T> std::fmt::Debug for RowDataCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowDataCache")
            .field("rows", &self.rows.len())
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl<T: Record> RowDataCache<T> {
    /// An empty cache at version 0.
    pub fn new() -> Self {
        RowDataCache::default()
    }

    /// Row data for `collection` through `columns`, remapped only when
    /// either changed identity.
    pub fn rows(&mut self, collection: &Arc<[T]>, columns: &Arc<[Column<T>]>) -> Arc<[RowData]> {
        let current = same_arc(self.collection.as_ref(), collection)
            && same_arc(self.columns.as_ref(), columns);

        if !current {
            self.rows = Arc::from(map_to_data(collection, columns));
            self.collection = Some(Arc::clone(collection));
            self.columns = Some(Arc::clone(columns));
            self.version += 1;
            tracing::debug!(
                target: "gridkit",
                version = self.version,
                rows = self.rows.len(),
                "remapped row data"
            );
        }

        Arc::clone(&self.rows)
    }

    /// Number of remaps so far.
    pub fn version(&self) -> u64 {
        self.version
    }
}
