use serde::Serialize;
use tracing::debug;

use crate::api::FetchError;
use crate::model::{Record, RegionResponse};
use crate::ranking::{
    aggregate, build_view, options_for, paginate, Aggregate, CriteriaPatch, FilterCriteria,
    OptionKind, Page, SortField, SortSpec, PAGE_SIZE,
};
use crate::store::{FetchTicket, RecordStore, RegionSnapshot, Resolution, ResolvePolicy};

/// Statistics block shown above the table.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    #[serde(flatten)]
    pub stats: Aggregate,
    /// Server-reported distinct count for the whole region.
    pub total_unique: u64,
    pub total_fetched: u64,
    pub last_updated: Option<String>,
}

/// Holds the record store plus the user's view parameters, and re-derives
/// the displayed view after every mutation.
#[derive(Debug)]
pub struct ViewController {
    store: RecordStore,
    criteria: FilterCriteria,
    sort: SortSpec,
    top_n: bool,
    current_page: usize,
    last_updated: Option<String>,
    view: Vec<Record>,
    stats: Aggregate,
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new(ResolvePolicy::default())
    }
}

impl ViewController {
    pub fn new(policy: ResolvePolicy) -> Self {
        Self {
            store: RecordStore::new(policy),
            criteria: FilterCriteria::default(),
            sort: SortSpec::default(),
            top_n: false,
            current_page: 1,
            last_updated: None,
            view: Vec::new(),
            stats: Aggregate::default(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    pub fn top_n(&self) -> bool {
        self.top_n
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// The filtered, sorted and limited records.
    pub fn view(&self) -> &[Record] {
        &self.view
    }

    pub fn page(&self) -> Page<'_, Record> {
        paginate(&self.view, PAGE_SIZE, self.current_page)
    }

    pub fn total_pages(&self) -> usize {
        crate::ranking::page::total_pages(self.view.len(), PAGE_SIZE)
    }

    pub fn summary(&self) -> Summary {
        let snapshot = self.store.snapshot();
        Summary {
            stats: self.stats.clone(),
            total_unique: snapshot.map(|s| s.total_unique).unwrap_or_default(),
            total_fetched: snapshot.map(|s| s.total_fetched).unwrap_or_default(),
            last_updated: self.last_updated.clone(),
        }
    }

    pub fn options(&self, kind: OptionKind, search: &str) -> Vec<String> {
        options_for(self.store.records(), kind, search)
    }

    pub fn set_last_updated(&mut self, value: Option<String>) {
        self.last_updated = value.filter(|v| !v.trim().is_empty());
    }

    pub fn begin_fetch(&mut self, region_code: i64) -> FetchTicket {
        self.store.begin_fetch(region_code)
    }

    /// Feeds a finished fetch through the store; the view is rebuilt only
    /// when the store actually changed.
    pub fn resolve_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<RegionResponse, FetchError>,
    ) -> Result<Resolution, FetchError> {
        let resolution = self.store.resolve(ticket, outcome)?;
        if resolution == Resolution::Applied {
            self.current_page = 1;
            self.recompute();
        }
        Ok(resolution)
    }

    pub fn replace_records(&mut self, snapshot: RegionSnapshot) {
        self.store.replace(snapshot);
        self.current_page = 1;
        self.recompute();
    }

    /// Merges `patch` into the criteria. Returns whether they changed.
    pub fn set_filter(&mut self, patch: CriteriaPatch) -> bool {
        let changed = self.criteria.merge(patch);
        if changed {
            self.current_page = 1;
            self.recompute();
        }
        changed
    }

    /// Header-click semantics: same field toggles, new field sorts ascending.
    pub fn sort_column(&mut self, field: SortField) -> SortSpec {
        self.sort = self.sort.select(field);
        self.recompute();
        self.sort
    }

    pub fn set_sort(&mut self, spec: SortSpec) {
        self.sort = spec;
        self.recompute();
    }

    pub fn set_top_n(&mut self, enabled: bool) {
        if self.top_n != enabled {
            self.top_n = enabled;
            self.current_page = 1;
            self.recompute();
        }
    }

    pub fn toggle_top_n(&mut self) -> bool {
        self.set_top_n(!self.top_n);
        self.top_n
    }

    /// Moves to `page`, clamped to the pages that exist.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = page.clamp(1, self.total_pages());
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.current_page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.current_page.saturating_sub(1))
    }

    fn recompute(&mut self) {
        let records = self.store.records();
        let view = build_view(records, &self.criteria, self.sort, self.top_n);
        self.stats = aggregate(&view);
        self.view = view.into_iter().cloned().collect();
        debug!(
            source = records.len(),
            view = self.view.len(),
            sort = %self.sort.field,
            direction = %self.sort.direction,
            top_n = self.top_n,
            "view recomputed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::SortDirection;
    use crate::tests::{numbered, snapshot};

    fn loaded(n: usize) -> ViewController {
        let mut vc = ViewController::default();
        vc.replace_records(snapshot(numbered(n)));
        vc
    }

    #[test]
    fn replacing_records_rebuilds_the_view() {
        let vc = loaded(73);
        assert_eq!(vc.view().len(), 73);
        assert_eq!(vc.total_pages(), 2);
        assert_eq!(vc.summary().stats.total, 73);
        assert_eq!(vc.summary().total_unique, 730);
    }

    #[test]
    fn filter_change_resets_the_page() {
        let mut vc = loaded(120);
        assert_eq!(vc.set_page(3), 3);
        assert!(vc.set_filter(CriteriaPatch::name("player-1")));
        assert_eq!(vc.current_page(), 1);
        // unchanged criteria leave the page alone
        vc.set_page(1);
        assert!(!vc.set_filter(CriteriaPatch::name("player-1")));
    }

    #[test]
    fn sorting_keeps_the_page() {
        let mut vc = loaded(120);
        vc.set_page(2);
        vc.sort_column(SortField::Score);
        assert_eq!(vc.current_page(), 2);
    }

    #[test]
    fn page_requests_are_clamped() {
        let mut vc = loaded(73);
        assert_eq!(vc.set_page(0), 1);
        assert_eq!(vc.set_page(9), 2);
        assert_eq!(vc.next_page(), 2);
        assert_eq!(vc.prev_page(), 1);
        assert_eq!(vc.prev_page(), 1);
    }

    #[test]
    fn top_n_limits_view_and_stats() {
        let mut vc = loaded(73);
        vc.set_page(2);
        assert!(vc.toggle_top_n());
        assert_eq!(vc.view().len(), 20);
        assert_eq!(vc.current_page(), 1);
        assert_eq!(vc.summary().stats.total, 20);
        assert!(!vc.toggle_top_n());
        assert_eq!(vc.view().len(), 73);
    }

    #[test]
    fn sort_column_toggles_then_resets() {
        let mut vc = loaded(3);
        let spec = vc.sort_column(SortField::Score);
        assert_eq!(spec.direction, SortDirection::Asc);
        let spec = vc.sort_column(SortField::Score);
        assert_eq!(spec.direction, SortDirection::Desc);
        assert_eq!(vc.view()[0].name, "player-003");
        let spec = vc.sort_column(SortField::Name);
        assert_eq!(spec, SortSpec::new(SortField::Name, SortDirection::Asc));
    }

    #[test]
    fn failed_fetch_keeps_the_view() {
        let mut vc = loaded(5);
        let ticket = vc.begin_fetch(1010);
        let err = vc
            .resolve_fetch(
                ticket,
                Err(FetchError::Status {
                    url: "http://example.com".to_string(),
                    status: 500,
                }),
            )
            .unwrap_err();
        assert!(err.to_string().contains("500"));
        assert_eq!(vc.view().len(), 5);
    }

    #[test]
    fn empty_store_renders_an_empty_first_page() {
        let vc = ViewController::default();
        let page = vc.page();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(vc.summary(), Summary::default());
    }
}
