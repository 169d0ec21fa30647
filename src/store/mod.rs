use tracing::{debug, info};

use crate::api::FetchError;
use crate::model::{Record, RegionResponse};

/// The last successfully fetched record set for one region.
#[derive(Clone, Debug, Default)]
pub struct RegionSnapshot {
    pub region_code: i64,
    pub records: Vec<Record>,
    pub total_unique: u64,
    pub total_fetched: u64,
    pub timestamp: String,
}

impl RegionSnapshot {
    pub fn from_response(region_code: i64, response: RegionResponse) -> Self {
        Self {
            region_code,
            records: response.items,
            total_unique: response.total_unique,
            total_fetched: response.total_fetched,
            timestamp: response.timestamp,
        }
    }
}

/// How a resolved fetch is reconciled with fetches issued after it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResolvePolicy {
    /// Every successful response replaces the store, in resolution order.
    #[default]
    LastResolvedWins,
    /// Responses to anything but the newest request are dropped.
    DiscardStale,
}

/// Handed out when a fetch is issued; keyed by the region requested at
/// call time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: u64,
    pub region_code: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    DiscardedStale,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    snapshot: Option<RegionSnapshot>,
    policy: ResolvePolicy,
    issued: u64,
}

impl RecordStore {
    pub fn new(policy: ResolvePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn records(&self) -> &[Record] {
        self.snapshot
            .as_ref()
            .map(|s| s.records.as_slice())
            .unwrap_or(&[])
    }

    pub fn snapshot(&self) -> Option<&RegionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn region_code(&self) -> Option<i64> {
        self.snapshot.as_ref().map(|s| s.region_code)
    }

    pub fn begin_fetch(&mut self, region_code: i64) -> FetchTicket {
        self.issued += 1;
        debug!(id = self.issued, region_code, "fetch issued");
        FetchTicket {
            id: self.issued,
            region_code,
        }
    }

    pub fn is_stale(&self, ticket: FetchTicket) -> bool {
        ticket.id < self.issued
    }

    /// Applies a finished fetch. A failure leaves the current snapshot in
    /// place and is handed back to the caller.
    pub fn resolve(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<RegionResponse, FetchError>,
    ) -> Result<Resolution, FetchError> {
        let response = outcome?;
        if self.policy == ResolvePolicy::DiscardStale && self.is_stale(ticket) {
            info!(
                id = ticket.id,
                region_code = ticket.region_code,
                newest = self.issued,
                "discarding stale response"
            );
            return Ok(Resolution::DiscardedStale);
        }
        self.replace(RegionSnapshot::from_response(ticket.region_code, response));
        Ok(Resolution::Applied)
    }

    /// Swaps in a whole new record set.
    pub fn replace(&mut self, snapshot: RegionSnapshot) {
        info!(
            region_code = snapshot.region_code,
            records = snapshot.records.len(),
            total_unique = snapshot.total_unique,
            "record store replaced"
        );
        self.snapshot = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::numbered;

    fn response(n: usize) -> RegionResponse {
        RegionResponse {
            items: numbered(n),
            total_unique: n as u64 * 10,
            total_fetched: n as u64,
            region_code: String::new(),
            timestamp: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    fn status_error() -> FetchError {
        FetchError::Status {
            url: "http://example.com/growth-top-players".to_string(),
            status: 503,
        }
    }

    #[test]
    fn empty_store_has_no_records() {
        let store = RecordStore::default();
        assert!(store.records().is_empty());
        assert_eq!(store.region_code(), None);
    }

    #[test]
    fn failure_keeps_previous_snapshot() {
        let mut store = RecordStore::default();
        let t1 = store.begin_fetch(2020);
        store.resolve(t1, Ok(response(3))).unwrap();

        let t2 = store.begin_fetch(1010);
        assert!(store.resolve(t2, Err(status_error())).is_err());
        assert_eq!(store.records().len(), 3);
        assert_eq!(store.region_code(), Some(2020));
        assert_eq!(store.snapshot().map(|s| s.total_unique), Some(30));
    }

    #[test]
    fn last_resolved_wins_by_default() {
        let mut store = RecordStore::default();
        let older = store.begin_fetch(2020);
        let newer = store.begin_fetch(1010);

        assert_eq!(
            store.resolve(newer, Ok(response(2))).unwrap(),
            Resolution::Applied
        );
        assert_eq!(
            store.resolve(older, Ok(response(5))).unwrap(),
            Resolution::Applied
        );
        assert_eq!(store.region_code(), Some(2020));
        assert_eq!(store.records().len(), 5);
    }

    #[test]
    fn discard_stale_keeps_the_newest_request() {
        let mut store = RecordStore::new(ResolvePolicy::DiscardStale);
        let older = store.begin_fetch(2020);
        let newer = store.begin_fetch(1010);

        store.resolve(newer, Ok(response(2))).unwrap();
        assert_eq!(
            store.resolve(older, Ok(response(5))).unwrap(),
            Resolution::DiscardedStale
        );
        assert_eq!(store.region_code(), Some(1010));
        assert_eq!(store.records().len(), 2);
    }
}
