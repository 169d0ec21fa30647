//! Client-side ranking pipeline: filter, sort, limit, then aggregate and
//! paginate the resulting view. Every stage is a pure function over a
//! borrowed slice and never fails.

use std::borrow::Borrow;

use crate::model::Record;

pub mod filters;
pub mod options;
pub mod page;
pub mod sort;
pub mod stats;

pub use filters::{filter, CriteriaPatch, FilterCriteria};
pub use options::{guild_options, options_for, realm_options, union_options, OptionKind};
pub use page::{paginate, Page, PAGE_SIZE};
pub use sort::{sort, sort_in_place, SortDirection, SortField, SortSpec};
pub use stats::{aggregate, Aggregate};

pub const TOP_N: usize = 20;

/// Leading `TOP_N` records of an already sorted view when `enabled`.
pub fn limit<R>(records: &[R], enabled: bool) -> &[R] {
    if enabled {
        &records[..records.len().min(TOP_N)]
    } else {
        records
    }
}

/// Runs filter -> sort -> limit over `records`.
pub fn build_view<'a, R>(
    records: &'a [R],
    criteria: &FilterCriteria,
    spec: SortSpec,
    top_n: bool,
) -> Vec<&'a Record>
where
    R: Borrow<Record>,
{
    let mut view = filter(records, criteria);
    sort_in_place(&mut view, spec);
    let kept = limit(&view, top_n).len();
    view.truncate(kept);
    view
}
