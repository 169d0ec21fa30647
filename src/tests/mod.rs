use crate::controller::ViewController;
use crate::model::Record;
use crate::ranking::{
    aggregate, filter, limit, paginate, sort, CriteriaPatch, FilterCriteria, SortDirection,
    SortField, SortSpec, PAGE_SIZE,
};
use crate::store::RegionSnapshot;


pub(crate) fn record(
    name: &str,
    guild: &str,
    union: &str,
    realm_group: &str,
    realm: &str,
    score: f64,
) -> Record {
    Record {
        rank: 1,
        name: name.to_string(),
        score,
        guild: guild.to_string(),
        union: union.to_string(),
        realm_group: realm_group.to_string(),
        realm: realm.to_string(),
        weapon_type: 21,
        delta_rank: 0,
        region_id: 2020,
        region_name: "ASIA II".to_string(),
        record_time: String::new(),
        max_rank_date: String::new(),
        total_count: 0,
    }
}

/// `n` records ranked 1..=n, named `player-001`.., scoring their rank.
pub(crate) fn numbered(n: usize) -> Vec<Record> {
    (1..=n)
        .map(|i| {
            let mut r = record(
                &format!("player-{i:03}"),
                &format!("G{}", i % 7),
                &format!("U{}", i % 3),
                &format!("SEA{}", i % 4),
                &format!("R{}", i % 5),
                i as f64,
            );
            r.rank = i as u32;
            r
        })
        .collect()
}

pub(crate) fn snapshot(records: Vec<Record>) -> RegionSnapshot {
    RegionSnapshot {
        region_code: 2020,
        total_unique: records.len() as u64 * 10,
        total_fetched: records.len() as u64,
        records,
        timestamp: "2025-01-01T00:00:00Z".to_string(),
    }
}

fn names<'a>(view: impl IntoIterator<Item = &'a Record>) -> Vec<&'a str> {
    view.into_iter().map(|r| r.name.as_str()).collect()
}

fn ana_and_bo() -> Vec<Record> {
    vec![
        record("Ana", "G1", "", "SEA1", "X", 10.0),
        record("Bo", "G2", "", "SEA1", "Y", 20.0),
    ]
}

#[test]
fn realm_group_selects_every_realm_under_it() {
    let records = ana_and_bo();
    let by_group = FilterCriteria {
        realm: "SEA1".to_string(),
        ..Default::default()
    };
    assert_eq!(names(filter(&records, &by_group)), vec!["Ana", "Bo"]);

    let by_pair = FilterCriteria {
        realm: "SEA1/X".to_string(),
        ..Default::default()
    };
    assert_eq!(names(filter(&records, &by_pair)), vec!["Ana"]);
}

#[test]
fn score_header_click_toggles_direction() {
    let mut vc = ViewController::default();
    vc.replace_records(snapshot(ana_and_bo()));
    vc.set_sort(SortSpec::new(SortField::Score, SortDirection::Desc));
    assert_eq!(names(vc.view()), vec!["Bo", "Ana"]);

    vc.sort_column(SortField::Score);
    assert_eq!(names(vc.view()), vec!["Ana", "Bo"]);
}

#[test]
fn second_page_of_seventy_three() {
    let records = numbered(73);
    let page = paginate(&records, PAGE_SIZE, 2);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.start_index, 50);
    assert_eq!(page.end_index, 73);
    assert_eq!(page.items.len(), 23);
    assert_eq!(page.items[0].rank, 51);
    assert_eq!(page.items[22].rank, 73);
}

#[test]
fn top_twenty_is_a_prefix_of_the_sorted_view() {
    let records = numbered(73);
    let spec = SortSpec::new(SortField::Name, SortDirection::Desc);
    let sorted = sort(&records, spec);
    let top = limit(&sorted, true);
    assert_eq!(top.len(), 20);
    assert_eq!(top, &sorted[..20]);
}

#[test]
fn name_query_is_case_insensitive() {
    let records = vec![
        record("Ana", "", "", "", "", 0.0),
        record("Banner", "", "", "", "", 0.0),
        record("Bo", "", "", "", "", 0.0),
    ];
    let c = FilterCriteria {
        name_query: "an".to_string(),
        ..Default::default()
    };
    assert_eq!(names(filter(&records, &c)), vec!["Ana", "Banner"]);
}

#[test]
fn aggregate_of_nothing_is_zero() {
    let stats = aggregate::<Record>(&[]);
    assert_eq!(stats.total, 0);
    assert_eq!(stats.distinct_guilds, 0);
    assert_eq!(stats.distinct_realms, 0);
    assert_eq!(stats.average_score, 0.0);
}

#[test]
fn zero_matches_is_a_displayable_state() {
    let mut vc = ViewController::default();
    vc.replace_records(snapshot(numbered(10)));
    vc.set_filter(CriteriaPatch::guild("nobody"));
    let page = vc.page();
    assert!(page.items.is_empty());
    assert_eq!(page.display_bounds(), (0, 0));
    assert_eq!(vc.summary().stats.total, 0);
    assert_eq!(vc.summary().total_unique, 100);
}

#[test]
fn filtering_never_renumbers_server_rank() {
    let records = numbered(30);
    let c = FilterCriteria {
        guild: "G3".to_string(),
        ..Default::default()
    };
    let ranks: Vec<u32> = filter(&records, &c).iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![3, 10, 17, 24]);
}
