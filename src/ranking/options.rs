use std::borrow::Borrow;
use std::collections::HashSet;

use itertools::Itertools;

use super::sort::collate;
use crate::model::Record;

/// Which picker an option list feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    Guild,
    Union,
    Realm,
}

impl OptionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "guild" | "guilds" => Some(Self::Guild),
            "union" | "unions" => Some(Self::Union),
            "realm" | "realms" => Some(Self::Realm),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Guild => "Guild",
            Self::Union => "Union",
            Self::Realm => "Realm",
        }
    }
}

pub fn options_for<R>(records: &[R], kind: OptionKind, search: &str) -> Vec<String>
where
    R: Borrow<Record>,
{
    match kind {
        OptionKind::Guild => search_plain(guild_options(records), search),
        OptionKind::Union => search_plain(union_options(records), search),
        OptionKind::Realm => realm_options(records, search),
    }
}

pub fn guild_options<R>(records: &[R]) -> Vec<String>
where
    R: Borrow<Record>,
{
    distinct_sorted(records.iter().map(|r| r.borrow().guild.as_str()))
}

pub fn union_options<R>(records: &[R]) -> Vec<String>
where
    R: Borrow<Record>,
{
    distinct_sorted(records.iter().map(|r| r.borrow().union.as_str()))
}

/// Realm groups plus `group/realm` pairs. A non-empty `search` narrows the
/// list and floats groups starting with it to the top.
pub fn realm_options<R>(records: &[R], search: &str) -> Vec<String>
where
    R: Borrow<Record>,
{
    let groups = records.iter().map(|r| r.borrow().realm_group.clone());
    let pairs = records.iter().map(|r| r.borrow().realm_key());
    let mut seen: HashSet<String> = HashSet::new();
    let all: Vec<String> = groups
        .chain(pairs)
        .filter(|o| !o.is_empty())
        .filter(|o| seen.insert(o.clone()))
        .collect();

    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return all.into_iter().sorted_by(|a, b| collate(a, b)).collect();
    }

    all.into_iter()
        .filter(|option| realm_option_matches(option, &needle))
        .sorted_by(|a, b| {
            let a_first = group_of(a).to_lowercase().starts_with(&needle);
            let b_first = group_of(b).to_lowercase().starts_with(&needle);
            b_first.cmp(&a_first).then_with(|| collate(a, b))
        })
        .collect()
}

fn realm_option_matches(option: &str, needle: &str) -> bool {
    let lower = option.to_lowercase();
    let (group, realm) = match lower.split_once('/') {
        Some((g, r)) => (g, Some(r)),
        None => (lower.as_str(), None),
    };
    group.contains(needle) || realm.map_or(false, |r| r.contains(needle)) || lower.contains(needle)
}

fn group_of(option: &str) -> &str {
    option.split_once('/').map_or(option, |(g, _)| g)
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .unique()
        .sorted_by(|a, b| collate(a, b))
        .map(str::to_string)
        .collect()
}

fn search_plain(options: Vec<String>, search: &str) -> Vec<String> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return options;
    }
    options
        .into_iter()
        .filter(|o| o.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::record;

    fn sample() -> Vec<Record> {
        vec![
            record("a", "Iron Wolves", "North", "SEA201", "Knight", 1.0),
            record("b", "azure", "North", "SEA201", "Archer", 1.0),
            record("c", "Iron Wolves", "", "ASIA1", "SEA-Gate", 1.0),
            record("d", "", "South", "EU1", "Knight", 1.0),
        ]
    }

    #[test]
    fn guild_options_are_distinct_sorted_and_skip_blanks() {
        assert_eq!(guild_options(&sample()), vec!["azure", "Iron Wolves"]);
        assert_eq!(union_options(&sample()), vec!["North", "South"]);
    }

    #[test]
    fn realm_options_list_groups_and_pairs() {
        let out = realm_options(&sample(), "");
        assert_eq!(
            out,
            vec![
                "ASIA1",
                "ASIA1/SEA-Gate",
                "EU1",
                "EU1/Knight",
                "SEA201",
                "SEA201/Archer",
                "SEA201/Knight",
            ]
        );
    }

    #[test]
    fn realm_search_prefers_group_prefix_matches() {
        let out = realm_options(&sample(), "sea");
        assert_eq!(
            out,
            vec!["SEA201", "SEA201/Archer", "SEA201/Knight", "ASIA1/SEA-Gate"]
        );
    }

    #[test]
    fn realm_search_matches_realm_part() {
        let out = realm_options(&sample(), "knight");
        assert_eq!(out, vec!["EU1/Knight", "SEA201/Knight"]);
    }

    #[test]
    fn plain_search_narrows_guilds() {
        let out = options_for(&sample(), OptionKind::Guild, "WOLV");
        assert_eq!(out, vec!["Iron Wolves"]);
    }
}
