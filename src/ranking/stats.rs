use std::borrow::Borrow;
use std::collections::HashSet;

use serde::Serialize;

use crate::model::Record;

/// Summary statistics over one view.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Aggregate {
    pub total: usize,
    pub distinct_guilds: usize,
    pub distinct_realms: usize,
    pub average_score: f64,
}

pub fn aggregate<R>(view: &[R]) -> Aggregate
where
    R: Borrow<Record>,
{
    if view.is_empty() {
        return Aggregate::default();
    }

    let mut guilds: HashSet<&str> = HashSet::new();
    let mut realms: HashSet<String> = HashSet::new();
    let mut score_sum = 0.0;
    for r in view.iter().map(|r| r.borrow()) {
        guilds.insert(r.guild.as_str());
        realms.insert(r.realm_key());
        score_sum += r.score;
    }

    Aggregate {
        total: view.len(),
        distinct_guilds: guilds.len(),
        distinct_realms: realms.len(),
        average_score: score_sum / view.len() as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::record;

    #[test]
    fn empty_view_is_zeroed() {
        let view: Vec<Record> = Vec::new();
        let stats = aggregate(&view);
        assert_eq!(stats, Aggregate::default());
        assert_eq!(stats.average_score, 0.0);
    }

    #[test]
    fn counts_distinct_guilds_and_composite_realms() {
        let view = vec![
            record("a", "G1", "", "SEA1", "X", 10.0),
            record("b", "G1", "", "SEA1", "Y", 20.0),
            record("c", "G2", "", "SEA2", "X", 30.0),
            record("d", "G2", "", "SEA1", "X", 40.0),
        ];
        let stats = aggregate(&view);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.distinct_guilds, 2);
        assert_eq!(stats.distinct_realms, 3);
        assert_eq!(stats.average_score, 25.0);
    }

    #[test]
    fn realms_are_counted_by_composite_key() {
        // both spell "A/B/C"
        let view = vec![
            record("a", "G1", "", "A/B", "C", 1.0),
            record("b", "G1", "", "A", "B/C", 1.0),
        ];
        assert_eq!(aggregate(&view).distinct_realms, 1);
    }
}
