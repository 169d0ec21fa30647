use std::borrow::Borrow;

use serde::{Deserialize, Serialize};

use crate::model::Record;

/// Conjunction of record predicates. An empty field places no constraint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct FilterCriteria {
    pub name_query: String,
    pub guild: String,
    pub union: String,
    pub realm: String,
}

/// Partial update merged into the current criteria. `None` leaves a field
/// untouched, `Some("")` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CriteriaPatch {
    pub name_query: Option<String>,
    pub guild: Option<String>,
    pub union: Option<String>,
    pub realm: Option<String>,
}

impl CriteriaPatch {
    pub fn name(value: impl Into<String>) -> Self {
        Self {
            name_query: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn guild(value: impl Into<String>) -> Self {
        Self {
            guild: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn union(value: impl Into<String>) -> Self {
        Self {
            union: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn realm(value: impl Into<String>) -> Self {
        Self {
            realm: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn clear_all() -> Self {
        Self {
            name_query: Some(String::new()),
            guild: Some(String::new()),
            union: Some(String::new()),
            realm: Some(String::new()),
        }
    }
}

impl FilterCriteria {
    /// Applies `patch`; returns whether anything changed.
    pub fn merge(&mut self, patch: CriteriaPatch) -> bool {
        let before = self.clone();
        if let Some(v) = patch.name_query {
            self.name_query = v;
        }
        if let Some(v) = patch.guild {
            self.guild = v;
        }
        if let Some(v) = patch.union {
            self.union = v;
        }
        if let Some(v) = patch.realm {
            self.realm = v;
        }
        *self != before
    }

    pub fn is_unconstrained(&self) -> bool {
        self.name_query.is_empty()
            && self.guild.is_empty()
            && self.union.is_empty()
            && self.realm.is_empty()
    }
}

// criteria with the case-folded needles computed once per filter pass
struct Matcher<'c> {
    criteria: &'c FilterCriteria,
    name_lower: String,
    realm_lower: String,
}

impl<'c> Matcher<'c> {
    fn new(criteria: &'c FilterCriteria) -> Self {
        Self {
            criteria,
            name_lower: criteria.name_query.to_lowercase(),
            realm_lower: criteria.realm.to_lowercase(),
        }
    }

    fn matches(&self, record: &Record) -> bool {
        let c = self.criteria;
        if !c.guild.is_empty() && record.guild != c.guild {
            return false;
        }
        if !c.union.is_empty() && record.union != c.union {
            return false;
        }
        if !c.realm.is_empty()
            && !record.realm_key_eq(&c.realm)
            && !record.realm_group.to_lowercase().contains(&self.realm_lower)
        {
            return false;
        }
        self.name_lower.is_empty() || record.name.to_lowercase().contains(&self.name_lower)
    }
}

/// Keeps the records matching every non-empty criterion, in input order.
pub fn filter<'a, R>(records: &'a [R], criteria: &FilterCriteria) -> Vec<&'a Record>
where
    R: Borrow<Record>,
{
    if criteria.is_unconstrained() {
        return records.iter().map(|r| r.borrow()).collect();
    }
    let matcher = Matcher::new(criteria);
    records
        .iter()
        .map(|r| r.borrow())
        .filter(|r| matcher.matches(r))
        .collect()
}
