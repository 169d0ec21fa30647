use std::borrow::{Borrow, Cow};
use std::cmp::Ordering;
use std::fmt;

use deunicode::deunicode_char;
use serde::{Deserialize, Serialize};

use crate::model::Record;

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The record attributes a view can be ordered by.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Rank,
    Name,
    Score,
    Guild,
    Union,
    Realm,
    RealmGroup,
    WeaponType,
    DeltaRank,
}

impl SortField {
    pub const ALL: [SortField; 9] = [
        Self::Rank,
        Self::Name,
        Self::Score,
        Self::Guild,
        Self::Union,
        Self::Realm,
        Self::RealmGroup,
        Self::WeaponType,
        Self::DeltaRank,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace('-', "_").as_str() {
            "rank" => Some(Self::Rank),
            "name" | "player" | "character" => Some(Self::Name),
            "score" | "growth" => Some(Self::Score),
            "guild" => Some(Self::Guild),
            "union" => Some(Self::Union),
            "realm" => Some(Self::Realm),
            "realm_group" | "group" => Some(Self::RealmGroup),
            "weapon" | "weapon_type" => Some(Self::WeaponType),
            "delta" | "delta_rank" => Some(Self::DeltaRank),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rank => "rank",
            Self::Name => "name",
            Self::Score => "score",
            Self::Guild => "guild",
            Self::Union => "union",
            Self::Realm => "realm",
            Self::RealmGroup => "realm_group",
            Self::WeaponType => "weapon_type",
            Self::DeltaRank => "delta_rank",
        }
    }

    pub fn value_of(self, record: &Record) -> FieldValue<'_> {
        match self {
            Self::Rank => FieldValue::Number(f64::from(record.rank)),
            Self::Score => FieldValue::Number(record.score),
            Self::WeaponType => FieldValue::Number(record.weapon_type as f64),
            Self::DeltaRank => FieldValue::Number(record.delta_rank as f64),
            Self::Name => FieldValue::Text(Cow::Borrowed(&record.name)),
            Self::Guild => FieldValue::Text(Cow::Borrowed(&record.guild)),
            Self::Union => FieldValue::Text(Cow::Borrowed(&record.union)),
            Self::Realm => FieldValue::Text(Cow::Borrowed(&record.realm)),
            Self::RealmGroup => FieldValue::Text(Cow::Borrowed(&record.realm_group)),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Column-header click: the same field flips direction, a new field
    /// starts ascending.
    pub fn select(self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(Cow<'a, str>),
}

impl FieldValue<'_> {
    fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s.as_ref()),
        }
    }
}

/// Ascending comparison: numeric when both sides are numbers, collated
/// text otherwise.
pub fn compare_values(a: &FieldValue<'_>, b: &FieldValue<'_>) -> Ordering {
    match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => collate(&a.as_text(), &b.as_text()),
    }
}

/// Case-insensitive text ordering. Accented Latin letters compare as their
/// base letter first so accents only break ties; other scripts sort after
/// Latin.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
}

// Only Latin letters are folded; anything else keeps its code point.
fn collation_key(value: &str) -> String {
    let mut key = String::with_capacity(value.len());
    for c in value.chars() {
        match deunicode_char(c).filter(|_| is_accented_latin(c)) {
            Some(base) => key.push_str(base),
            None => key.push(c),
        }
    }
    key.to_lowercase()
}

fn is_accented_latin(c: char) -> bool {
    matches!(
        c,
        '\u{00C0}'..='\u{00D6}'
            | '\u{00D8}'..='\u{00F6}'
            | '\u{00F8}'..='\u{024F}'
            | '\u{1E00}'..='\u{1EFF}'
    )
}

/// Returns a new ordering of `records`. Exact ties keep their input order.
pub fn sort<'a, R>(records: &'a [R], spec: SortSpec) -> Vec<&'a Record>
where
    R: Borrow<Record>,
{
    let mut out: Vec<&'a Record> = records.iter().map(|r| r.borrow()).collect();
    sort_in_place(&mut out, spec);
    out
}

/// Stable in-place variant of [`sort`] for views that are already borrowed.
pub fn sort_in_place(view: &mut [&Record], spec: SortSpec) {
    view.sort_by(|a, b| {
        let ord = compare_values(&spec.field.value_of(a), &spec.field.value_of(b));
        spec.direction.apply(ord)
    });
}
