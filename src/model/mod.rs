use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

pub mod weapons;

pub use weapons::{weapon_glyph, weapon_label};

/// Sentinel region code the backend uses for "no region".
pub const NO_REGION: i64 = 0;

// one ranked character as delivered by the backend
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Record {
    #[serde(default)]
    pub rank: u32,
    #[serde(rename = "CharacterName", deserialize_with = "string_or_null")]
    pub name: String,
    #[serde(default, deserialize_with = "number_or_null")]
    pub score: f64,
    #[serde(rename = "GuildName", default, deserialize_with = "string_or_null")]
    pub guild: String,
    #[serde(
        rename = "GuildUnionName",
        default,
        deserialize_with = "string_or_null"
    )]
    pub union: String,
    #[serde(
        rename = "RealmGroupName",
        default,
        deserialize_with = "string_or_null"
    )]
    pub realm_group: String,
    #[serde(rename = "RealmName", default, deserialize_with = "string_or_null")]
    pub realm: String,
    #[serde(rename = "pcWeaponType", default)]
    pub weapon_type: i64,
    #[serde(rename = "deltaRank", default)]
    pub delta_rank: i64,
    #[serde(rename = "RegionID", default)]
    pub region_id: i64,
    #[serde(rename = "RegionName", default, deserialize_with = "string_or_null")]
    pub region_name: String,
    #[serde(rename = "recordTime", default, deserialize_with = "string_or_null")]
    pub record_time: String,
    #[serde(rename = "MaxRankDate", default, deserialize_with = "string_or_null")]
    pub max_rank_date: String,
    #[serde(rename = "TotalCount", default)]
    pub total_count: i64,
}

impl Record {
    /// Composite `realmGroup/realm` key used for exact realm matching and
    /// distinct-realm counting.
    pub fn realm_key(&self) -> String {
        format!("{}/{}", self.realm_group, self.realm)
    }

    /// Compares against a composite key without allocating one.
    pub fn realm_key_eq(&self, key: &str) -> bool {
        key.strip_prefix(self.realm_group.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .map_or(false, |realm| realm == self.realm)
    }

    pub fn weapon_label(&self) -> &'static str {
        weapon_label(self.weapon_type)
    }

    pub fn rank_tier(&self) -> RankTier {
        RankTier::of(self.rank)
    }
}

/// Display tier derived from the server rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankTier {
    First,
    Second,
    Third,
    TopTen,
    TopHundred,
    Other,
}

impl RankTier {
    pub fn of(rank: u32) -> Self {
        match rank {
            1 => Self::First,
            2 => Self::Second,
            3 => Self::Third,
            4..=10 => Self::TopTen,
            11..=100 => Self::TopHundred,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Region {
    pub code: i64,
    #[serde(deserialize_with = "string_or_null")]
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub weapon_types: BTreeMap<String, i64>,
    #[serde(default)]
    pub ranking_types: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "string_or_null")]
    pub last_updated: String,
}

impl Metadata {
    pub fn selectable_regions(&self) -> Vec<&Region> {
        selectable_regions(&self.regions)
    }

    pub fn region_name(&self, code: i64) -> Option<&str> {
        self.regions
            .iter()
            .find(|r| r.code == code && r.code != NO_REGION)
            .map(|r| r.name.as_str())
    }
}

/// Regions in delivered order with the "no region" sentinel removed.
pub fn selectable_regions(regions: &[Region]) -> Vec<&Region> {
    regions.iter().filter(|r| r.code != NO_REGION).collect()
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionResponse {
    #[serde(default)]
    pub items: Vec<Record>,
    #[serde(default)]
    pub total_unique: u64,
    #[serde(default)]
    pub total_fetched: u64,
    #[serde(default, deserialize_with = "code_as_string")]
    pub region_code: String,
    #[serde(default, deserialize_with = "string_or_null")]
    pub timestamp: String,
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

// the backend has sent the region code both as a number and as a string
fn code_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Code>::deserialize(deserializer)? {
        Some(Code::Text(s)) => s,
        Some(Code::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_field_names() {
        let raw = r#"{
            "rank": 3,
            "deltaRank": -1,
            "RegionID": 2020,
            "RealmGroupName": "SEA201",
            "RealmName": "Knight",
            "CharacterName": "Ana",
            "pcWeaponType": 21,
            "recordTime": "2025-01-01",
            "GuildName": null,
            "GuildUnionName": "North",
            "MaxRankDate": "2024-12-30",
            "TotalCount": 900,
            "score": 12.5,
            "RegionName": "ASIA II"
        }"#;
        let record: Record = serde_json::from_str(raw).unwrap();
        assert_eq!(record.name, "Ana");
        assert_eq!(record.guild, "");
        assert_eq!(record.union, "North");
        assert_eq!(record.realm_key(), "SEA201/Knight");
        assert_eq!(record.weapon_label(), "Bow");
        assert_eq!(record.delta_rank, -1);
    }

    #[test]
    fn realm_key_eq_matches_only_the_exact_pair() {
        let record: Record = serde_json::from_str(
            r#"{"CharacterName":"Bo","RealmGroupName":"SEA1","RealmName":"X"}"#,
        )
        .unwrap();
        assert!(record.realm_key_eq("SEA1/X"));
        assert!(!record.realm_key_eq("SEA1"));
        assert!(!record.realm_key_eq("SEA1/XY"));
        assert!(!record.realm_key_eq("SEA/1/X"));
    }

    #[test]
    fn region_code_accepts_number_or_string() {
        let a: RegionResponse = serde_json::from_str(r#"{"regionCode": 2020}"#).unwrap();
        let b: RegionResponse = serde_json::from_str(r#"{"regionCode": "2020"}"#).unwrap();
        assert_eq!(a.region_code, "2020");
        assert_eq!(b.region_code, "2020");
        assert!(a.items.is_empty());
    }

    #[test]
    fn selectable_regions_drops_sentinel() {
        let meta: Metadata = serde_json::from_str(
            r#"{"regions":[{"code":0,"name":"All"},{"code":2020,"name":"ASIA II"}],
                "lastUpdated":"2025-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        let regions = meta.selectable_regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].code, 2020);
        assert_eq!(meta.region_name(2020), Some("ASIA II"));
        assert_eq!(meta.region_name(0), None);
    }

    #[test]
    fn rank_tiers_follow_leaderboard_bands() {
        assert_eq!(RankTier::of(1), RankTier::First);
        assert_eq!(RankTier::of(3), RankTier::Third);
        assert_eq!(RankTier::of(10), RankTier::TopTen);
        assert_eq!(RankTier::of(100), RankTier::TopHundred);
        assert_eq!(RankTier::of(101), RankTier::Other);
    }
}
