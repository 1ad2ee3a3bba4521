//! Released weapons, the catalog an essence is matched against.
//!
//! JSON format: an object keyed by weapon id, kept in file order.
//! ```json
//! {
//!   "wpn_0001": {
//!     "weaponId": "wpn_0001",
//!     "weaponName": "某武器",
//!     "weaponType": "单手剑",
//!     "rarity": 6,
//!     "stats": { "attribute": "敏捷提升", "secondary": "攻击提升", "skill": "强攻" }
//!   }
//! }
//! ```

use std::fmt;
use std::path::Path;

use anyhow::Context;
use essence::recognition::Label;
use serde::de::{Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
struct WeaponStats {
    attribute: Option<String>,
    secondary: Option<String>,
    skill: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeaponRecord {
    weapon_id: String,
    weapon_name: String,
    #[serde(default)]
    weapon_type: String,
    #[serde(default)]
    rarity: u8,
    #[serde(default)]
    stats: WeaponStats,
}

/// One desirable essence configuration: the three stats a weapon wants.
///
/// A missing stat never matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "WeaponRecord")]
pub struct TargetDefinition {
    pub weapon_id: String,
    pub weapon_name: String,
    pub weapon_type: String,
    pub rarity: u8,
    pub attribute: Option<Label>,
    pub secondary: Option<Label>,
    pub skill: Option<Label>,
}

impl From<WeaponRecord> for TargetDefinition {
    fn from(r: WeaponRecord) -> Self {
        TargetDefinition {
            weapon_id: r.weapon_id,
            weapon_name: r.weapon_name,
            weapon_type: r.weapon_type,
            rarity: r.rarity,
            attribute: r.stats.attribute.map(Label::from),
            secondary: r.stats.secondary.map(Label::from),
            skill: r.stats.skill.map(Label::from),
        }
    }
}

fn field_matches(expected: Option<&Label>, actual: Option<&Label>) -> bool {
    match (expected, actual) {
        (Some(e), Some(a)) => e == a,
        _ => false,
    }
}

impl TargetDefinition {
    /// True iff all three readings are defined and equal this definition.
    pub fn matches(&self, attribute: Option<&Label>, secondary: Option<&Label>, skill: Option<&Label>) -> bool {
        field_matches(self.attribute.as_ref(), attribute)
            && field_matches(self.secondary.as_ref(), secondary)
            && field_matches(self.skill.as_ref(), skill)
    }
}

/// Ordered target list; the first matching definition wins.
#[derive(Debug, Clone, Default)]
pub struct TargetCatalog(pub Vec<TargetDefinition>);

impl TargetCatalog {
    pub fn from_json_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read weapons: {}", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        serde_json::from_str(s)
            .with_context(|| "parse weapons JSON (expected { id: { weaponId, weaponName, stats: { attribute, secondary, skill } } })")
    }

    pub fn find(
        &self,
        attribute: Option<&Label>,
        secondary: Option<&Label>,
        skill: Option<&Label>,
    ) -> Option<&TargetDefinition> {
        self.0.iter().find(|t| t.matches(attribute, secondary, skill))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetDefinition> {
        self.0.iter()
    }
}

struct TargetCatalogVisitor;

impl<'de> Visitor<'de> for TargetCatalogVisitor {
    type Value = TargetCatalog;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of weapon id to weapon, or an array of weapons")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut targets = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((_, target)) = map.next_entry::<String, TargetDefinition>()? {
            targets.push(target);
        }
        Ok(TargetCatalog(targets))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut targets = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(target) = seq.next_element::<TargetDefinition>()? {
            targets.push(target);
        }
        Ok(TargetCatalog(targets))
    }
}

impl<'de> Deserialize<'de> for TargetCatalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TargetCatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEAPONS: &str = r#"{
        "w2": { "weaponId": "w2", "weaponName": "乙", "weaponType": "手铳", "rarity": 5,
                "stats": { "attribute": "敏捷提升", "secondary": "攻击提升", "skill": "强攻" } },
        "w1": { "weaponId": "w1", "weaponName": "甲", "weaponType": "单手剑", "rarity": 6,
                "stats": { "attribute": "敏捷提升", "secondary": "攻击提升", "skill": "强攻" } },
        "w3": { "weaponId": "w3", "weaponName": "丙", "weaponType": "施术单元", "rarity": 4,
                "stats": { "attribute": null, "secondary": "治疗效率提升", "skill": "医疗" } }
    }"#;

    fn l(s: &str) -> Label {
        Label::from(s)
    }

    #[test]
    fn keeps_file_order() {
        let catalog = TargetCatalog::from_json_str(WEAPONS).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|t| t.weapon_id.as_str()).collect();
        assert_eq!(ids, vec!["w2", "w1", "w3"]);
        assert_eq!(catalog.0[2].attribute, None);
    }

    #[test]
    fn first_match_wins() {
        let catalog = TargetCatalog::from_json_str(WEAPONS).unwrap();
        let hit = catalog
            .find(Some(&l("敏捷提升")), Some(&l("攻击提升")), Some(&l("强攻")))
            .unwrap();
        assert_eq!(hit.weapon_name, "乙");
    }

    #[test]
    fn all_three_fields_must_match() {
        let catalog = TargetCatalog::from_json_str(WEAPONS).unwrap();
        assert!(catalog
            .find(Some(&l("敏捷提升")), Some(&l("攻击提升")), Some(&l("压制")))
            .is_none());
        assert!(catalog.find(None, Some(&l("攻击提升")), Some(&l("强攻"))).is_none());
    }

    #[test]
    fn missing_catalog_stat_never_matches() {
        let catalog = TargetCatalog::from_json_str(WEAPONS).unwrap();
        assert!(catalog.find(None, Some(&l("治疗效率提升")), Some(&l("医疗"))).is_none());
    }

    #[test]
    fn accepts_array_form() {
        let catalog = TargetCatalog::from_json_str(
            r#"[{ "weaponId": "a", "weaponName": "A", "stats": { "attribute": "力量提升", "secondary": "生命提升", "skill": "压制" } }]"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.0[0].rarity, 0);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(TargetCatalog::from_json_str(r#"{ "a": { "weaponName": "A" } }"#).is_err());
    }
}
