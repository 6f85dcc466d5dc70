//! Stable identifiers for board entities.
//!
//! # Responsibility
//! - Generate collision-resistant ids for projects, sections, tasks and
//!   comments.
//! - Read numeric ids written by older snapshots without losing identity.
//!
//! # Invariants
//! - New ids are random v4 UUIDs.
//! - Legacy numeric ids map to the same `EntityId` on every load.
//! - Serialized form is always the hyphenated UUID string.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

const LEGACY_INTEGER_TAG: u64 = 0;
const LEGACY_FLOAT_TAG: u64 = 1;

/// Identifier shared by every entity in the project tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generates a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Maps a legacy integer id (list length or `Date.now()` style) onto the
    /// UUID space.
    pub fn from_legacy_integer(value: u64) -> Self {
        Self(Uuid::from_u64_pair(LEGACY_INTEGER_TAG, value))
    }

    /// Maps a legacy fractional id (random float style) onto the UUID space.
    ///
    /// Integral values are routed to [`EntityId::from_legacy_integer`] so
    /// `3` and `3.0` resolve to the same entity.
    pub fn from_legacy_float(value: f64) -> Self {
        if value.fract() == 0.0 && value >= 0.0 && value <= u64::MAX as f64 {
            return Self::from_legacy_integer(value as u64);
        }
        Self(Uuid::from_u64_pair(LEGACY_FLOAT_TAG, value.to_bits()))
    }

    /// Derives a deterministic child id for legacy entries that were stored
    /// without one (bare-string sections and tasks).
    pub fn derive(parent: EntityId, kind: &str, index: usize, text: &str) -> Self {
        let name = format!("{kind}:{index}:{text}");
        Self(Uuid::new_v5(&parent.0, name.as_bytes()))
    }

    /// Returns the numeric text this id was read from, for ids that came
    /// from a legacy snapshot.
    ///
    /// Floats are spelled the way the browser app spelled them in storage
    /// keys: exponent form below `1e-6` and from `1e21` up (`1e-7`,
    /// `2.5e+21`), plain decimals otherwise.
    pub fn legacy_text(&self) -> Option<String> {
        let (tag, value) = self.0.as_u64_pair();
        match tag {
            LEGACY_INTEGER_TAG => Some(value.to_string()),
            LEGACY_FLOAT_TAG => Some(legacy_float_text(f64::from_bits(value))),
            _ => None,
        }
    }
}

fn legacy_float_text(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-6..1e21).contains(&magnitude) {
        return value.to_string();
    }
    let text = format!("{value:e}");
    match text.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => text,
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Error returned when user input cannot be read as an [`EntityId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEntityIdError(String);

impl Display for ParseEntityIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid id `{}`: expected a UUID or legacy number", self.0)
    }
}

impl std::error::Error for ParseEntityIdError {}

impl FromStr for EntityId {
    type Err = ParseEntityIdError;

    /// Accepts a UUID string, or the legacy numeric form (`3`, `0.42`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Ok(uuid) = Uuid::parse_str(trimmed) {
            return Ok(Self(uuid));
        }
        if let Ok(integer) = trimmed.parse::<u64>() {
            return Ok(Self::from_legacy_integer(integer));
        }
        match trimmed.parse::<f64>() {
            Ok(float) if float.is_finite() => Ok(Self::from_legacy_float(float)),
            _ => Err(ParseEntityIdError(trimmed.to_string())),
        }
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EntityIdVisitor)
    }
}

struct EntityIdVisitor;

impl Visitor<'_> for EntityIdVisitor {
    type Value = EntityId;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a UUID string or a numeric legacy id")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(EntityId::from_legacy_integer(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        match u64::try_from(value) {
            Ok(unsigned) => Ok(EntityId::from_legacy_integer(unsigned)),
            Err(_) => Ok(EntityId::from_legacy_float(value as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(EntityId::from_legacy_float(value))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        value.parse().map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::EntityId;

    #[test]
    fn legacy_numbers_map_deterministically() {
        assert_eq!(
            EntityId::from_legacy_integer(7),
            EntityId::from_legacy_integer(7)
        );
        assert_eq!(
            EntityId::from_legacy_float(7.0),
            EntityId::from_legacy_integer(7)
        );
        assert_ne!(
            EntityId::from_legacy_float(0.25),
            EntityId::from_legacy_float(0.5)
        );
    }

    #[test]
    fn legacy_text_recovers_original_number() {
        assert_eq!(
            EntityId::from_legacy_integer(1717000000000).legacy_text(),
            Some("1717000000000".to_string())
        );
        assert_eq!(
            EntityId::from_legacy_float(0.375).legacy_text(),
            Some("0.375".to_string())
        );
        assert_eq!(EntityId::new().legacy_text(), None);
    }

    #[test]
    fn legacy_float_text_uses_exponent_outside_decimal_range() {
        let text = |value: f64| EntityId::from_legacy_float(value).legacy_text();
        assert_eq!(text(1e-7), Some("1e-7".to_string()));
        assert_eq!(text(2.5e-8), Some("2.5e-8".to_string()));
        assert_eq!(text(0.000001), Some("0.000001".to_string()));
        assert_eq!(text(2.5e21), Some("2.5e+21".to_string()));
        assert_eq!("1e-7".parse::<EntityId>().unwrap(), EntityId::from_legacy_float(1e-7));
    }

    #[test]
    fn parses_uuid_and_legacy_forms() {
        let id = EntityId::new();
        assert_eq!(id.to_string().parse::<EntityId>().unwrap(), id);
        assert_eq!(
            "12".parse::<EntityId>().unwrap(),
            EntityId::from_legacy_integer(12)
        );
        assert!("not-an-id".parse::<EntityId>().is_err());
    }

    #[test]
    fn json_accepts_numbers_and_writes_strings() {
        let from_int: EntityId = serde_json::from_str("3").unwrap();
        assert_eq!(from_int, EntityId::from_legacy_integer(3));

        let from_float: EntityId = serde_json::from_str("0.375").unwrap();
        assert_eq!(from_float, EntityId::from_legacy_float(0.375));

        let written = serde_json::to_string(&from_int).unwrap();
        assert_eq!(written, format!("\"{from_int}\""));
    }

    #[test]
    fn derived_ids_depend_on_parent_and_position() {
        let parent = EntityId::new();
        let other = EntityId::new();
        let a = EntityId::derive(parent, "section", 0, "Todo");
        assert_eq!(a, EntityId::derive(parent, "section", 0, "Todo"));
        assert_ne!(a, EntityId::derive(parent, "section", 1, "Todo"));
        assert_ne!(a, EntityId::derive(other, "section", 0, "Todo"));
    }
}
