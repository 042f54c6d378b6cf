//! Patch-panel link identifiers
//!
//! A link runs from a rack unit to another rack unit and carries a number of
//! ports. Its code payload follows the `2L3/D12-43/AE12-43/48P` convention.

use crate::request::sanitize_file_stem;

/// Trims and drops every whitespace character.
pub fn normalize_id(raw: &str) -> String {
    raw.chars().filter(|c| !c.is_whitespace()).collect()
}

/// The parts a link payload is made of
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkId {
    pub base: String,
    pub rack_from: String,
    pub unit_from: String,
    pub rack_to: String,
    pub unit_to: String,
    pub ports: String,
}

impl LinkId {
    /// Builds a link from raw field values, normalizing each one.
    pub fn new(
        base: &str,
        (rack_from, unit_from): (&str, &str),
        (rack_to, unit_to): (&str, &str),
        ports: &str,
    ) -> Self {
        Self {
            base: normalize_id(base),
            rack_from: normalize_id(rack_from),
            unit_from: normalize_id(unit_from),
            rack_to: normalize_id(rack_to),
            unit_to: normalize_id(unit_to),
            ports: normalize_id(ports),
        }
    }

    /// `base/rackFrom-unitFrom/rackTo-unitTo/portsP`
    pub fn payload(&self) -> String {
        format!(
            "{}/{}-{}/{}-{}/{}P",
            self.base, self.rack_from, self.unit_from, self.rack_to, self.unit_to, self.ports
        )
    }

    /// `base_rackFrom-unitFrom__rackTo-unitTo__portsP`, filesystem-safe
    pub fn file_stem(&self) -> String {
        sanitize_file_stem(&format!(
            "{}_{}-{}__{}-{}__{}P",
            self.base, self.rack_from, self.unit_from, self.rack_to, self.unit_to, self.ports
        ))
    }

    /// `base.1` through `base.count`
    pub fn auto_slot_texts(&self, count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("{}.{}", self.base, i)).collect()
    }
}

/// Splits a rack position written as `RACK-UNIT` at its last dash.
pub fn split_position(position: &str) -> Option<(String, String)> {
    let position = normalize_id(position);
    let (rack, unit) = position.rsplit_once('-')?;
    if rack.is_empty() || unit.is_empty() {
        return None;
    }
    Some((rack.to_string(), unit.to_string()))
}

/// One slot text per non-empty line, trimmed.
pub fn parse_slot_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
