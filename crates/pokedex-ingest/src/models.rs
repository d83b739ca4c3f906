//! Record classes, catalog pages and normalized record schemas

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The entity kinds the extractor knows how to walk and reshape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordClass {
    Pokemon,
    Type,
    Move,
    Ability,
    Item,
}

impl RecordClass {
    /// Every supported class, in extraction order
    pub const ALL: [RecordClass; 5] = [
        RecordClass::Pokemon,
        RecordClass::Type,
        RecordClass::Move,
        RecordClass::Ability,
        RecordClass::Item,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RecordClass::Pokemon => "pokemon",
            RecordClass::Type => "type",
            RecordClass::Move => "move",
            RecordClass::Ability => "ability",
            RecordClass::Item => "item",
        }
    }

    /// Catalog endpoint relative to the API base URL
    pub fn catalog_path(self) -> &'static str {
        match self {
            RecordClass::Pokemon => "pokemon-species/",
            RecordClass::Type => "type/",
            RecordClass::Move => "move/",
            RecordClass::Ability => "ability/",
            RecordClass::Item => "item/",
        }
    }

    /// Whether the catalog is walked page by page.
    ///
    /// The type catalog is small enough to request in one page, so its run
    /// stops after the first page regardless of `next`.
    pub fn is_paginated(self) -> bool {
        !matches!(self, RecordClass::Type)
    }

    /// Name of the persisted artifact for this class
    pub fn artifact_name(self) -> &'static str {
        self.as_str()
    }

    /// Turn a catalog stub locator into the detail locator to fetch.
    ///
    /// Species stubs point at `pokemon-species/{id}/`; the stats, moves and
    /// forms live under `pokemon/{id}/`.
    pub fn detail_locator(self, stub_locator: &str) -> String {
        match self {
            RecordClass::Pokemon => stub_locator.replacen("pokemon-species/", "pokemon/", 1),
            _ => stub_locator.to_string(),
        }
    }
}

impl std::fmt::Display for RecordClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordClass::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown record class: {}", s))
    }
}

/// One catalog listing response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    /// Declared total number of entries across all pages
    #[serde(default)]
    pub count: Option<u64>,
    /// Locator of the following page, `None` on the last page
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub results: Vec<EntryStub>,
}

/// A catalog entry pointing at its detail resource
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryStub {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl Page {
    /// Decode a raw page payload
    pub fn from_payload(payload: Value) -> serde_json::Result<Self> {
        serde_json::from_value(payload)
    }

    /// Detail locators for every stub that carries one, in catalog order
    pub fn detail_locators(&self, class: RecordClass) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|stub| stub.url.as_deref())
            .map(|url| class.detail_locator(url))
            .collect()
    }
}

// ============================================================================
// Normalized records
// ============================================================================

/// A reshaped detail payload, one variant per record class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    Pokemon(PokemonRecord),
    Type(TypeRecord),
    Move(MoveRecord),
    Ability(AbilityRecord),
    Item(ItemRecord),
}

impl NormalizedRecord {
    pub fn record_class(&self) -> RecordClass {
        match self {
            NormalizedRecord::Pokemon(_) => RecordClass::Pokemon,
            NormalizedRecord::Type(_) => RecordClass::Type,
            NormalizedRecord::Move(_) => RecordClass::Move,
            NormalizedRecord::Ability(_) => RecordClass::Ability,
            NormalizedRecord::Item(_) => RecordClass::Item,
        }
    }

    pub fn id(&self) -> Option<i64> {
        match self {
            NormalizedRecord::Pokemon(r) => r.id,
            NormalizedRecord::Type(r) => r.id,
            NormalizedRecord::Move(r) => r.id,
            NormalizedRecord::Ability(r) => r.id,
            NormalizedRecord::Item(r) => r.id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            NormalizedRecord::Pokemon(r) => r.name.as_deref(),
            NormalizedRecord::Type(r) => r.name.as_deref(),
            NormalizedRecord::Move(r) => r.name.as_deref(),
            NormalizedRecord::Ability(r) => r.name.as_deref(),
            NormalizedRecord::Item(r) => r.name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PokemonRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    /// Name of the first form
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Base value keyed by stat name
    pub stats: BTreeMap<String, i64>,
    pub types: Vec<String>,
    /// Meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Kilograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    pub moves: Vec<String>,
    /// Game versions the pokemon appears in
    pub game_indices: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub damage_relations: DamageRelations,
}

/// Type names grouped by damage multiplier and direction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DamageRelations {
    pub double_damage_to: Vec<String>,
    pub half_damage_to: Vec<String>,
    pub no_damage_to: Vec<String>,
    pub double_damage_from: Vec<String>,
    pub half_damage_from: Vec<String>,
    pub no_damage_from: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoveRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Status moves have no power; kept as `null`
    pub power: Option<i64>,
    pub pp: Option<i64>,
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    pub damage_class: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AbilityRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pokemon that can have this ability
    pub pokemon: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub category: Option<String>,
}
