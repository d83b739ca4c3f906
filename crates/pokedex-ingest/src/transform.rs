//! Detail payload reshaping
//!
//! Every function here is total over arbitrary JSON: a missing key, a `null`
//! or a value of the wrong shape yields the field's default instead of an
//! error.

use serde_json::Value;

use crate::models::{
    AbilityRecord, DamageRelations, ItemRecord, MoveRecord, NormalizedRecord, PokemonRecord,
    RecordClass, TypeRecord,
};

/// Decimeters to meters, hectograms to kilograms
const UNIT_DIVISOR: f64 = 10.0;

/// Reshape one detail payload into the schema of `class`
pub fn transform(payload: &Value, class: RecordClass) -> NormalizedRecord {
    match class {
        RecordClass::Pokemon => NormalizedRecord::Pokemon(PokemonRecord::from_payload(payload)),
        RecordClass::Type => NormalizedRecord::Type(TypeRecord::from_payload(payload)),
        RecordClass::Move => NormalizedRecord::Move(MoveRecord::from_payload(payload)),
        RecordClass::Ability => NormalizedRecord::Ability(AbilityRecord::from_payload(payload)),
        RecordClass::Item => NormalizedRecord::Item(ItemRecord::from_payload(payload)),
    }
}

impl PokemonRecord {
    pub fn from_payload(payload: &Value) -> Self {
        let first_form = payload
            .get("forms")
            .and_then(Value::as_array)
            .and_then(|forms| forms.first());

        let stats = list(payload, "stats")
            .filter_map(|entry| {
                let stat = ref_name(entry, "stat")?;
                let base = entry.get("base_stat").and_then(Value::as_i64)?;
                Some((stat, base))
            })
            .collect();

        Self {
            id: int(payload, "id"),
            order: int(payload, "order"),
            name: first_form
                .and_then(|form| text(form, "name"))
                .or_else(|| text(payload, "name")),
            stats,
            types: nested_names(payload, "types", "type"),
            height: scaled(payload, "height"),
            weight: scaled(payload, "weight"),
            species: ref_name(payload, "species"),
            moves: nested_names(payload, "moves", "move"),
            game_indices: nested_names(payload, "game_indices", "version"),
        }
    }
}

impl TypeRecord {
    pub fn from_payload(payload: &Value) -> Self {
        let relations = payload.get("damage_relations").unwrap_or(&Value::Null);

        Self {
            id: int(payload, "id"),
            name: text(payload, "name"),
            damage_relations: DamageRelations {
                double_damage_to: names(relations, "double_damage_to"),
                half_damage_to: names(relations, "half_damage_to"),
                no_damage_to: names(relations, "no_damage_to"),
                double_damage_from: names(relations, "double_damage_from"),
                half_damage_from: names(relations, "half_damage_from"),
                no_damage_from: names(relations, "no_damage_from"),
            },
        }
    }
}

impl MoveRecord {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            id: int(payload, "id"),
            name: text(payload, "name"),
            power: int(payload, "power"),
            pp: int(payload, "pp"),
            type_name: ref_name(payload, "type"),
            damage_class: ref_name(payload, "damage_class"),
        }
    }
}

impl AbilityRecord {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            id: int(payload, "id"),
            name: text(payload, "name"),
            pokemon: nested_names(payload, "pokemon", "pokemon"),
        }
    }
}

impl ItemRecord {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            id: int(payload, "id"),
            name: text(payload, "name"),
            category: ref_name(payload, "category"),
        }
    }
}

fn int(value: &Value, key: &str) -> Option<i64> {
    value.get(key).and_then(Value::as_i64)
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn scaled(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64).map(|v| v / UNIT_DIVISOR)
}

/// `value[key].name`, the shape of every named API resource reference
fn ref_name(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(|r| text(r, "name"))
}

fn list<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.as_slice())
        .unwrap_or_default()
        .iter()
}

/// Names of every resource reference listed under `key`
fn names(value: &Value, key: &str) -> Vec<String> {
    list(value, key).filter_map(|item| text(item, "name")).collect()
}

/// Names of the `inner` reference of every entry listed under `key`
fn nested_names(value: &Value, key: &str, inner: &str) -> Vec<String> {
    list(value, key).filter_map(|item| ref_name(item, inner)).collect()
}
