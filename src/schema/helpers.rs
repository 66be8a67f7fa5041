//! Shared projection helpers reused across several entity kinds: traits, effects,
//! damage records, learnings, and flat parameter tables.
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects a `RPG::BaseItem::Feature` list (traits) into MV/MZ's trait array.
pub fn get_traits(features: &ValueTree) -> Value {
    let items = features.as_array().unwrap_or(&[]);
    Value::Array(
        items
            .iter()
            .map(|f| {
                json!({
                    "code": f.attr_or_nil("code").as_i64().unwrap_or(0),
                    "dataId": f.attr_or_nil("data_id").as_i64().unwrap_or(0),
                    "value": f.attr_or_nil("value").as_f64().unwrap_or(0.0),
                })
            })
            .collect(),
    )
}

/// Projects a `RPG::Class::Learning` list into MV/MZ's skill-learning array.
pub fn get_learnings(learnings: &ValueTree) -> Value {
    let items = learnings.as_array().unwrap_or(&[]);
    Value::Array(
        items
            .iter()
            .map(|l| {
                json!({
                    "level": l.attr_or_nil("level").as_i64().unwrap_or(1),
                    "skillId": l.attr_or_nil("skill_id").as_i64().unwrap_or(0),
                    "note": l.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
                })
            })
            .collect(),
    )
}

/// Projects a `RPG::UsableItem::Effect` list into MV/MZ's effect array.
pub fn get_effects(effects: &ValueTree) -> Value {
    let items = effects.as_array().unwrap_or(&[]);
    Value::Array(
        items
            .iter()
            .map(|e| {
                json!({
                    "code": e.attr_or_nil("code").as_i64().unwrap_or(0),
                    "dataId": e.attr_or_nil("data_id").as_i64().unwrap_or(0),
                    "value1": e.attr_or_nil("value1").as_f64().unwrap_or(0.0),
                    "value2": e.attr_or_nil("value2").as_f64().unwrap_or(0.0),
                })
            })
            .collect(),
    )
}

/// Projects a `RPG::UsableItem::Damage` node, substituting the documented default
/// when it is absent.
pub fn get_damage(damage: &ValueTree) -> Value {
    if matches!(damage, ValueTree::Nil) {
        return json!({
            "critical": false,
            "elementId": 0,
            "formula": "0",
            "type": 0,
            "variance": 20,
        });
    }
    json!({
        "critical": damage.attr_or_nil("critical").is_truthy(),
        "elementId": damage.attr_or_nil("element_id").as_i64().unwrap_or(0),
        "formula": damage.attr_or_nil("formula").as_str_lossy().unwrap_or_else(|| "0".to_string()),
        "type": damage.attr_or_nil("type").as_i64().unwrap_or(0),
        "variance": damage.attr_or_nil("variance").as_i64().unwrap_or(20),
    })
}

/// Decodes a `Table` user-defined blob's header-trimmed flat body into `u16` values.
/// `Table#_dump` stores a 0x14-byte header (dimension count and sizes) before the
/// flat little-endian `u16` payload.
pub fn decode_table_flags(bytes: &[u8]) -> Vec<u16> {
    if bytes.len() <= 0x14 {
        return Vec::new();
    }
    bytes[0x14..]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect()
}

/// Returns the flat `u16` body of a `Table` node, or an empty vector if the node isn't
/// a `Table` (or is `nil`).
pub fn table_flags(node: &ValueTree) -> Vec<u16> {
    match node {
        ValueTree::UserDefined { class, bytes } if class == "Table" => decode_table_flags(bytes),
        _ => Vec::new(),
    }
}

/// Projects a class's `params` table (8 parameters x N levels, flat-interleaved by
/// level) into 8 lists of length N. An absent table defaults to 8 ranges of `500..600`.
pub fn get_params(params_table: &ValueTree) -> Value {
    let flags = table_flags(params_table);
    if flags.is_empty() {
        let default: Vec<Value> = (500..600).map(Value::from).collect();
        return Value::Array((0..8).map(|_| Value::Array(default.clone())).collect());
    }
    interleave_groups_signed(&flags, 8)
}

/// Splits a flat, level/row-interleaved `u16` array into `groups` lists, each
/// holding every `groups`-th element starting at its own offset - i.e.
/// `result[p][l] = flags[l*groups + p]`. Each value is reinterpreted as a signed
/// 16-bit integer, matching how both parameter tables and animation cell data are
/// stored and consumed.
pub fn interleave_groups_signed(flags: &[u16], groups: usize) -> Value {
    let rows = flags.len() / groups.max(1);
    let mut out = Vec::with_capacity(groups);
    for p in 0..groups {
        let mut row = Vec::with_capacity(rows);
        for l in 0..rows {
            row.push(json!(flags[l * groups + p] as i16));
        }
        out.push(Value::Array(row));
    }
    Value::Array(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_damage_uses_documented_default() {
        let projected = get_damage(&ValueTree::Nil);
        assert_eq!(projected["formula"], json!("0"));
        assert_eq!(projected["variance"], json!(20));
    }

    #[test]
    fn empty_params_table_defaults_to_500_600_ranges() {
        let projected = get_params(&ValueTree::Nil);
        let groups = projected.as_array().unwrap();
        assert_eq!(groups.len(), 8);
        assert_eq!(groups[0].as_array().unwrap().len(), 100);
        assert_eq!(groups[0][0], json!(500));
        assert_eq!(groups[0][99], json!(599));
    }

    #[test]
    fn params_table_projection_matches_interleaving_invariant() {
        // 8 params x 3 levels -> flags[l*8+p]
        let mut bytes = vec![0u8; 0x14];
        let mut flags = Vec::new();
        for l in 0..3u16 {
            for p in 0..8u16 {
                flags.push(l * 8 + p);
            }
        }
        for f in &flags {
            bytes.extend_from_slice(&f.to_le_bytes());
        }
        let table = ValueTree::UserDefined {
            class: "Table".to_string(),
            bytes,
        };
        let projected = get_params(&table);
        let groups = projected.as_array().unwrap();
        for p in 0..8 {
            for l in 0..3 {
                assert_eq!(groups[p][l], json!((flags[l * 8 + p]) as i32));
            }
        }
    }
}
