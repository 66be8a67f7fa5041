//! Projects `RPG::Item` nodes from `Items.rvdata2`.
use super::helpers::{get_damage, get_effects};
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `Items.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(item: &ValueTree) -> Value {
    json!({
        "id": item.attr_or_nil("id").as_i64().unwrap_or(0),
        "animationId": item.attr_or_nil("animation_id").as_i64().unwrap_or(0),
        "consumable": item.attr_or_nil("consumable").is_truthy(),
        "damage": get_damage(item.attr_or_nil("damage")),
        "description": item.attr_or_nil("description").as_str_lossy().unwrap_or_default(),
        "effects": get_effects(item.attr_or_nil("effects")),
        "hitType": item.attr_or_nil("hit_type").as_i64().unwrap_or(0),
        "iconIndex": item.attr_or_nil("icon_index").as_i64().unwrap_or(0),
        "itypeId": item.attr_or_nil("itype_id").as_i64().unwrap_or(1),
        "name": item.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "note": item.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "occasion": item.attr_or_nil("occasion").as_i64().unwrap_or(0),
        "price": item.attr_or_nil("price").as_i64().unwrap_or(0),
        "repeats": item.attr_or_nil("repeats").as_i64().unwrap_or(1),
        "scope": item.attr_or_nil("scope").as_i64().unwrap_or(0),
        "speed": item.attr_or_nil("speed").as_i64().unwrap_or(0),
        "successRate": item.attr_or_nil("success_rate").as_i64().unwrap_or(100),
        "tpGain": item.attr_or_nil("tp_gain").as_i64().unwrap_or(0),
    })
}
