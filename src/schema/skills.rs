//! Projects `RPG::Skill` nodes from `Skills.rvdata2`.
use super::helpers::{get_damage, get_effects};
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `Skills.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(skill: &ValueTree) -> Value {
    json!({
        "id": skill.attr_or_nil("id").as_i64().unwrap_or(0),
        "animationId": skill.attr_or_nil("animation_id").as_i64().unwrap_or(0),
        "damage": get_damage(skill.attr_or_nil("damage")),
        "description": skill.attr_or_nil("description").as_str_lossy().unwrap_or_default(),
        "effects": get_effects(skill.attr_or_nil("effects")),
        "hitType": skill.attr_or_nil("hit_type").as_i64().unwrap_or(0),
        "iconIndex": skill.attr_or_nil("icon_index").as_i64().unwrap_or(0),
        "message1": skill.attr_or_nil("message1").as_str_lossy().unwrap_or_default(),
        "message2": skill.attr_or_nil("message2").as_str_lossy().unwrap_or_default(),
        "mpCost": skill.attr_or_nil("mp_cost").as_i64().unwrap_or(0),
        "name": skill.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "note": skill.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "occasion": skill.attr_or_nil("occasion").as_i64().unwrap_or(0),
        "repeats": skill.attr_or_nil("repeats").as_i64().unwrap_or(1),
        "requiredWtypeId1": skill.attr_or_nil("required_wtype_id1").as_i64().unwrap_or(0),
        "requiredWtypeId2": skill.attr_or_nil("required_wtype_id2").as_i64().unwrap_or(0),
        "scope": skill.attr_or_nil("scope").as_i64().unwrap_or(0),
        "speed": skill.attr_or_nil("speed").as_i64().unwrap_or(0),
        "stypeId": skill.attr_or_nil("stype_id").as_i64().unwrap_or(0),
        "successRate": skill.attr_or_nil("success_rate").as_i64().unwrap_or(100),
        "tpCost": skill.attr_or_nil("tp_cost").as_i64().unwrap_or(0),
        "tpGain": skill.attr_or_nil("tp_gain").as_i64().unwrap_or(0),
    })
}
