//! Projects `RPG::State` nodes from `States.rvdata2`.
use super::helpers::get_traits;
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `States.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(state: &ValueTree) -> Value {
    json!({
        "id": state.attr_or_nil("id").as_i64().unwrap_or(0),
        "autoRemovalTiming": state.attr_or_nil("auto_removal_timing").as_i64().unwrap_or(0),
        "chanceByDamage": state.attr_or_nil("chance_by_damage").as_i64().unwrap_or(100),
        "traits": get_traits(state.attr_or_nil("features")),
        "iconIndex": state.attr_or_nil("icon_index").as_i64().unwrap_or(0),
        "maxTurns": state.attr_or_nil("max_turns").as_i64().unwrap_or(1),
        "message1": state.attr_or_nil("message1").as_str_lossy().unwrap_or_default(),
        "message2": state.attr_or_nil("message2").as_str_lossy().unwrap_or_default(),
        "message3": state.attr_or_nil("message3").as_str_lossy().unwrap_or_default(),
        "message4": state.attr_or_nil("message4").as_str_lossy().unwrap_or_default(),
        "minTurns": state.attr_or_nil("min_turns").as_i64().unwrap_or(1),
        "motion": state.attr_or_nil("motion").as_i64().unwrap_or(0),
        "name": state.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "note": state.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "overlay": state.attr_or_nil("overlay").as_i64().unwrap_or(0),
        "priority": state.attr_or_nil("priority").as_i64().unwrap_or(50),
        "removeAtBattleEnd": state.attr_or_nil("remove_at_battle_end").is_truthy(),
        "removeByDamage": state.attr_or_nil("remove_by_damage").is_truthy(),
        "removeByRestriction": state.attr_or_nil("remove_by_restriction").is_truthy(),
        "removeByWalking": state.attr_or_nil("remove_by_walking").is_truthy(),
        "restriction": state.attr_or_nil("restriction").as_i64().unwrap_or(0),
        "stepsToRemove": state.attr_or_nil("steps_to_remove").as_i64().unwrap_or(100),
    })
}
