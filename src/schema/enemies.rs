//! Projects `RPG::Enemy` nodes from `Enemies.rvdata2`.
use super::helpers::get_traits;
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `Enemies.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(enemy: &ValueTree) -> Value {
    let actions = enemy
        .attr("actions")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(|a| {
            json!({
                "conditionParam1": a.attr_or_nil("condition_param1").as_f64().unwrap_or(0.0),
                "conditionParam2": a.attr_or_nil("condition_param2").as_f64().unwrap_or(0.0),
                "conditionType": a.attr_or_nil("condition_type").as_i64().unwrap_or(0),
                "rating": a.attr_or_nil("rating").as_i64().unwrap_or(5),
                "skillId": a.attr_or_nil("skill_id").as_i64().unwrap_or(1),
            })
        })
        .collect::<Vec<_>>();

    let drop_items = enemy
        .attr("drop_items")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(|d| {
            json!({
                "dataId": d.attr_or_nil("data_id").as_i64().unwrap_or(1),
                "denominator": d.attr_or_nil("denominator").as_i64().unwrap_or(1),
                "kind": d.attr_or_nil("kind").as_i64().unwrap_or(0),
            })
        })
        .collect::<Vec<_>>();

    let params = enemy
        .attr("params")
        .and_then(ValueTree::as_array)
        .map(|items| Value::Array(items.iter().map(|v| json!(v.as_i64().unwrap_or(0))).collect()))
        .unwrap_or_else(|| json!([100, 0, 0, 0, 100, 100, 100, 100]));

    json!({
        "id": enemy.attr_or_nil("id").as_i64().unwrap_or(0),
        "actions": actions,
        "battlerHue": enemy.attr_or_nil("battler_hue").as_i64().unwrap_or(0),
        "battlerName": enemy.attr_or_nil("battler_name").as_str_lossy().unwrap_or_default(),
        "dropItems": drop_items,
        "exp": enemy.attr_or_nil("exp").as_i64().unwrap_or(0),
        "traits": get_traits(enemy.attr_or_nil("features")),
        "gold": enemy.attr_or_nil("gold").as_i64().unwrap_or(0),
        "name": enemy.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "note": enemy.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "params": params,
    })
}
