//! Projects `RPG::Armor` nodes from `Armors.rvdata2`.
use super::helpers::get_traits;
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `Armors.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(armor: &ValueTree) -> Value {
    let params = armor
        .attr("params")
        .and_then(ValueTree::as_array)
        .map(|items| Value::Array(items.iter().map(|v| json!(v.as_i64().unwrap_or(0))).collect()))
        .unwrap_or_else(|| json!([0, 0, 0, 0, 0, 0, 0, 0]));

    json!({
        "id": armor.attr_or_nil("id").as_i64().unwrap_or(0),
        "atypeId": armor.attr_or_nil("atype_id").as_i64().unwrap_or(0),
        "description": armor.attr_or_nil("description").as_str_lossy().unwrap_or_default(),
        "etypeId": armor.attr_or_nil("etype_id").as_i64().unwrap_or(0),
        "traits": get_traits(armor.attr_or_nil("features")),
        "iconIndex": armor.attr_or_nil("icon_index").as_i64().unwrap_or(0),
        "name": armor.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "note": armor.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "params": params,
        "price": armor.attr_or_nil("price").as_i64().unwrap_or(0),
    })
}
