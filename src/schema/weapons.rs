//! Projects `RPG::Weapon` nodes from `Weapons.rvdata2`.
use super::helpers::get_traits;
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Weapons have no equip-type slot of their own in the source data; the target
/// schema still requires the field, always set to the "weapon" equip type.
const ETYPE_ID: i64 = 1;

/// Projects `Weapons.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(weapon: &ValueTree) -> Value {
    let params = weapon
        .attr("params")
        .and_then(ValueTree::as_array)
        .map(|items| Value::Array(items.iter().map(|v| json!(v.as_i64().unwrap_or(0))).collect()))
        .unwrap_or_else(|| json!([0, 0, 10, 0, 0, 0, 0, 0]));

    json!({
        "id": weapon.attr_or_nil("id").as_i64().unwrap_or(0),
        "animationId": weapon.attr_or_nil("animation_id").as_i64().unwrap_or(0),
        "description": weapon.attr_or_nil("description").as_str_lossy().unwrap_or_default(),
        "etypeId": ETYPE_ID,
        "traits": get_traits(weapon.attr_or_nil("features")),
        "iconIndex": weapon.attr_or_nil("icon_index").as_i64().unwrap_or(0),
        "name": weapon.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "note": weapon.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "params": params,
        "price": weapon.attr_or_nil("price").as_i64().unwrap_or(500),
        "wtypeId": weapon.attr_or_nil("wtype_id").as_i64().unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_and_price_use_documented_defaults() {
        let weapon = ValueTree::Object {
            class: "RPG::Weapon".to_string(),
            attrs: vec![],
        };
        let projected = project_one(&weapon);
        assert_eq!(projected["params"], json!([0, 0, 10, 0, 0, 0, 0, 0]));
        assert_eq!(projected["price"], json!(500));
        assert_eq!(projected["etypeId"], json!(1));
    }
}
