//! Projects `RPG::Class` nodes from `Classes.rvdata2`.
use super::helpers::{get_learnings, get_params, get_traits};
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `Classes.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(class: &ValueTree) -> Value {
    let exp_params = class.attr("exp_params").and_then(ValueTree::as_array).map(|items| {
        Value::Array(items.iter().map(|v| json!(v.as_f64().unwrap_or(0.0))).collect())
    }).unwrap_or_else(|| json!([30, 20, 30, 30]));

    json!({
        "id": class.attr_or_nil("id").as_i64().unwrap_or(0),
        "expParams": exp_params,
        "traits": get_traits(class.attr_or_nil("features")),
        "learnings": get_learnings(class.attr_or_nil("learnings")),
        "name": class.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "note": class.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "params": get_params(class.attr_or_nil("params")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_exp_params_uses_documented_default() {
        let class = ValueTree::Object {
            class: "RPG::Class".to_string(),
            attrs: vec![],
        };
        let projected = project_one(&class);
        assert_eq!(projected["expParams"], json!([30, 20, 30, 30]));
    }
}
