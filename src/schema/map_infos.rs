//! Projects `MapInfos.rvdata2`, whose root is a `Hash` keyed by map id rather than
//! the usual 1-indexed array every other entity uses.
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `MapInfos.rvdata2`'s root mapping into an array whose entries carry
/// their own `id`, mirroring the other entities' `null`-at-0 convention so the
/// editor can still index it by map id.
pub fn project(root: &ValueTree) -> Value {
    let pairs = match root {
        ValueTree::Mapping(pairs) => pairs.as_slice(),
        _ => &[],
    };

    let max_id = pairs.iter().filter_map(|(k, _)| k.as_i64()).max().unwrap_or(0);
    let mut out = vec![Value::Null; (max_id + 1) as usize];
    for (key, info) in pairs {
        let Some(id) = key.as_i64() else { continue };
        if id <= 0 {
            continue;
        }
        out[id as usize] = project_one(id, info);
    }
    Value::Array(out)
}

fn project_one(id: i64, info: &ValueTree) -> Value {
    json!({
        "id": id,
        "expanded": info.attr_or_nil("expanded").is_truthy(),
        "name": info.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "order": info.attr_or_nil("order").as_i64().unwrap_or(0),
        "parentId": info.attr_or_nil("parent_id").as_i64().unwrap_or(0),
        "scrollX": info.attr_or_nil("scroll_x").as_f64().unwrap_or(0.0),
        "scrollY": info.attr_or_nil("scroll_y").as_f64().unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str) -> ValueTree {
        ValueTree::Object {
            class: "RPG::MapInfo".to_string(),
            attrs: vec![("name".to_string(), ValueTree::ByteString(name.as_bytes().to_vec()))],
        }
    }

    #[test]
    fn sparse_ids_leave_null_gaps() {
        let root = ValueTree::Mapping(vec![
            (ValueTree::Integer(1), info("Town")),
            (ValueTree::Integer(3), info("Cave")),
        ]);
        let projected = project(&root);
        let items = projected.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0], Value::Null);
        assert_eq!(items[2], Value::Null);
        assert_eq!(items[1]["name"], json!("Town"));
        assert_eq!(items[3]["id"], json!(3));
    }
}
