//! Projects `RPG::Tileset` nodes from `Tilesets.rvdata2`.
use super::helpers::table_flags;
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `Tilesets.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(tileset: &ValueTree) -> Value {
    let names = tileset
        .attr("tileset_names")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(|v| json!(v.as_str_lossy().unwrap_or_default()))
        .collect::<Vec<_>>();

    let flags = table_flags(tileset.attr_or_nil("flags"))
        .into_iter()
        .map(|f| json!(f))
        .collect::<Vec<_>>();

    json!({
        "id": tileset.attr_or_nil("id").as_i64().unwrap_or(0),
        "flags": flags,
        "mode": tileset.attr_or_nil("mode").as_i64().unwrap_or(0),
        "name": tileset.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "note": tileset.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "tilesetNames": names,
    })
}
