//! Projects `RPG::Actor` nodes from `Actors.rvdata2`.
use super::helpers::get_traits;
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `Actors.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(actor: &ValueTree) -> Value {
    json!({
        "id": actor.attr_or_nil("id").as_i64().unwrap_or(0),
        "battlerName": actor.attr_or_nil("battler_name").as_str_lossy().unwrap_or_default(),
        "characterIndex": actor.attr_or_nil("character_hue").as_i64().unwrap_or(0),
        "characterName": actor.attr_or_nil("character_name").as_str_lossy().unwrap_or_default(),
        "classId": actor.attr_or_nil("class_id").as_i64().unwrap_or(0),
        "equips": actor.attr_or_nil("equips").as_array().unwrap_or(&[]).iter()
            .map(|v| v.as_i64().unwrap_or(0)).collect::<Vec<_>>(),
        "faceIndex": actor.attr_or_nil("face_index").as_i64().unwrap_or(0),
        "faceName": actor.attr_or_nil("battler_name").as_str_lossy().unwrap_or_default(),
        "traits": get_traits(actor.attr_or_nil("features")),
        "initialLevel": actor.attr_or_nil("initial_level").as_i64().unwrap_or(1),
        "maxLevel": actor.attr_or_nil("final_level").as_i64().unwrap_or(99),
        "name": actor.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "nickname": actor.attr_or_nil("nickname").as_str_lossy().unwrap_or_default(),
        "note": actor.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "profile": actor.attr_or_nil("description").as_str_lossy().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_documented_defaults() {
        let actor = ValueTree::Object {
            class: "RPG::Actor".to_string(),
            attrs: vec![("name".to_string(), ValueTree::ByteString(b"Harold".to_vec()))],
        };
        let projected = project_one(&actor);
        assert_eq!(projected["id"], json!(0));
        assert_eq!(projected["initialLevel"], json!(1));
        assert_eq!(projected["maxLevel"], json!(99));
        assert_eq!(projected["name"], json!("Harold"));
    }
}
