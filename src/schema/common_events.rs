//! Projects `RPG::CommonEvent` nodes from `CommonEvents.rvdata2`.
use super::project_indexed_array;
use crate::command_rewriter::{self, Command};
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `CommonEvents.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(event: &ValueTree) -> Value {
    let raw = command_rewriter::parse_command_list(event.attr_or_nil("list"));
    let list: Vec<Command> = command_rewriter::rewrite_list(&raw);

    json!({
        "id": event.attr_or_nil("id").as_i64().unwrap_or(0),
        "name": event.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "switchId": event.attr_or_nil("switch_id").as_i64().unwrap_or(1),
        "trigger": event.attr_or_nil("trigger").as_i64().unwrap_or(0),
        "list": list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_documented_defaults() {
        let event = ValueTree::Object { class: "RPG::CommonEvent".to_string(), attrs: vec![] };
        let projected = project_one(&event);
        assert_eq!(projected["switchId"], json!(1));
        assert_eq!(projected["trigger"], json!(0));
        assert_eq!(projected["list"], json!([]));
    }
}
