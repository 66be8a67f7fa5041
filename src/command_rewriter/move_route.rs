//! Projects `RPG::MoveRoute` nodes, rewriting the VX Ace "Change Blend Mode" move
//! command into MV/MZ's script-call equivalent along the way.
use super::convert_param;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Converts a `RPG::MoveRoute` typed object into its MV/MZ JSON shape.
pub fn convert_move_route(route: &ValueTree) -> Value {
    let repeat = route.attr_or_nil("repeat").is_truthy();
    let skippable = route.attr_or_nil("skippable").is_truthy();
    let wait = route.attr_or_nil("wait").is_truthy();
    let list = route
        .attr("list")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(convert_move_command)
        .collect::<Vec<_>>();

    json!({
        "list": list,
        "repeat": repeat,
        "skippable": skippable,
        "wait": wait,
    })
}

/// Converts one `RPG::MoveCommand` node. Move-route commands never carry an indent
/// in the MV/MZ schema, so it is always `null`.
fn convert_move_command(cmd: &ValueTree) -> Value {
    let code = cmd.attr_or_nil("code").as_i64().unwrap_or(0);
    let raw_params = cmd
        .attr("parameters")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[]);

    if code == 43 {
        let first = raw_params.first().and_then(ValueTree::as_i64);
        if first == Some(2) {
            return json!({
                "code": 45,
                "indent": Value::Null,
                "parameters": ["this.setBlendMode(2);"],
            });
        }
    }

    let params: Vec<Value> = raw_params.iter().map(convert_param).collect();
    json!({
        "code": code,
        "indent": Value::Null,
        "parameters": params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_command(code: i64, params: Vec<ValueTree>) -> ValueTree {
        ValueTree::Object {
            class: "RPG::MoveCommand".to_string(),
            attrs: vec![
                ("code".to_string(), ValueTree::Integer(code)),
                ("parameters".to_string(), ValueTree::Array(params)),
            ],
        }
    }

    #[test]
    fn change_blend_mode_command_becomes_script_call() {
        let route = ValueTree::Object {
            class: "RPG::MoveRoute".to_string(),
            attrs: vec![
                ("repeat".to_string(), ValueTree::Boolean(false)),
                ("skippable".to_string(), ValueTree::Boolean(true)),
                ("wait".to_string(), ValueTree::Boolean(false)),
                (
                    "list".to_string(),
                    ValueTree::Array(vec![move_command(43, vec![ValueTree::Integer(2)])]),
                ),
            ],
        };
        let projected = convert_move_route(&route);
        let list = projected["list"].as_array().unwrap();
        assert_eq!(list[0]["code"], json!(45));
        assert_eq!(list[0]["indent"], Value::Null);
        assert_eq!(list[0]["parameters"][0], json!("this.setBlendMode(2);"));
    }

    #[test]
    fn other_move_commands_pass_through() {
        let route = ValueTree::Object {
            class: "RPG::MoveRoute".to_string(),
            attrs: vec![(
                "list".to_string(),
                ValueTree::Array(vec![move_command(1, vec![])]),
            )],
        };
        let projected = convert_move_route(&route);
        assert_eq!(projected["list"][0]["code"], json!(1));
    }
}
