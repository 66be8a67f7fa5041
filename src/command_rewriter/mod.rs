//! Rewrites VX Ace event-command opcodes and parameter shapes into their MV/MZ
//! equivalents, command by command.
pub mod move_route;
pub mod script_text;

use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// One event command as read straight off the rvdata2 object graph, before rewriting.
pub struct RawCommand {
    /// The VX Ace opcode.
    pub code: i64,
    /// The page's indent level for this command.
    pub indent: i64,
    /// The command's raw parameters, not yet projected to JSON.
    pub parameters: Vec<ValueTree>,
}

/// One event command in the MV/MZ dialect, ready to embed in an event page's JSON.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Command {
    /// The MV/MZ opcode (usually, but not always, the same numeral as the source).
    pub code: i64,
    /// The page's indent level; `null` inside a move route.
    pub indent: Option<i64>,
    /// The command's parameters, already projected to JSON.
    pub parameters: Vec<Value>,
}

/// Reads a `RPG::EventCommand` list node into [RawCommand]s.
pub fn parse_command_list(list: &ValueTree) -> Vec<RawCommand> {
    list.as_array()
        .unwrap_or(&[])
        .iter()
        .map(parse_command)
        .collect()
}

fn parse_command(node: &ValueTree) -> RawCommand {
    let code = node.attr_or_nil("code").as_i64().unwrap_or(0);
    let indent = node.attr_or_nil("indent").as_i64().unwrap_or(0);
    let parameters = node
        .attr("parameters")
        .and_then(ValueTree::as_array)
        .map(|items| items.to_vec())
        .unwrap_or_default();
    RawCommand {
        code,
        indent,
        parameters,
    }
}

/// Converts one raw parameter value to its MV/MZ JSON representation. Typed objects
/// that the MV/MZ schema knows about (move routes, move commands, audio files) are
/// projected into their target shape; anything else falls back to a best-effort
/// structural conversion.
pub fn convert_param(value: &ValueTree) -> Value {
    match value {
        ValueTree::Nil => Value::Null,
        ValueTree::Boolean(b) => Value::Bool(*b),
        ValueTree::Integer(i) => json!(i),
        ValueTree::Float(f) => json!(f),
        ValueTree::ByteString(_) | ValueTree::Symbol(_) => {
            Value::String(value.as_str_lossy().unwrap_or_default())
        }
        ValueTree::Array(items) => Value::Array(items.iter().map(convert_param).collect()),
        ValueTree::Mapping(pairs) => {
            let mut map = serde_json::Map::new();
            for (k, v) in pairs {
                let key = k.as_str_lossy().unwrap_or_else(|| "key".to_string());
                map.insert(key, convert_param(v));
            }
            Value::Object(map)
        }
        ValueTree::UserDefined { .. } => Value::Null,
        ValueTree::Object { class, .. } if class == "RPG::MoveRoute" => {
            move_route::convert_move_route(value)
        }
        ValueTree::Object { class, .. } if is_audio_file_class(class) => convert_audio_file(value),
        ValueTree::Object { attrs, .. } => {
            let mut map = serde_json::Map::new();
            for (k, v) in attrs {
                map.insert(to_camel_case(k), convert_param(v));
            }
            Value::Object(map)
        }
    }
}

fn is_audio_file_class(class: &str) -> bool {
    matches!(class, "RPG::AudioFile" | "RPG::BGM" | "RPG::BGS" | "RPG::ME" | "RPG::SE")
}

fn convert_audio_file(node: &ValueTree) -> Value {
    json!({
        "name": node.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "volume": node.attr_or_nil("volume").as_i64().unwrap_or(100),
        "pitch": node.attr_or_nil("pitch").as_i64().unwrap_or(100),
        "pan": node.attr_or_nil("pan").as_i64().unwrap_or(0),
    })
}

/// Converts a `snake_case` attribute name to `camelCase`, the convention MV/MZ's own
/// schema uses for every renamed key.
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upcase_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upcase_next = true;
        } else if upcase_next {
            out.extend(ch.to_uppercase());
            upcase_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// 19-slot table mapping VX Ace's numeric "button" key codes to the string key names
/// the MV/MZ conditional-branch schema expects. Slots 14-16 are never read through this
/// table: codes 14/15/16 are intercepted earlier and become an `Input.isTriggered`
/// script check instead (see [rewrite_command]).
const KEY_NAMES: [&str; 19] = [
    "down", "left", "right", "up", "ok", "cancel", "shift", "menu", "pageup", "pagedown", "tab",
    "control", "escape", "_a_intercepted", "_s_intercepted", "_d_intercepted", "f5", "f6", "f7",
];

fn key_name(code: i64) -> &'static str {
    KEY_NAMES
        .get(code as usize)
        .copied()
        .unwrap_or("ok")
}

/// Rewrites a full command list, recursing into move routes via code 505. A code-224
/// command with no parameters is dropped entirely rather than kept empty.
pub fn rewrite_list(commands: &[RawCommand]) -> Vec<Command> {
    commands.iter().filter_map(rewrite_command).collect()
}

fn rewrite_command(raw: &RawCommand) -> Option<Command> {
    if raw.code == 224 && raw.parameters.is_empty() {
        return None;
    }
    let params: Vec<Value> = raw.parameters.iter().map(convert_param).collect();
    let indent = Some(raw.indent);

    Some(match raw.code {
        102 => rewrite_show_choices(params, indent),
        104 => rewrite_input_number(params, indent),
        111 => rewrite_conditional_branch(raw, params, indent),
        223 => rewrite_tint_screen(params, indent),
        224 => rewrite_flash_screen(raw, params, indent),
        231 => rewrite_show_picture(params, indent),
        232 => rewrite_move_picture(params, indent),
        285 => rewrite_get_location_info(params, indent),
        302 => rewrite_shop(params, indent),
        319 => rewrite_change_equipment(params, indent),
        322 => rewrite_change_graphic(params, indent),
        355 | 655 => rewrite_script(raw.code, params, indent),
        505 => rewrite_move_route(raw, indent),
        _ => Command {
            code: raw.code,
            indent,
            parameters: params,
        },
    })
}

fn rewrite_show_choices(mut params: Vec<Value>, indent: Option<i64>) -> Command {
    let mut cancel = params.get(1).and_then(Value::as_i64).unwrap_or(0) - 1;
    if cancel == 4 {
        cancel = -2;
    }
    let choices = params.drain(..1).next().unwrap_or(json!([]));
    Command {
        code: 102,
        indent,
        parameters: vec![choices, json!(cancel), json!(0), json!(2), json!(0)],
    }
}

fn rewrite_input_number(mut params: Vec<Value>, indent: Option<i64>) -> Command {
    if params.len() < 2 {
        params.resize(2, Value::Null);
    }
    params[1] = json!(2);
    Command {
        code: 104,
        indent,
        parameters: params,
    }
}

fn rewrite_conditional_branch(raw: &RawCommand, mut params: Vec<Value>, indent: Option<i64>) -> Command {
    let subcode = params.first().and_then(Value::as_i64).unwrap_or(-1);
    if subcode == 11 {
        let key = raw
            .parameters
            .get(1)
            .and_then(ValueTree::as_i64)
            .unwrap_or(-1);
        if matches!(key, 14 | 15 | 16) {
            let button = match key {
                14 => "A",
                15 => "S",
                _ => "D",
            };
            return Command {
                code: 111,
                indent,
                parameters: vec![json!(12), json!(format!("Input.isTriggered('{button}')"))],
            };
        }
        if let Some(p) = params.get_mut(1) {
            *p = json!(key_name(key));
        }
    }
    Command {
        code: 111,
        indent,
        parameters: params,
    }
}

fn rewrite_tint_screen(mut params: Vec<Value>, indent: Option<i64>) -> Command {
    if params.len() == 3 {
        params[0] = json!([0, 0, 0, 0]);
    }
    Command {
        code: 223,
        indent,
        parameters: params,
    }
}

fn rewrite_flash_screen(raw: &RawCommand, mut params: Vec<Value>, indent: Option<i64>) -> Command {
    if params.is_empty() {
        return Command {
            code: 224,
            indent,
            parameters: Vec::new(),
        };
    }
    if params.len() == 3 {
        params[0] = json!([255, 255, 255, 255]);
    }
    let _ = raw;
    Command {
        code: 224,
        indent,
        parameters: params,
    }
}

fn rewrite_show_picture(params: Vec<Value>, indent: Option<i64>) -> Command {
    let blend = params.get(9).and_then(Value::as_i64).unwrap_or(0);
    if blend == 2 {
        let number = params.first().cloned().unwrap_or(json!(1));
        let name = params.get(1).cloned().unwrap_or(json!(""));
        let origin = params.get(2).cloned().unwrap_or(json!(0));
        let x_src = params.get(3).and_then(Value::as_i64).unwrap_or(0);
        let y_src = params.get(3).and_then(Value::as_i64).unwrap_or(0);
        let x = coord_expr(params.get(4), x_src);
        let y = coord_expr(params.get(5), y_src);
        let scale_x = params.get(6).cloned().unwrap_or(json!(100));
        let scale_y = params.get(7).cloned().unwrap_or(json!(100));
        let opacity = params.get(8).cloned().unwrap_or(json!(255));
        let call = format!(
            "$gameScreen.showPicture({}, {}, {}, {}, {}, {}, {}, {}, {})",
            value_to_script_literal(&number),
            value_to_script_literal(&name),
            value_to_script_literal(&origin),
            x,
            y,
            value_to_script_literal(&scale_x),
            value_to_script_literal(&scale_y),
            value_to_script_literal(&opacity),
            blend,
        );
        return Command {
            code: 355,
            indent,
            parameters: vec![json!(call)],
        };
    }
    Command {
        code: 231,
        indent,
        parameters: params,
    }
}

fn rewrite_move_picture(mut params: Vec<Value>, indent: Option<i64>) -> Command {
    if params.len() > 1 {
        params[1] = json!(0);
    }
    let blend = params.get(9).and_then(Value::as_i64).unwrap_or(0);
    if blend == 2 {
        let number = params.first().cloned().unwrap_or(json!(1));
        let origin = params.get(2).cloned().unwrap_or(json!(0));
        let x_src = params.get(3).and_then(Value::as_i64).unwrap_or(0);
        let y_src = params.get(3).and_then(Value::as_i64).unwrap_or(0);
        let x = coord_expr(params.get(4), x_src);
        let y = coord_expr(params.get(5), y_src);
        let scale_x = params.get(6).cloned().unwrap_or(json!(100));
        let scale_y = params.get(7).cloned().unwrap_or(json!(100));
        let opacity = params.get(8).cloned().unwrap_or(json!(255));
        let duration = params.get(10).and_then(Value::as_i64).unwrap_or(0);
        let waits = params.get(11).and_then(Value::as_bool).unwrap_or(false);
        let mut call = format!(
            "$gameScreen.movePicture({}, {}, {}, {}, {}, {}, {}, {}, {})",
            value_to_script_literal(&number),
            value_to_script_literal(&origin),
            x,
            y,
            value_to_script_literal(&scale_x),
            value_to_script_literal(&scale_y),
            value_to_script_literal(&opacity),
            blend,
            duration,
        );
        if waits {
            call.push_str(&format!("; this.wait({duration})"));
        }
        return Command {
            code: 355,
            indent,
            parameters: vec![json!(call)],
        };
    }
    Command {
        code: 232,
        indent,
        parameters: params,
    }
}

fn coord_expr(value: Option<&Value>, src: i64) -> String {
    let raw = value.and_then(Value::as_i64).unwrap_or(0);
    if src == 1 {
        format!("$gameVariables.value({raw})")
    } else {
        raw.to_string()
    }
}

fn value_to_script_literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

fn rewrite_get_location_info(mut params: Vec<Value>, indent: Option<i64>) -> Command {
    if params.first().and_then(Value::as_i64) == Some(5) {
        params[0] = json!(6);
    }
    Command {
        code: 285,
        indent,
        parameters: params,
    }
}

fn rewrite_shop(mut params: Vec<Value>, indent: Option<i64>) -> Command {
    params.resize(4, Value::Null);
    if params[3].is_null() {
        params[3] = json!(0);
    }
    Command {
        code: 302,
        indent,
        parameters: params,
    }
}

fn rewrite_change_equipment(mut params: Vec<Value>, indent: Option<i64>) -> Command {
    if let Some(slot) = params.get(1).and_then(Value::as_i64) {
        params[1] = json!(slot + 1);
    }
    Command {
        code: 319,
        indent,
        parameters: params,
    }
}

fn rewrite_change_graphic(mut params: Vec<Value>, indent: Option<i64>) -> Command {
    params.resize(6, Value::Null);
    params[4] = json!(0);
    params[5] = json!("");
    Command {
        code: 322,
        indent,
        parameters: params,
    }
}

fn rewrite_script(code: i64, params: Vec<Value>, indent: Option<i64>) -> Command {
    let translated = params
        .into_iter()
        .map(|v| match v {
            Value::String(s) => json!(script_text::translate_line(&s)),
            other => other,
        })
        .collect();
    Command {
        code,
        indent,
        parameters: translated,
    }
}

fn rewrite_move_route(raw: &RawCommand, indent: Option<i64>) -> Command {
    let projected = raw
        .parameters
        .first()
        .map(move_route::convert_move_route)
        .unwrap_or_else(|| json!({"list": [], "repeat": false, "skippable": false, "wait": false}));
    Command {
        code: 505,
        indent,
        parameters: vec![projected],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::valuetree::ValueTree;

    fn int_array(values: &[i64]) -> ValueTree {
        ValueTree::Array(values.iter().map(|v| ValueTree::Integer(*v)).collect())
    }

    #[test]
    fn show_picture_blend_two_becomes_script_call() {
        let raw = RawCommand {
            code: 231,
            indent: 0,
            parameters: vec![
                ValueTree::Integer(1),
                ValueTree::ByteString(b"Pic".to_vec()),
                ValueTree::Integer(0),
                ValueTree::Integer(0),
                ValueTree::Integer(100),
                ValueTree::Integer(200),
                ValueTree::Integer(100),
                ValueTree::Integer(100),
                ValueTree::Integer(255),
                ValueTree::Integer(2),
            ],
        };
        let out = rewrite_command(&raw).unwrap();
        assert_eq!(out.code, 355);
        assert_eq!(
            out.parameters[0],
            json!("$gameScreen.showPicture(1, \"Pic\", 0, 100, 200, 100, 100, 255, 2)")
        );
    }

    #[test]
    fn conditional_branch_button_14_becomes_script_check() {
        let raw = RawCommand {
            code: 111,
            indent: 0,
            parameters: vec![ValueTree::Integer(11), ValueTree::Integer(14)],
        };
        let out = rewrite_command(&raw).unwrap();
        assert_eq!(out.code, 111);
        assert_eq!(out.parameters, vec![json!(12), json!("Input.isTriggered('A')")]);
    }

    #[test]
    fn show_choices_decrements_cancel_and_pads() {
        let raw = RawCommand {
            code: 102,
            indent: 0,
            parameters: vec![
                ValueTree::Array(vec![
                    ValueTree::ByteString(b"Yes".to_vec()),
                    ValueTree::ByteString(b"No".to_vec()),
                ]),
                ValueTree::Integer(5),
            ],
        };
        let out = rewrite_command(&raw).unwrap();
        assert_eq!(out.parameters[1], json!(-2));
        assert_eq!(out.parameters.len(), 5);
        let _ = int_array(&[]);
    }

    #[test]
    fn flash_screen_drops_when_empty() {
        let raw = RawCommand {
            code: 224,
            indent: 0,
            parameters: vec![],
        };
        let out = rewrite_command(&raw);
        assert!(out.is_none());
    }
}
