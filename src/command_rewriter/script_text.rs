//! Textual translation of embedded Ruby script fragments found inside Script/Comment
//! event commands, from VX Ace's API surface to MV/MZ's.
//!
//! This is deliberately simple string substitution, applied in a fixed order, plus one
//! regex pass. It will misfire on scripts that happen to contain `end` or `else` as
//! part of an identifier or string literal; token-aware rewriting was judged not worth
//! the added complexity for the fragments RPG Maker projects actually emit.
use fancy_regex::Regex;
use std::sync::OnceLock;

/// Ordered list of `(from, to)` literal substitutions, applied before the regex pass.
const SUBSTITUTIONS: &[(&str, &str)] = &[
    ("$game_actors[", "$gameActors._data["),
    (".change_equip_by_id(", ".changeEquipById("),
    ("$game_variables[", "$gameVariables._data["),
    ("$game_switches[", "$gameSwitches._data["),
    ("$game_self_switches[", "$gameSelfSwitches._data["),
    ("$game_player.", "$gamePlayer."),
    ("$game_temp.", "$gameTemp."),
    ("Input.press?(:CTRL)", "Input.isPressed('control')"),
    ("else", "} else {"),
    ("end", "}"),
    ("= nil", "= null"),
    ("fps_mode_change(2)", "Graphics.showFps()"),
    ("fps_mode_change(1)", "Graphics.hideFps()"),
    ("Window_Base.new(", "new Window_Base("),
    (".draw_text(", ".drawText("),
    (
        "SceneManager.scene.log_window.add_text(",
        "SceneManager._scene._logWindow.addText(",
    ),
    ("wait(", "// wait("),
    ("adv_pcture_number(", "// adv_pcture_number("),
];

fn if_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^if\s+(.*)$").expect("static regex is valid"))
}

/// Translates a single line of embedded script text.
pub fn translate_line(line: &str) -> String {
    let mut out = line.to_string();
    for (from, to) in SUBSTITUTIONS {
        out = out.replace(from, to);
    }
    let re = if_line_regex();
    if let Ok(Some(captures)) = re.captures(&out) {
        if let Some(m) = captures.get(1) {
            out = format!("if ({}) {{", m.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_game_actors_indexing() {
        assert_eq!(
            translate_line("$game_actors[1].change_equip_by_id(0, 5)"),
            "$gameActors._data[1].changeEquipById(0, 5)"
        );
    }

    #[test]
    fn rewrites_if_line_via_regex() {
        assert_eq!(translate_line("if $game_switches[1]"), "if ($gameSwitches._data[1]) {");
    }

    #[test]
    fn rewrites_end_and_else_as_braces() {
        assert_eq!(translate_line("else"), "} else {");
        assert_eq!(translate_line("end"), "}");
    }
}
