//! Projects `System.rvdata2`'s single `RPG::System` object.
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Thirteen fixed motion/weapon pairs MV/MZ expect regardless of what the VX Ace
/// source ever stored; VX Ace has no equivalent concept.
const ATTACK_MOTIONS: [(i64, i64); 13] = [
    (0, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0), (1, 0),
];

/// Projects `System.rvdata2`'s root object.
pub fn project(root: &ValueTree) -> Value {
    let terms = root.attr_or_nil("terms");
    let basic = terms
        .attr("basic")
        .and_then(ValueTree::as_array)
        .map(|items| items.iter().filter_map(ValueTree::as_str_lossy).collect::<Vec<_>>())
        .unwrap_or_default();
    let mut basic_terms = vec!["".to_string(), "Lv".to_string(), "HP".to_string(), "MP".to_string(), "TP".to_string()];
    basic_terms.extend(basic);

    let attack_motions = ATTACK_MOTIONS
        .iter()
        .map(|(motion_type, weapon_id)| json!({"type": motion_type, "weaponId": weapon_id}))
        .collect::<Vec<_>>();

    json!({
        "gameTitle": root.attr_or_nil("game_title").as_str_lossy().unwrap_or_default(),
        "locale": "en_US",
        "optSideView": false,
        "currencyUnit": root.attr_or_nil("currency_unit").as_str_lossy().unwrap_or_else(|| "G".to_string()),
        "startMapId": root.attr_or_nil("start_map_id").as_i64().unwrap_or(1),
        "startX": root.attr_or_nil("start_x").as_i64().unwrap_or(0),
        "startY": root.attr_or_nil("start_y").as_i64().unwrap_or(0),
        "partyMembers": root
            .attr("party_members")
            .and_then(ValueTree::as_array)
            .map(|items| Value::Array(items.iter().map(|v| json!(v.as_i64().unwrap_or(1))).collect()))
            .unwrap_or_else(|| json!([1])),
        "attackMotions": attack_motions,
        "terms": {
            "basic": basic_terms,
        },
        "defeatMe": {
            "name": "Defeat1",
            "volume": 0,
            "pitch": 100,
            "pan": 90,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_motions_table_has_thirteen_fixed_entries() {
        let projected = project(&ValueTree::Object { class: "RPG::System".to_string(), attrs: vec![] });
        assert_eq!(projected["attackMotions"].as_array().unwrap().len(), 13);
        assert_eq!(projected["locale"], json!("en_US"));
        assert_eq!(projected["optSideView"], json!(false));
    }

    #[test]
    fn basic_terms_are_prefixed_with_fixed_five() {
        let projected = project(&ValueTree::Object { class: "RPG::System".to_string(), attrs: vec![] });
        let basic = projected["terms"]["basic"].as_array().unwrap();
        assert_eq!(basic[0], json!(""));
        assert_eq!(basic[1], json!("Lv"));
        assert_eq!(basic[4], json!("TP"));
    }

    #[test]
    fn defeat_me_uses_documented_default() {
        let projected = project(&ValueTree::Object { class: "RPG::System".to_string(), attrs: vec![] });
        assert_eq!(projected["defeatMe"]["name"], json!("Defeat1"));
        assert_eq!(projected["defeatMe"]["pan"], json!(90));
    }
}
