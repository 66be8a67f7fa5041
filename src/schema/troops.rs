//! Projects `RPG::Troop` nodes from `Troops.rvdata2`. Troop pages carry their own
//! event-command lists, rewritten the same way map and common-event commands are.
use super::project_indexed_array;
use crate::command_rewriter::{self, Command};
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Projects `Troops.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(troop: &ValueTree) -> Value {
    let members = troop
        .attr("members")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(|m| {
            json!({
                "enemyId": m.attr_or_nil("enemy_id").as_i64().unwrap_or(1),
                "x": m.attr_or_nil("x").as_i64().unwrap_or(0),
                "y": m.attr_or_nil("y").as_i64().unwrap_or(0),
                "hidden": m.attr_or_nil("hidden").is_truthy(),
            })
        })
        .collect::<Vec<_>>();

    let pages = troop
        .attr("pages")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(project_page)
        .collect::<Vec<_>>();

    json!({
        "id": troop.attr_or_nil("id").as_i64().unwrap_or(0),
        "members": members,
        "name": troop.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "pages": pages,
    })
}

fn project_page(page: &ValueTree) -> Value {
    let condition = page.attr_or_nil("condition");
    let list_tree = page.attr_or_nil("list");
    let raw = command_rewriter::parse_command_list(list_tree);
    let list: Vec<Command> = command_rewriter::rewrite_list(&raw);

    json!({
        "condition": {
            "actorHp": condition.attr_or_nil("actor_hp").as_i64().unwrap_or(50),
            "actorId": condition.attr_or_nil("actor_id").as_i64().unwrap_or(1),
            "actorValid": condition.attr_or_nil("actor_valid").is_truthy(),
            "enemyHp": condition.attr_or_nil("enemy_hp").as_i64().unwrap_or(50),
            "enemyIndex": condition.attr_or_nil("enemy_index").as_i64().unwrap_or(0),
            "enemyValid": condition.attr_or_nil("enemy_valid").is_truthy(),
            "switchId": condition.attr_or_nil("switch_id").as_i64().unwrap_or(1),
            "switchValid": condition.attr_or_nil("switch_valid").is_truthy(),
            "turnA": condition.attr_or_nil("turn_a").as_i64().unwrap_or(0),
            "turnB": condition.attr_or_nil("turn_b").as_i64().unwrap_or(0),
            "turnEnding": condition.attr_or_nil("turn_ending").is_truthy(),
            "turnValid": condition.attr_or_nil("turn_valid").is_truthy(),
        },
        "list": list,
        "span": page.attr_or_nil("span").as_i64().unwrap_or(0),
    })
}
