//! Projects rvdata2 object graphs into the MV/MZ JSON schema, one module per entity
//! kind plus the shared helpers they all lean on.
pub mod actors;
pub mod animations;
pub mod armors;
pub mod classes;
pub mod common_events;
pub mod enemies;
pub mod helpers;
pub mod items;
pub mod map_infos;
pub mod maps;
pub mod skills;
pub mod states;
pub mod system;
pub mod tilesets;
pub mod troops;
pub mod weapons;

use crate::valuetree::ValueTree;
use serde_json::Value;

/// Every rvdata2 data file except `System` and `Map*` is a 1-indexed array with a
/// `null` placeholder at index 0. This walks such an array, projecting every present
/// entry and leaving `nil` entries as `null`.
pub fn project_indexed_array(root: &ValueTree, project: impl Fn(&ValueTree) -> Value) -> Value {
    let items = root.as_array().unwrap_or(&[]);
    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if i == 0 {
            out.push(Value::Null);
            continue;
        }
        if matches!(item, ValueTree::Nil) {
            out.push(Value::Null);
        } else {
            out.push(project(item));
        }
    }
    Value::Array(out)
}

/// The name of the entity kind paired with its projection function, used by the
/// driver that walks `OUT/Data/*.rvdata2`.
pub struct Entity {
    /// File stem shared by both the `.rvdata2` input and the `.json` output.
    pub name: &'static str,
    /// Projects a parsed rvdata2 root node into its MV/MZ JSON document.
    pub project: fn(&ValueTree) -> Value,
}

/// All entity kinds this transcoder knows how to project, in a stable order.
pub const ENTITIES: &[Entity] = &[
    Entity { name: "Actors", project: actors::project },
    Entity { name: "Classes", project: classes::project_classes },
    Entity { name: "Skills", project: skills::project },
    Entity { name: "Items", project: items::project },
    Entity { name: "Weapons", project: weapons::project },
    Entity { name: "Armors", project: armors::project },
    Entity { name: "Enemies", project: enemies::project },
    Entity { name: "Troops", project: troops::project },
    Entity { name: "States", project: states::project },
    Entity { name: "Animations", project: animations::project },
    Entity { name: "Tilesets", project: tilesets::project },
    Entity { name: "CommonEvents", project: common_events::project },
    Entity { name: "MapInfos", project: map_infos::project },
    Entity { name: "System", project: system::project },
];
