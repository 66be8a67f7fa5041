//! Projects a single `Map*.rvdata2` object graph. Unlike every other entity kind,
//! each map lives in its own file and is handled directly by the driver rather than
//! through `ENTITIES` - there's no shared index to walk.
use crate::command_rewriter::{self, Command};
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// A decoded `Table` blob's dimensions plus its flat, row-major body.
struct Table {
    xsize: usize,
    ysize: usize,
    zsize: usize,
    flags: Vec<u16>,
}

/// `Table#_dump` lays out a 20-byte header - dimension count, then x/y/z sizes,
/// then total item count - before the flat little-endian `u16` payload.
fn decode_table(node: &ValueTree) -> Option<Table> {
    let ValueTree::UserDefined { class, bytes } = node else { return None };
    if class != "Table" || bytes.len() < 0x14 {
        return None;
    }
    let read_u32 = |off: usize| u32::from_le_bytes(bytes[off..off + 4].try_into().unwrap());
    let xsize = read_u32(4) as usize;
    let ysize = read_u32(8) as usize;
    let zsize = read_u32(12) as usize;
    let flags = bytes[0x14..]
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect();
    Some(Table { xsize, ysize, zsize, flags })
}

/// A map event whose single page is purely a static tile overlay: non-zero tile
/// graphic, no enabled condition. These are folded into the synthesized upper
/// layers instead of appearing in `events`.
fn is_tile_event(event: &ValueTree) -> bool {
    let pages = match event.attr("pages").and_then(ValueTree::as_array) {
        Some(p) if p.len() == 1 => p,
        _ => return false,
    };
    let page = &pages[0];
    let graphic = page.attr_or_nil("graphic");
    let tile_id = graphic.attr_or_nil("tile_id").as_i64().unwrap_or(0);
    if tile_id == 0 {
        return false;
    }
    let condition = page.attr_or_nil("condition");
    let flags = [
        "switch1_valid",
        "switch2_valid",
        "variable_valid",
        "self_switch_valid",
        "item_valid",
        "actor_valid",
    ];
    flags.iter().all(|f| !condition.attr_or_nil(f).is_truthy())
}

/// Projects one `Map*.rvdata2` root object into its MV/MZ JSON document.
pub fn project(root: &ValueTree) -> Value {
    let width = root.attr_or_nil("width").as_i64().unwrap_or(0) as usize;
    let height = root.attr_or_nil("height").as_i64().unwrap_or(0) as usize;
    let plane = width * height;

    let table = decode_table(root.attr_or_nil("data"));
    let layer = |z: usize| -> Vec<i64> {
        match &table {
            Some(t) if t.zsize > z && t.flags.len() >= (z + 1) * t.xsize * t.ysize => {
                t.flags[z * plane..(z + 1) * plane].iter().map(|&v| v as i64).collect()
            }
            _ => vec![0; plane],
        }
    };
    let layer0 = layer(0);
    let layer1 = layer(1);
    let layer3 = layer(3);

    let mut upper_tile_id = vec![0i64; plane];
    let mut upper_event_graphic = vec![0i64; plane];

    let event_pairs: &[(ValueTree, ValueTree)] = match root.attr_or_nil("events") {
        ValueTree::Mapping(pairs) => pairs,
        _ => &[],
    };

    let mut tile_event_ids = std::collections::HashSet::new();
    for (key, event) in event_pairs {
        if !is_tile_event(event) {
            continue;
        }
        let Some(id) = key.as_i64() else { continue };
        tile_event_ids.insert(id);
        let x = event.attr_or_nil("x").as_i64().unwrap_or(0) as usize;
        let y = event.attr_or_nil("y").as_i64().unwrap_or(0) as usize;
        if x < width && y < height {
            let idx = y * width + x;
            let tile_id = event.attr_or_nil("pages").as_array().unwrap_or(&[])[0]
                .attr_or_nil("graphic")
                .attr_or_nil("tile_id")
                .as_i64()
                .unwrap_or(0);
            upper_tile_id[idx] = tile_id;
            upper_event_graphic[idx] = 0;
        }
    }

    let region: Vec<i64> = layer3.iter().map(|&v| v >> 8).collect();

    let mut data = Vec::with_capacity(plane * 6);
    data.extend(layer0);
    data.extend(layer1);
    data.extend(upper_tile_id);
    data.extend(upper_event_graphic);
    data.extend(layer3);
    data.extend(region);

    let max_id = event_pairs
        .iter()
        .filter_map(|(k, _)| k.as_i64())
        .filter(|id| !tile_event_ids.contains(id))
        .max()
        .unwrap_or(0);
    let mut events = vec![Value::Null; (max_id + 1) as usize];
    for (key, event) in event_pairs {
        let Some(id) = key.as_i64() else { continue };
        if id <= 0 || tile_event_ids.contains(&id) {
            continue;
        }
        if (id as usize) < events.len() {
            events[id as usize] = project_event(id, event);
        }
    }

    json!({
        "autoplayBgm": root.attr_or_nil("autoplay_bgm").is_truthy(),
        "autoplayBgs": root.attr_or_nil("autoplay_bgs").is_truthy(),
        "battleback1Name": root.attr_or_nil("battleback1_name").as_str_lossy().unwrap_or_default(),
        "battleback2Name": root.attr_or_nil("battleback2_name").as_str_lossy().unwrap_or_default(),
        "bgm": project_audio(root.attr_or_nil("bgm")),
        "bgs": project_audio(root.attr_or_nil("bgs")),
        "disableDashing": root.attr_or_nil("disable_dashing").is_truthy(),
        "displayName": root.attr_or_nil("display_name").as_str_lossy().unwrap_or_default(),
        "encounterList": json!([]),
        "encounterStep": root.attr_or_nil("encounter_step").as_i64().unwrap_or(30),
        "height": height,
        "note": root.attr_or_nil("note").as_str_lossy().unwrap_or_default(),
        "parallaxLoopX": root.attr_or_nil("parallax_loop_x").is_truthy(),
        "parallaxLoopY": root.attr_or_nil("parallax_loop_y").is_truthy(),
        "parallaxName": root.attr_or_nil("parallax_name").as_str_lossy().unwrap_or_default(),
        "parallaxShow": root.attr_or_nil("parallax_show").is_truthy(),
        "parallaxSx": root.attr_or_nil("parallax_sx").as_i64().unwrap_or(0),
        "parallaxSy": root.attr_or_nil("parallax_sy").as_i64().unwrap_or(0),
        "scrollType": root.attr_or_nil("scroll_type").as_i64().unwrap_or(0),
        "specifyBattleback": root.attr_or_nil("specify_battleback").is_truthy(),
        "tilesetId": root.attr_or_nil("tileset_id").as_i64().unwrap_or(1),
        "width": width,
        "data": data,
        "events": events,
    })
}

fn project_audio(audio: &ValueTree) -> Value {
    json!({
        "name": audio.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "volume": audio.attr_or_nil("volume").as_i64().unwrap_or(100),
        "pitch": audio.attr_or_nil("pitch").as_i64().unwrap_or(100),
        "pan": audio.attr_or_nil("pan").as_i64().unwrap_or(0),
    })
}

fn project_event(id: i64, event: &ValueTree) -> Value {
    let pages = event
        .attr("pages")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(project_page)
        .collect::<Vec<_>>();

    json!({
        "id": id,
        "name": event.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "x": event.attr_or_nil("x").as_i64().unwrap_or(0),
        "y": event.attr_or_nil("y").as_i64().unwrap_or(0),
        "pages": pages,
    })
}

fn project_page(page: &ValueTree) -> Value {
    let condition = page.attr_or_nil("condition");
    let graphic = page.attr_or_nil("graphic");
    let raw = command_rewriter::parse_command_list(page.attr_or_nil("list"));
    let list: Vec<Command> = command_rewriter::rewrite_list(&raw);

    json!({
        "conditions": {
            "actorId": condition.attr_or_nil("actor_id").as_i64().unwrap_or(1),
            "actorValid": condition.attr_or_nil("actor_valid").is_truthy(),
            "itemId": condition.attr_or_nil("item_id").as_i64().unwrap_or(1),
            "itemValid": condition.attr_or_nil("item_valid").is_truthy(),
            "selfSwitchCh": condition.attr_or_nil("self_switch_ch").as_str_lossy().unwrap_or_else(|| "A".to_string()),
            "selfSwitchValid": condition.attr_or_nil("self_switch_valid").is_truthy(),
            "switch1Id": condition.attr_or_nil("switch1_id").as_i64().unwrap_or(1),
            "switch1Valid": condition.attr_or_nil("switch1_valid").is_truthy(),
            "switch2Id": condition.attr_or_nil("switch2_id").as_i64().unwrap_or(1),
            "switch2Valid": condition.attr_or_nil("switch2_valid").is_truthy(),
            "variableId": condition.attr_or_nil("variable_id").as_i64().unwrap_or(1),
            "variableValid": condition.attr_or_nil("variable_valid").is_truthy(),
            "variableValue": condition.attr_or_nil("variable_value").as_i64().unwrap_or(0),
        },
        "image": {
            "tileId": graphic.attr_or_nil("tile_id").as_i64().unwrap_or(0),
            "characterName": graphic.attr_or_nil("character_name").as_str_lossy().unwrap_or_default(),
            "characterIndex": graphic.attr_or_nil("character_index").as_i64().unwrap_or(0),
            "direction": graphic.attr_or_nil("direction").as_i64().unwrap_or(2),
            "pattern": graphic.attr_or_nil("pattern").as_i64().unwrap_or(0),
        },
        "moveType": page.attr_or_nil("move_type").as_i64().unwrap_or(0),
        "moveSpeed": page.attr_or_nil("move_speed").as_i64().unwrap_or(3),
        "moveFrequency": page.attr_or_nil("move_frequency").as_i64().unwrap_or(3),
        "moveRoute": command_rewriter::convert_param(page.attr_or_nil("move_route")),
        "walkAnime": page.attr_or_nil("walk_anime").is_truthy(),
        "stepAnime": page.attr_or_nil("step_anime").is_truthy(),
        "directionFix": page.attr_or_nil("direction_fix").is_truthy(),
        "through": page.attr_or_nil("through").is_truthy(),
        "priorityType": page.attr_or_nil("priority_type").as_i64().unwrap_or(1),
        "trigger": page.attr_or_nil("trigger").as_i64().unwrap_or(0),
        "list": list,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_bytes(xsize: u32, ysize: u32, zsize: u32, flags: &[u16]) -> Vec<u8> {
        let mut bytes = vec![0u8; 0x14];
        bytes[4..8].copy_from_slice(&xsize.to_le_bytes());
        bytes[8..12].copy_from_slice(&ysize.to_le_bytes());
        bytes[12..16].copy_from_slice(&zsize.to_le_bytes());
        for f in flags {
            bytes.extend_from_slice(&f.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn data_concatenates_six_planes_with_region_from_layer3() {
        // 2x1 map, 4 layers; layer3 values carry a region id in the upper byte.
        let flags: Vec<u16> = vec![
            10, 11, // layer0
            20, 21, // layer1
            0, 0, // layer2 (unused)
            0x0305, 0x0406, // layer3: shadow in low byte, region in high byte
        ];
        let map = ValueTree::Object {
            class: "RPG::Map".to_string(),
            attrs: vec![
                ("width".to_string(), ValueTree::Integer(2)),
                ("height".to_string(), ValueTree::Integer(1)),
                ("data".to_string(), ValueTree::UserDefined { class: "Table".to_string(), bytes: table_bytes(2, 1, 4, &flags) }),
            ],
        };
        let projected = project(&map);
        let data = projected["data"].as_array().unwrap();
        assert_eq!(data.len(), 12);
        assert_eq!(data[0], json!(10));
        assert_eq!(data[1], json!(11));
        assert_eq!(data[4], json!(20));
        assert_eq!(data[5], json!(21));
        // shadow plane: raw layer3
        assert_eq!(data[8], json!(0x0305));
        assert_eq!(data[9], json!(0x0406));
        // region plane: layer3 >> 8
        assert_eq!(data[10], json!(0x0305i64 >> 8));
        assert_eq!(data[11], json!(0x0406i64 >> 8));
    }

    #[test]
    fn tile_events_are_folded_into_upper_layer_and_omitted_from_events() {
        let page = ValueTree::Object {
            class: "RPG::Event::Page".to_string(),
            attrs: vec![
                ("graphic".to_string(), ValueTree::Object {
                    class: "RPG::Event::Page::Graphic".to_string(),
                    attrs: vec![("tile_id".to_string(), ValueTree::Integer(42))],
                }),
                ("condition".to_string(), ValueTree::Nil),
            ],
        };
        let tile_event = ValueTree::Object {
            class: "RPG::Event".to_string(),
            attrs: vec![
                ("x".to_string(), ValueTree::Integer(1)),
                ("y".to_string(), ValueTree::Integer(0)),
                ("pages".to_string(), ValueTree::Array(vec![page])),
            ],
        };
        let map = ValueTree::Object {
            class: "RPG::Map".to_string(),
            attrs: vec![
                ("width".to_string(), ValueTree::Integer(2)),
                ("height".to_string(), ValueTree::Integer(1)),
                ("events".to_string(), ValueTree::Mapping(vec![(ValueTree::Integer(1), tile_event)])),
            ],
        };
        let projected = project(&map);
        assert_eq!(projected["events"].as_array().unwrap().len(), 1);
        let data = projected["data"].as_array().unwrap();
        // upper-tile-id plane starts at offset 2*plane = 4
        assert_eq!(data[4], json!(0));
        assert_eq!(data[5], json!(42));
    }
}
