//! Projects `RPG::Animation` nodes from `Animations.rvdata2`.
use super::helpers::{interleave_groups_signed, table_flags};
use super::project_indexed_array;
use crate::valuetree::ValueTree;
use serde_json::{json, Value};

/// Cell arrays carry 8 fixed attributes per cell (pattern, x, y, scale, rotation,
/// mirror flag, opacity, blend mode).
const CELL_ATTRS: usize = 8;

/// Projects `Animations.rvdata2`'s root array.
pub fn project(root: &ValueTree) -> Value {
    project_indexed_array(root, project_one)
}

fn project_one(anim: &ValueTree) -> Value {
    let frames = anim
        .attr("frames")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(project_frame)
        .collect::<Vec<_>>();

    let timings = anim
        .attr("timings")
        .and_then(ValueTree::as_array)
        .unwrap_or(&[])
        .iter()
        .map(project_timing)
        .collect::<Vec<_>>();

    json!({
        "id": anim.attr_or_nil("id").as_i64().unwrap_or(0),
        "name": anim.attr_or_nil("name").as_str_lossy().unwrap_or_default(),
        "animation1Name": anim.attr_or_nil("animation1_name").as_str_lossy().unwrap_or_default(),
        "animation1Hue": anim.attr_or_nil("animation1_hue").as_i64().unwrap_or(0),
        "animation2Name": anim.attr_or_nil("animation2_name").as_str_lossy().unwrap_or_default(),
        "animation2Hue": anim.attr_or_nil("animation2_hue").as_i64().unwrap_or(0),
        "position": anim.attr_or_nil("position").as_i64().unwrap_or(1),
        "frames": frames,
        "timings": timings,
    })
}

/// Projects a single frame's `cell_data` table into `cell_max` columns, one per
/// cell, each holding its 8 interleaved attributes as signed 16-bit values.
fn project_frame(frame: &ValueTree) -> Value {
    let cell_max = frame.attr_or_nil("cell_max").as_i64().unwrap_or(0) as usize;
    let flags = table_flags(frame.attr_or_nil("cell_data"));
    if cell_max == 0 || flags.len() < cell_max * CELL_ATTRS {
        return Value::Array(Vec::new());
    }
    interleave_groups_signed(&flags[..cell_max * CELL_ATTRS], CELL_ATTRS)
}

fn project_timing(timing: &ValueTree) -> Value {
    let se = timing.attr_or_nil("se");
    let se_name = se.attr_or_nil("name").as_str_lossy().unwrap_or_default();
    let se_value = if se_name.is_empty() {
        Value::Null
    } else {
        json!({
            "name": se_name,
            "volume": se.attr_or_nil("volume").as_i64().unwrap_or(100),
            "pitch": se.attr_or_nil("pitch").as_i64().unwrap_or(100),
            "pan": se.attr_or_nil("pan").as_i64().unwrap_or(0),
        })
    };

    json!({
        "frame": timing.attr_or_nil("frame").as_i64().unwrap_or(0),
        "se": se_value,
        "flashScope": timing.attr_or_nil("flash_scope").as_i64().unwrap_or(0),
        "flashColor": timing
            .attr("flash_color")
            .and_then(ValueTree::as_array)
            .map(|c| Value::Array(c.iter().map(|v| json!(v.as_f64().unwrap_or(0.0))).collect()))
            .unwrap_or_else(|| json!([255, 255, 255, 255])),
        "flashDuration": timing.attr_or_nil("flash_duration").as_i64().unwrap_or(5),
        "condition": timing.attr_or_nil("condition").as_i64().unwrap_or(0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(values: &[u16]) -> ValueTree {
        let mut bytes = vec![0u8; 0x14];
        for v in values {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        ValueTree::UserDefined { class: "Table".to_string(), bytes }
    }

    #[test]
    fn frame_cell_projection_transposes_into_eight_columns() {
        // 2 cells x 8 attrs, row-major: flags[cell*8 + attr]
        let mut flags = Vec::new();
        for cell in 0..2u16 {
            for attr in 0..8u16 {
                flags.push(cell * 8 + attr);
            }
        }
        let frame = ValueTree::Object {
            class: "RPG::Animation::Frame".to_string(),
            attrs: vec![
                ("cell_max".to_string(), ValueTree::Integer(2)),
                ("cell_data".to_string(), table_of(&flags)),
            ],
        };
        let projected = project_frame(&frame);
        let rows = projected.as_array().unwrap();
        assert_eq!(rows.len(), 8);
        // attribute 0 across both cells: flags[0], flags[8]
        assert_eq!(rows[0], json!([0, 8]));
        // attribute 7 across both cells: flags[7], flags[15]
        assert_eq!(rows[7], json!([7, 15]));
    }

    #[test]
    fn timing_with_empty_se_name_suppresses_audio_effect() {
        let se = ValueTree::Object {
            class: "RPG::AudioFile".to_string(),
            attrs: vec![("name".to_string(), ValueTree::ByteString(Vec::new()))],
        };
        let timing = ValueTree::Object {
            class: "RPG::Animation::Timing".to_string(),
            attrs: vec![("se".to_string(), se)],
        };
        let projected = project_timing(&timing);
        assert_eq!(projected["se"], Value::Null);
    }
}
