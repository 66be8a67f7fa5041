//! Walks a project's `Data` directory, projecting every `.rvdata2` file it
//! recognizes into its MV/MZ JSON counterpart. One bad entity aborts only that
//! entity; the driver keeps going and reports failures at the end.
use crate::error::{Error, Result};
use crate::schema::{self, ENTITIES};
use crate::utils::counter::{Counter, RunResult};
use crate::valuetree::marshal;
use std::fs;
use std::path::Path;

/// Projects every recognized `Data/*.rvdata2` file under `project_dir` into a
/// sibling `.json` file. Returns an error only if `Data` itself could not be read;
/// per-entity failures are printed and counted instead of aborting the whole run.
pub fn run(project_dir: &Path) -> Result<()> {
    let data_dir = project_dir.join("Data");
    if !data_dir.is_dir() {
        return Err(Error::NotADirectory(data_dir));
    }

    let counter = Counter::new();
    for entity in ENTITIES {
        let input = data_dir.join(format!("{}.rvdata2", entity.name));
        if !input.is_file() {
            continue;
        }
        match transcode_one(&input, entity.project) {
            Ok(()) => {
                println!("Transcoded: {}", entity.name);
                counter.inc(RunResult::Ok);
            }
            Err(e) => {
                println!("Error transcoding {}: {e}", entity.name);
                counter.inc_error();
            }
        }
    }

    for map_name in find_map_files(&data_dir)? {
        let input = data_dir.join(format!("{map_name}.rvdata2"));
        match transcode_one(&input, schema::maps::project) {
            Ok(()) => {
                println!("Transcoded: {map_name}");
                counter.inc(RunResult::Ok);
            }
            Err(e) => {
                println!("Error transcoding {map_name}: {e}");
                counter.inc_error();
            }
        }
    }

    println!("{counter}");
    if counter.had_errors() {
        return Err(Error::UnexpectedShape {
            context: "transcode".to_string(),
            detail: "one or more entities failed to transcode".to_string(),
        });
    }
    Ok(())
}

fn transcode_one(input: &Path, project: fn(&crate::valuetree::ValueTree) -> serde_json::Value) -> Result<()> {
    let bytes = fs::read(input)?;
    let tree = marshal::load(&bytes)?;
    let document = project(&tree);
    let output = input.with_extension("json");
    let text = serde_json::to_string_pretty(&document).map_err(|e| Error::UnexpectedShape {
        context: input.display().to_string(),
        detail: format!("failed to serialize JSON: {e}"),
    })?;
    fs::write(output, text)?;
    Ok(())
}

/// Finds every `Map<digits>.rvdata2` file in `data_dir`, sorted by name. `MapInfos`
/// is excluded - it's driven through [ENTITIES] like every other fixed-name entity.
fn find_map_files(data_dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        let Some(stem) = file_name.strip_suffix(".rvdata2") else {
            continue;
        };
        if is_map_stem(stem) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

fn is_map_stem(stem: &str) -> bool {
    stem.len() > 3
        && stem.starts_with("Map")
        && stem[3..].chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_map_stems_and_excludes_map_infos() {
        assert!(is_map_stem("Map001"));
        assert!(is_map_stem("Map123"));
        assert!(!is_map_stem("MapInfos"));
        assert!(!is_map_stem("Map"));
    }
}
