//! Utilities for walking directories when packing an archive.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Recursively walks `root`, returning every regular file's path relative to `root`
/// with components joined by `/`, regardless of host platform.
pub fn find_files_relative(root: &Path) -> io::Result<Vec<(String, PathBuf)>> {
    let mut result = Vec::new();
    walk(root, root, &mut result)?;
    result.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(result)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, PathBuf)>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk(root, &path, out)?;
        } else if path.is_file() {
            let rel = relative_path(root, &path);
            let rel_str = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            out.push((rel_str, path));
        }
    }
    Ok(())
}

/// Returns the relative path from `root` to `target`.
pub fn relative_path<P: AsRef<Path>, T: AsRef<Path>>(root: P, target: T) -> PathBuf {
    let root = root
        .as_ref()
        .canonicalize()
        .unwrap_or_else(|_| root.as_ref().to_path_buf());
    let target = target
        .as_ref()
        .canonicalize()
        .unwrap_or_else(|_| target.as_ref().to_path_buf());

    let mut root_components: Vec<_> = root.components().collect();
    let mut target_components: Vec<_> = target.components().collect();

    while !root_components.is_empty()
        && !target_components.is_empty()
        && root_components[0] == target_components[0]
    {
        root_components.remove(0);
        target_components.remove(0);
    }

    let mut result = PathBuf::new();
    for _ in root_components {
        result.push("..");
    }
    for component in target_components {
        result.push(component);
    }
    result
}

/// Ensures that the parent directory for the specified path exists, creating it if necessary.
pub fn make_sure_dir_exists<F: AsRef<Path> + ?Sized>(f: &F) -> io::Result<()> {
    let path = f.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};

    #[test]
    fn walks_nested_directories_with_forward_slashes() {
        let dir = std::env::temp_dir().join(format!(
            "msg_tool_files_test_{:?}",
            std::thread::current().id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("a/b")).unwrap();
        File::create(dir.join("a/b.txt")).unwrap();
        File::create(dir.join("a/b/c.txt")).unwrap();

        let mut found = find_files_relative(&dir).unwrap();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        let names: Vec<_> = found.iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, vec!["a/b.txt".to_string(), "a/b/c.txt".to_string()]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
