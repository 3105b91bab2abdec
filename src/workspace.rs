//! Mirrored output tree for generated artifacts.
//!
//! Artifacts live under `<workspace>/<repo_name>/`, mirroring the source
//! tree. Each indexed file owns three sibling artifacts derived from its
//! relative path: `<file>.json` (structure), `<file>.analyze.md` (summary),
//! and `<file>.comments.json` (section remarks).

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Per-file artifact locations inside the mirror.
#[derive(Debug, Clone)]
pub struct MirrorPaths {
    pub structure: PathBuf,
    pub summary: PathBuf,
    pub comments: PathBuf,
}

/// The mirrored output tree of one repository.
#[derive(Debug, Clone)]
pub struct Mirror {
    root: PathBuf,
}

impl Mirror {
    /// Resolve (and create) `<workspace_dir>/<repo_name>`, where `repo_name`
    /// is the last real component of the repository path.
    pub fn resolve(workspace_dir: &Path, repo_path: &Path) -> std::io::Result<Self> {
        let repo_name = repo_name_of(repo_path);
        let root = workspace_dir.join(repo_name);
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Artifact paths for one source file, keyed by its repo-relative path.
    pub fn paths_for(&self, relative: &Path) -> MirrorPaths {
        let base = self.root.join(relative);
        MirrorPaths {
            structure: append_suffix(&base, ".json"),
            summary: append_suffix(&base, ".analyze.md"),
            comments: append_suffix(&base, ".comments.json"),
        }
    }
}

fn repo_name_of(repo_path: &Path) -> String {
    repo_path
        .components()
        .rev()
        .find_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .unwrap_or_else(|| "repo".to_string())
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut joined = path.as_os_str().to_os_string();
    joined.push(suffix);
    PathBuf::from(joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_name_ignores_trailing_separators() {
        assert_eq!(repo_name_of(Path::new("/home/dev/code/Rope")), "Rope");
        assert_eq!(repo_name_of(Path::new("/home/dev/code/Rope/")), "Rope");
        assert_eq!(repo_name_of(Path::new("/")), "repo");
    }

    #[test]
    fn artifact_paths_share_the_source_stem() {
        let mirror = Mirror { root: PathBuf::from("workspaces/Rope") };
        let paths = mirror.paths_for(Path::new("rope/GUI.py"));
        assert_eq!(paths.structure, PathBuf::from("workspaces/Rope/rope/GUI.py.json"));
        assert_eq!(paths.summary, PathBuf::from("workspaces/Rope/rope/GUI.py.analyze.md"));
        assert_eq!(paths.comments, PathBuf::from("workspaces/Rope/rope/GUI.py.comments.json"));
    }
}
