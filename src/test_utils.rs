#[cfg(test)]
pub mod fixtures {
    use crate::config::{DEFAULT_EXCLUDES, DEFAULT_MAX_FILE_BYTES};
    use crate::exclusion::ExclusionPolicy;
    use crate::workspace::Workspace;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    pub fn write_file(root: &Path, rel: &str, content: &str) {
        write_bytes(root, rel, content.as_bytes());
    }

    pub fn write_bytes(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    /// Workspace over a fresh temp dir with the built-in exclusions.
    pub fn create_test_workspace() -> (TempDir, Workspace) {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let policy = ExclusionPolicy::new(&root, DEFAULT_EXCLUDES, false).unwrap();
        let workspace = Workspace::new(root, policy, DEFAULT_MAX_FILE_BYTES);
        (dir, workspace)
    }

    /// The scenario repo: `a.py` and `sub/b.py`.
    pub fn create_scenario_workspace() -> (TempDir, Workspace) {
        let (dir, workspace) = create_test_workspace();
        write_file(workspace.root(), "a.py", "x=1");
        write_file(workspace.root(), "sub/b.py", "y=2");
        (dir, workspace)
    }
}
