use crate::error::{PrompsterError, Result};
use crate::exclusion::ExclusionPolicy;
use crate::models::TreeNode;
use crate::utils::{natural_compare, relative_path};
use log::{debug, warn};
use path_clean::PathClean;
use std::fs::{self, DirEntry, FileType};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// A requested path that has been checked against the root and the
/// exclusion policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPath {
    pub rel: String,
    pub abs: PathBuf,
    pub is_dir: bool,
}

/// Resolves a caller-supplied relative path. `""` and `"."` name the root.
pub fn resolve_path(root: &Path, policy: &ExclusionPolicy, requested: &str) -> Result<SelectedPath> {
    let requested_path = Path::new(requested);
    if requested_path.is_absolute() || requested_path.has_root() {
        return Err(PrompsterError::OutsideRoot(requested.to_string()));
    }

    let cleaned = requested_path.clean();
    let mut abs = root.to_path_buf();
    for component in cleaned.components() {
        match component {
            Component::Normal(part) => abs.push(part),
            Component::CurDir => {}
            _ => return Err(PrompsterError::OutsideRoot(requested.to_string())),
        }
    }

    let metadata = match fs::symlink_metadata(&abs) {
        Ok(m) => m,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => return Err(PrompsterError::io(&abs, e)),
        Err(e) => {
            debug!("Cannot stat '{}': {}", abs.display(), e);
            return Err(PrompsterError::NotFound(requested.to_string()));
        }
    };
    if metadata.file_type().is_symlink() {
        return Err(PrompsterError::Symlink(requested.to_string()));
    }

    let canonical = abs.canonicalize().map_err(|e| PrompsterError::io(&abs, e))?;
    if !canonical.starts_with(root) {
        return Err(PrompsterError::OutsideRoot(requested.to_string()));
    }
    if canonical != abs {
        return Err(PrompsterError::Symlink(requested.to_string()));
    }

    if !metadata.is_dir() && !metadata.is_file() {
        return Err(PrompsterError::Unsupported(requested.to_string()));
    }
    if policy.is_excluded_with_parents(&abs, metadata.is_dir()) {
        return Err(PrompsterError::Excluded(requested.to_string()));
    }

    Ok(SelectedPath {
        rel: relative_path(root, &abs),
        abs,
        is_dir: metadata.is_dir(),
    })
}

/// Lists `dir` (the root or a directory below it) recursively.
///
/// Only a failure to read `dir` itself is an error. Below it, unreadable
/// entries, symlinks and non-UTF-8 names are skipped.
pub fn build_tree(root: &Path, dir: &Path, policy: &ExclusionPolicy) -> Result<TreeNode> {
    build_tree_to_depth(root, dir, policy, None)
}

/// Like [`build_tree`], but stops after `depth` levels of children when set.
/// Directories at the cut-off keep an empty child list and report through
/// `has_children` whether expanding them would show anything.
pub fn build_tree_to_depth(
    root: &Path,
    dir: &Path,
    policy: &ExclusionPolicy,
    depth: Option<usize>,
) -> Result<TreeNode> {
    debug!("Building file tree for directory: {} (depth {:?})", dir.display(), depth);
    let entries = fs::read_dir(dir).map_err(|e| PrompsterError::io(dir, e))?;
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string());
    Ok(directory_node(
        root,
        name,
        relative_path(root, dir),
        visible_entries(entries, policy),
        policy,
        depth,
    ))
}

type Visible = (DirEntry, FileType, String);

fn directory_node(
    root: &Path,
    name: String,
    rel: String,
    entries: Vec<Visible>,
    policy: &ExclusionPolicy,
    depth: Option<usize>,
) -> TreeNode {
    let has_children = !entries.is_empty();
    let children = match depth {
        Some(0) => Vec::new(),
        _ => entries
            .into_iter()
            .map(|entry| child_node(root, entry, policy, depth.map(|d| d - 1)))
            .collect(),
    };
    TreeNode::directory(name, rel, children, has_children)
}

fn child_node(
    root: &Path,
    (entry, file_type, name): Visible,
    policy: &ExclusionPolicy,
    depth: Option<usize>,
) -> TreeNode {
    let path = entry.path();
    let rel = relative_path(root, &path);
    if file_type.is_dir() {
        let entries = match fs::read_dir(&path) {
            Ok(entries) => visible_entries(entries, policy),
            Err(e) => {
                warn!("Cannot read directory '{}': {}", path.display(), e);
                Vec::new()
            }
        };
        directory_node(root, name, rel, entries, policy, depth)
    } else {
        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        TreeNode::file(name, rel, size)
    }
}

/// Entries of one directory that may be listed, in sibling order.
fn visible_entries(entries: fs::ReadDir, policy: &ExclusionPolicy) -> Vec<Visible> {
    let mut dirents: Vec<Visible> = Vec::new();

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable directory entry: {}", e);
                continue;
            }
        };
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                warn!("Skipping '{}': {}", entry.path().display(), e);
                continue;
            }
        };
        if file_type.is_symlink() {
            debug!("Skipping symlink: {}", entry.path().display());
            continue;
        }
        if !file_type.is_dir() && !file_type.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            debug!("Skipping non-UTF-8 name: {}", entry.path().display());
            continue;
        };
        if policy.is_excluded(&entry.path(), file_type.is_dir()) {
            continue;
        }
        dirents.push((entry, file_type, name));
    }

    dirents.sort_by(|a, b| natural_compare(&a.2, &b.2));
    dirents
}
