use std::cmp::Ordering;
use std::path::{Component, Path};

/// Natural order, falling back to byte order so that names `natord`
/// considers equal (it skips whitespace) still sort deterministically.
pub fn natural_compare(a: &str, b: &str) -> Ordering {
    natord::compare(a, b).then_with(|| a.cmp(b))
}

/// Orders relative paths the way a pre-order walk of the tree visits them:
/// component by component, each compared naturally.
pub fn compare_rel_paths(a: &str, b: &str) -> Ordering {
    let mut left = a.split('/').filter(|s| !s.is_empty());
    let mut right = b.split('/').filter(|s| !s.is_empty());
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) => match natural_compare(l, r) {
                Ordering::Equal => continue,
                other => return other,
            },
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Forward-slash path of `path` relative to `root`; `""` for the root itself.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// True when `child` is `parent` or lives somewhere underneath it.
pub fn is_within(child: &str, parent: &str) -> bool {
    parent.is_empty()
        || child == parent
        || (child.starts_with(parent) && child.as_bytes().get(parent.len()) == Some(&b'/'))
}

pub fn detect_language(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    let lang = match ext.as_str() {
        "py" => "python",
        "js" => "javascript",
        "ts" => "typescript",
        "jsx" => "jsx",
        "tsx" => "tsx",
        "json" => "json",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "cs" => "csharp",
        "go" => "go",
        "rb" => "ruby",
        "php" => "php",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "sh" | "zsh" => "bash",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        "md" => "markdown",
        "rs" => "rust",
        "swift" => "swift",
        _ => return None,
    };
    Some(lang)
}
