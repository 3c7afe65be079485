use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Directory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeNode {
    pub name: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Directories only. False when nothing listable is inside, even if
    /// `children` was left empty by a depth limit.
    #[serde(rename = "hasChildren", skip_serializing_if = "Option::is_none")]
    pub has_children: Option<bool>,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn directory(name: String, path: String, children: Vec<TreeNode>, has_children: bool) -> Self {
        TreeNode {
            name,
            path,
            kind: NodeKind::Directory,
            size: None,
            has_children: Some(has_children),
            children,
        }
    }

    pub fn file(name: String, path: String, size: u64) -> Self {
        TreeNode {
            name,
            path,
            kind: NodeKind::File,
            size: Some(size),
            has_children: None,
            children: Vec::new(),
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Relative paths of every file below this node, in tree order.
    pub fn file_paths(&self) -> Vec<String> {
        fn collect_files(node: &TreeNode, files: &mut Vec<String>) {
            if !node.is_dir() {
                files.push(node.path.clone());
            }
            for child in &node.children {
                collect_files(child, files);
            }
        }
        let mut files = Vec::new();
        collect_files(self, &mut files);
        files
    }
}

#[derive(Deserialize)]
pub struct TreeQuery {
    pub path: Option<String>,
    /// Levels of children to include; the whole subtree when absent.
    pub depth: Option<usize>,
}

#[derive(Serialize)]
pub struct TreeResponse {
    pub success: bool,
    pub root: String,
    pub tree: TreeNode,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyRequest {
    #[serde(alias = "files")]
    pub paths: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Text,
    Truncated,
    Binary,
    Undecodable,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub path: String,
    pub status: FileStatus,
    pub bytes: u64,
    pub language: Option<&'static str>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub files: usize,
    pub lines: usize,
    pub words: usize,
    pub characters: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateDocument {
    pub markdown: String,
    pub files: Vec<FileEntry>,
    pub stats: DocumentStats,
}

#[derive(Serialize)]
pub struct CopyResponse {
    pub success: bool,
    #[serde(flatten)]
    pub document: AggregateDocument,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        ErrorResponse {
            success: false,
            error: error.into(),
        }
    }
}
