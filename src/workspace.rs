use crate::aggregator::aggregate;
use crate::config::Config;
use crate::error::{PrompsterError, Result};
use crate::exclusion::ExclusionPolicy;
use crate::file_system::{build_tree_to_depth, resolve_path, SelectedPath};
use crate::models::{AggregateDocument, CopyRequest, TreeNode};
use std::path::{Path, PathBuf};

/// The browsed root together with the rules that apply to it. Shared
/// read-only by every request.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    policy: ExclusionPolicy,
    max_file_bytes: u64,
}

impl Workspace {
    /// `root` must already be canonical.
    pub fn new(root: PathBuf, policy: ExclusionPolicy, max_file_bytes: u64) -> Self {
        Workspace {
            root,
            policy,
            max_file_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let policy = ExclusionPolicy::from_config(config)?;
        Ok(Self::new(config.root.clone(), policy, config.max_file_bytes))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    pub fn resolve(&self, requested: &str) -> Result<SelectedPath> {
        resolve_path(&self.root, &self.policy, requested)
    }

    /// Tree for the root, or for the directory `requested` names, optionally
    /// cut off after `depth` levels.
    pub fn list_tree(&self, requested: &str, depth: Option<usize>) -> Result<TreeNode> {
        let selected = self.resolve(requested)?;
        if !selected.is_dir {
            return Err(PrompsterError::NotADirectory(requested.to_string()));
        }
        build_tree_to_depth(&self.root, &selected.abs, &self.policy, depth)
    }

    /// Validates every requested path before reading anything; one bad path
    /// rejects the whole request.
    pub fn aggregate(&self, request: &CopyRequest) -> Result<AggregateDocument> {
        let selection = request
            .paths
            .iter()
            .map(|p| self.resolve(p))
            .collect::<Result<Vec<_>>>()?;
        let excluded = request
            .exclude
            .iter()
            .map(|p| self.resolve(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(aggregate(
            &self.root,
            &self.policy,
            self.max_file_bytes,
            &selection,
            &excluded,
        ))
    }
}
