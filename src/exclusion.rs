//! Which filesystem entries are hidden from browsing and selection.
//!
//! Patterns use gitignore syntax and are compiled with the `ignore` crate.
//! Dotfiles are hidden unless explicitly shown, and the root `.gitignore`
//! can be layered on top.

use crate::config::{Config, DEFAULT_EXCLUDES};
use crate::error::{PrompsterError, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub const IGNORE_FILE_NAME: &str = ".prompsterignore";

#[derive(Debug)]
pub struct ExclusionPolicy {
    root: PathBuf,
    patterns: Gitignore,
    gitignore: Option<Gitignore>,
    show_hidden: bool,
}

impl ExclusionPolicy {
    pub fn new<S: AsRef<str>>(root: &Path, patterns: &[S], show_hidden: bool) -> Result<Self> {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in patterns {
            builder.add_line(None, pattern.as_ref()).map_err(|e| {
                PrompsterError::Config(format!(
                    "invalid exclusion pattern '{}': {}",
                    pattern.as_ref(),
                    e
                ))
            })?;
        }
        let patterns = builder
            .build()
            .map_err(|e| PrompsterError::Config(format!("failed to compile exclusion patterns: {}", e)))?;

        Ok(ExclusionPolicy {
            root: root.to_path_buf(),
            patterns,
            gitignore: None,
            show_hidden,
        })
    }

    /// Defaults, configured extras and the root's `.prompsterignore`, plus the
    /// root `.gitignore` when enabled.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut patterns: Vec<String> = DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect();
        patterns.extend(config.extra_excludes.iter().cloned());
        patterns.extend(read_ignore_file(&config.root));

        let policy = Self::new(&config.root, &patterns, config.show_hidden)?;
        Ok(if config.respect_gitignore {
            policy.with_gitignore()
        } else {
            policy
        })
    }

    pub fn with_gitignore(mut self) -> Self {
        let path = self.root.join(".gitignore");
        if !path.is_file() {
            return self;
        }
        let (gitignore, err) = Gitignore::new(&path);
        if let Some(e) = err {
            warn!("Problem parsing '{}': {}", path.display(), e);
        }
        debug!("Loaded {} rules from '{}'", gitignore.num_ignores(), path.display());
        self.gitignore = Some(gitignore);
        self
    }

    /// Checks a single entry (an absolute path under the root) on its own name
    /// and position; ancestors are not consulted.
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        if path == self.root {
            return false;
        }
        if !self.show_hidden && is_hidden(path) {
            return true;
        }
        if self.patterns.matched(path, is_dir).is_ignore() {
            return true;
        }
        self.gitignore
            .as_ref()
            .is_some_and(|ig| ig.matched(path, is_dir).is_ignore())
    }

    /// Like [`is_excluded`](Self::is_excluded), but also true when any ancestor
    /// directory below the root is excluded.
    pub fn is_excluded_with_parents(&self, path: &Path, is_dir: bool) -> bool {
        if self.is_excluded(path, is_dir) {
            return true;
        }
        path.ancestors()
            .skip(1)
            .take_while(|dir| *dir != self.root && dir.starts_with(&self.root))
            .any(|dir| self.is_excluded(dir, true))
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') && name != "." && name != "..")
}

/// Patterns from `<root>/.prompsterignore`, skipping blanks and `#` comments.
pub fn read_ignore_file(root: &Path) -> Vec<String> {
    let path = root.join(IGNORE_FILE_NAME);
    let Ok(bytes) = fs::read(&path) else {
        return Vec::new();
    };
    let patterns: Vec<String> = String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    debug!("Read {} patterns from '{}'", patterns.len(), path.display());
    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn default_policy(root: &Path) -> ExclusionPolicy {
        ExclusionPolicy::new(root, DEFAULT_EXCLUDES, false).unwrap()
    }

    #[test]
    fn default_patterns_hide_dependency_and_build_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let policy = default_policy(&root);

        assert!(policy.is_excluded(&root.join("node_modules"), true));
        assert!(policy.is_excluded(&root.join("pkg").join("__pycache__"), true));
        assert!(policy.is_excluded(&root.join("mod.pyc"), false));
        assert!(!policy.is_excluded(&root.join("src"), true));
        assert!(!policy.is_excluded(&root.join("main.py"), false));
    }

    #[test]
    fn directory_patterns_do_not_hide_files_of_the_same_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let policy = default_policy(&root);

        assert!(policy.is_excluded(&root.join("build"), true));
        assert!(!policy.is_excluded(&root.join("build"), false));
    }

    #[test]
    fn dotfiles_are_hidden_unless_shown() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();

        let hidden = ExclusionPolicy::new::<&str>(&root, &[], false).unwrap();
        assert!(hidden.is_excluded(&root.join(".env"), false));

        let shown = ExclusionPolicy::new::<&str>(&root, &[], true).unwrap();
        assert!(!shown.is_excluded(&root.join(".env"), false));
    }

    #[test]
    fn root_itself_is_never_excluded() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap().join(".hidden-root");
        std::fs::create_dir(&root).unwrap();
        let policy = default_policy(&root);
        assert!(!policy.is_excluded(&root, true));
    }

    #[test]
    fn parents_are_checked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let policy = default_policy(&root);
        let inside = root.join("node_modules").join("left-pad").join("index.js");

        assert!(!policy.is_excluded(&inside, false));
        assert!(policy.is_excluded_with_parents(&inside, false));
        assert!(!policy.is_excluded_with_parents(&root.join("src").join("index.js"), false));
    }

    #[test]
    fn ignore_file_adds_patterns() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(
            root.join(IGNORE_FILE_NAME),
            "# generated output\n\n*.snap\nfixtures/\n",
        )
        .unwrap();

        assert_eq!(read_ignore_file(&root), vec!["*.snap", "fixtures/"]);
    }

    #[test]
    fn gitignore_is_layered_on_top() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join(".gitignore"), "*.log\n").unwrap();

        let without = default_policy(&root);
        assert!(!without.is_excluded(&root.join("server.log"), false));

        let with = default_policy(&root).with_gitignore();
        assert!(with.is_excluded(&root.join("server.log"), false));
    }

    #[test]
    fn invalid_patterns_are_config_errors() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let result = ExclusionPolicy::new(&root, &["src/[z-a]"], false);
        assert!(matches!(result, Err(PrompsterError::Config(_))));
    }
}
