//! Renders a selection of files into one Markdown document.
//!
//! Each file becomes a bold path header followed by a fenced code block. The
//! fence is always longer than any backtick run inside the content, so file
//! boundaries stay unambiguous.

use crate::exclusion::ExclusionPolicy;
use crate::file_system::{build_tree, SelectedPath};
use crate::models::{AggregateDocument, DocumentStats, FileEntry, FileStatus};
use crate::utils::{compare_rel_paths, detect_language, is_within};
use log::{debug, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const BINARY_SNIFF_BYTES: usize = 4096;
pub const BINARY_PLACEHOLDER: &str = "<Binary file omitted>";
pub const UNDECODABLE_PLACEHOLDER: &str = "<Undecodable file omitted>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePreview {
    pub status: FileStatus,
    pub body: String,
    /// Size on disk, not the size of `body`.
    pub bytes: u64,
}

/// Expands the selection to files, drops anything under `excluded`, then
/// reads and renders what is left in tree order.
pub fn aggregate(
    root: &Path,
    policy: &ExclusionPolicy,
    max_file_bytes: u64,
    selection: &[SelectedPath],
    excluded: &[SelectedPath],
) -> AggregateDocument {
    let mut files = expand_selection(root, policy, selection);
    files.retain(|rel| !excluded.iter().any(|ex| is_within(rel, &ex.rel)));
    debug!("Aggregating {} files", files.len());

    let mut markdown = String::new();
    let mut entries = Vec::with_capacity(files.len());
    for rel in files {
        let language = detect_language(&rel);
        let preview = read_preview(&root.join(&rel), max_file_bytes);
        markdown.push_str(&render_entry(&rel, language.unwrap_or(""), &preview.body));
        entries.push(FileEntry {
            path: rel,
            status: preview.status,
            bytes: preview.bytes,
            language,
        });
    }

    let stats = DocumentStats::measure(&markdown, entries.len());
    AggregateDocument {
        markdown,
        files: entries,
        stats,
    }
}

/// Relative paths of every file the selection covers, sorted and deduplicated.
pub fn expand_selection(root: &Path, policy: &ExclusionPolicy, selection: &[SelectedPath]) -> Vec<String> {
    let mut files = Vec::new();
    for selected in selection {
        if !selected.is_dir {
            files.push(selected.rel.clone());
            continue;
        }
        match build_tree(root, &selected.abs, policy) {
            Ok(tree) => files.extend(tree.file_paths()),
            Err(e) => warn!("Skipping unreadable directory '{}': {}", selected.rel, e),
        }
    }
    files.sort_by(|a, b| compare_rel_paths(a, b));
    files.dedup();
    files
}

/// Reads up to `max_bytes` of a file and classifies it.
pub fn read_preview(path: &Path, max_bytes: u64) -> FilePreview {
    let failed = |what: &str, e: std::io::Error| FilePreview {
        status: FileStatus::Error,
        body: format!("Error: {} failed: {}", what, e),
        bytes: 0,
    };

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => return failed("open", e),
    };
    let size = match file.metadata() {
        Ok(m) => m.len(),
        Err(e) => return failed("stat", e),
    };

    // The sniff window is fixed, even when the size cap is smaller.
    let window = max_bytes
        .saturating_add(1)
        .max(BINARY_SNIFF_BYTES as u64);
    let mut data = Vec::new();
    if let Err(e) = file.take(window).read_to_end(&mut data) {
        return failed("read", e);
    }
    let size = size.max(data.len() as u64);

    let sniff = &data[..data.len().min(BINARY_SNIFF_BYTES)];
    if sniff.contains(&0) {
        return FilePreview {
            status: FileStatus::Binary,
            body: BINARY_PLACEHOLDER.to_string(),
            bytes: size,
        };
    }

    let truncated = data.len() as u64 > max_bytes;
    if truncated {
        data.truncate(max_bytes as usize);
    }

    let text = match String::from_utf8(data) {
        Ok(text) => text,
        // A character split by the size cap is not a decoding error.
        Err(err) if truncated && err.utf8_error().error_len().is_none() => {
            let valid = err.utf8_error().valid_up_to();
            let mut bytes = err.into_bytes();
            bytes.truncate(valid);
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Err(_) => {
            return FilePreview {
                status: FileStatus::Undecodable,
                body: UNDECODABLE_PLACEHOLDER.to_string(),
                bytes: size,
            }
        }
    };

    if truncated {
        FilePreview {
            status: FileStatus::Truncated,
            body: format!("<Truncated: {} bytes > {} byte preview>\n{}", size, max_bytes, text),
            bytes: size,
        }
    } else {
        FilePreview {
            status: FileStatus::Text,
            body: text,
            bytes: size,
        }
    }
}

pub fn render_entry(rel: &str, language: &str, body: &str) -> String {
    format!("**{}**\n{}\n", rel, dynamic_fence(body, language))
}

/// Backtick fence one longer than the longest run in `text`, minimum three.
pub fn dynamic_fence(text: &str, language: &str) -> String {
    let mut longest = 0;
    let mut run = 0;
    for c in text.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    let fence = "`".repeat((longest + 1).max(3));
    format!("{fence}{language}\n{text}\n{fence}\n")
}

impl DocumentStats {
    pub fn measure(markdown: &str, files: usize) -> Self {
        let text = markdown.trim_end();
        DocumentStats {
            files,
            lines: text.lines().count(),
            words: text.split_whitespace().count(),
            characters: text.chars().count(),
        }
    }
}
