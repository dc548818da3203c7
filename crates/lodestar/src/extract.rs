//! Node lists from Markdown documents.
//!
//! Every document under a directory becomes a [`NodeRecord`] named after its
//! file stem. Its connections are the targets of the `[[target]]` and
//! `[[target|alias]]` links found in the text.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use indexmap::IndexSet;
use log::{debug, info};
use regex::Regex;

use crate::{config::ExtractConfig, error::LodestarError, record::NodeRecord};

static WIKI_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[([^|\]]+)(?:\|[^\]]+)?\]\]").expect("wiki link pattern is valid")
});

/// Collect the link targets of `text`.
///
/// Targets are trimmed and deduplicated, keeping the order in which they
/// first appear. Empty targets are skipped.
pub fn wiki_links(text: &str) -> Vec<String> {
    let targets: IndexSet<&str> = WIKI_LINK
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|target| target.as_str().trim())
        .filter(|target| !target.is_empty())
        .collect();
    targets.into_iter().map(str::to_string).collect()
}

/// Build node records from the documents under `dir`.
///
/// The directory is walked recursively. Records are sorted by id so the
/// output does not depend on directory iteration order.
///
/// # Errors
///
/// Returns [`LodestarError::Extract`] if `dir` is not a directory or a file
/// name is not valid UTF-8, and [`LodestarError::Io`] if reading fails.
pub fn extract(
    dir: impl AsRef<Path>,
    config: &ExtractConfig,
) -> Result<Vec<NodeRecord>, LodestarError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(LodestarError::Extract(format!(
            "`{}` is not a directory",
            dir.display()
        )));
    }

    info!(
        dir = dir.display().to_string(),
        extension = config.extension();
        "Extracting wiki links"
    );

    let mut files = Vec::new();
    collect_documents(dir, config.extension(), &mut files)?;

    let mut records = files
        .iter()
        .map(|path| -> Result<NodeRecord, LodestarError> {
            let id = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| {
                    LodestarError::Extract(format!(
                        "file name of `{}` is not valid UTF-8",
                        path.display()
                    ))
                })?;
            let text = fs::read_to_string(path)?;
            let connections = wiki_links(&text);
            debug!(id = id, links = connections.len(); "Read document");
            Ok(NodeRecord::new(id, connections))
        })
        .collect::<Result<Vec<_>, _>>()?;

    records.sort_by(|a, b| a.id().cmp(b.id()));
    info!(documents = records.len(); "Extraction finished");
    Ok(records)
}

fn collect_documents(
    dir: &Path,
    extension: &str,
    files: &mut Vec<PathBuf>,
) -> Result<(), LodestarError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        // Symlinked directories are not followed
        if entry.file_type()?.is_dir() {
            collect_documents(&path, extension, files)?;
        } else if path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_plain_and_aliased_links() {
        let links = wiki_links("See [[Rivers]] and [[ Mountains | the peaks]].");
        assert_eq!(links, ["Rivers", "Mountains"]);
    }

    #[test]
    fn test_links_are_deduplicated_in_order() {
        let links = wiki_links("[[b]] [[a]] [[b|again]] [[c]] [[a]]");
        assert_eq!(links, ["b", "a", "c"]);
    }

    #[test]
    fn test_malformed_links_are_ignored() {
        let links = wiki_links("[[]] [[open [single] [[|alias]] text");
        assert!(links.is_empty());
    }

    #[test]
    fn test_extract_directory() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("beta.md"), "Links to [[alpha]].").unwrap();
        fs::write(dir.path().join("alpha.md"), "[[beta|B]] and [[gamma]]").unwrap();
        fs::write(dir.path().join("notes.txt"), "[[ignored]]").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("gamma.md"), "no links").unwrap();

        let records = extract(dir.path(), &ExtractConfig::default()).unwrap();

        let ids: Vec<&str> = records.iter().map(NodeRecord::id).collect();
        assert_eq!(ids, ["alpha", "beta", "gamma"]);
        assert_eq!(records[0].connections(), ["beta", "gamma"]);
        assert_eq!(records[1].connections(), ["alpha"]);
        assert!(records[2].connections().is_empty());
    }

    #[test]
    fn test_custom_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("page.wiki"), "[[other]]").unwrap();
        fs::write(dir.path().join("skip.md"), "[[other]]").unwrap();

        let records = extract(dir.path(), &ExtractConfig::new("wiki")).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), "page");
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.md"), "[[leaf]]").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("leaf.md"), "[[root]]").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("nested").join("loop")).unwrap();

        let records = extract(dir.path(), &ExtractConfig::default()).unwrap();

        let ids: Vec<&str> = records.iter().map(NodeRecord::id).collect();
        assert_eq!(ids, ["leaf", "root"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let result = extract(dir.path().join("absent"), &ExtractConfig::default());
        assert!(matches!(result, Err(LodestarError::Extract(_))));
    }
}
