use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use fiscal_mover::{is_hidden, path_to_string};

use crate::types::BucketSearch;

/// Search the destination folder subtree for the dated bucket directory.
///
/// A hit is a directory literally named `label` whose parent path contains
/// both the year marker and the year-month marker. The walk is sorted by file
/// name so the traversal order does not depend on the underlying filesystem,
/// and all hits are collected: more than one is reported as ambiguous instead
/// of silently picking the first.
pub fn find_dated_bucket(dest_root: &Path, label: &str, year_marker: &str, month_marker: &str) -> BucketSearch {
    let mut hits: Vec<PathBuf> = Vec::new();
    // The root itself must never be pruned: the destination folder name
    // can legitimately start with a dot.
    for entry in WalkDir::new(dest_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_dir() || entry.file_name().to_string_lossy() != label {
            continue;
        }
        let parent = path_to_string(entry.path().parent().unwrap_or(dest_root));
        if parent.contains(year_marker) && parent.contains(month_marker) {
            hits.push(entry.into_path());
        }
    }

    match hits.len() {
        0 => BucketSearch::NotFound,
        1 => BucketSearch::Found(hits.swap_remove(0)),
        _ => BucketSearch::Ambiguous(hits),
    }
}

/// Derive the sibling bucket path by swapping the final path segment.
///
/// Pure string transform: no existence check. If the final segment is not
/// `primary_label` the path is returned unchanged.
#[must_use]
pub fn derive_alternate(primary: &Path, primary_label: &str, alternate_label: &str) -> PathBuf {
    if primary.file_name().is_some_and(|name| name == primary_label) {
        primary.with_file_name(alternate_label)
    } else {
        primary.to_path_buf()
    }
}
