//! Content path resolution
//!
//! `validate()` and `update()` both resolve the remote content path through
//! [`resolve_remote_path`], so the two passes always agree on where a
//! package lives inside its tree.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::HacsError;
use crate::repository::Category;
use crate::source::FileEntry;

/// Ref as shown to users: `tags/v1.2.0` is displayed as `v1.2.0`
pub fn display_ref(git_ref: &str) -> &str {
    git_ref.strip_prefix("tags/").unwrap_or(git_ref)
}

/// Join a content directory and a file name, treating "" as the root
pub fn join_path(directory: &str, file: &str) -> String {
    if directory.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", directory, file)
    }
}

/// Locate the package root inside the fetched tree.
///
/// Returns an empty string for the repository root.
pub fn resolve_remote_path(
    category: Category,
    content_in_root: bool,
    tree: &[FileEntry],
    git_ref: &str,
) -> Result<String, HacsError> {
    if content_in_root {
        return Ok(String::new());
    }

    match category {
        Category::Integration => single_directory(tree, "custom_components", git_ref),
        Category::AppDaemon => single_directory(tree, "apps", git_ref),
        Category::Plugin => first_location_with(tree, &["dist", ""], ".js", git_ref),
        Category::Theme => first_location_with(tree, &["themes"], ".yaml", git_ref),
        Category::PythonScript => first_location_with(tree, &["python_scripts"], ".py", git_ref),
    }
}

/// Where the package is placed inside the host configuration directory
pub fn local_path(category: Category, config_path: &Path, name: &str) -> PathBuf {
    match category {
        Category::Integration => config_path.join("custom_components").join(name),
        Category::Plugin => config_path.join("www/community").join(name),
        Category::Theme => config_path.join("themes"),
        Category::PythonScript => config_path.join("python_scripts"),
        Category::AppDaemon => config_path.join("appdaemon/apps").join(name),
    }
}

/// Names of the directories directly below `parent`
pub fn directories_in(tree: &[FileEntry], parent: &str) -> BTreeSet<String> {
    let prefix = format!("{}/", parent);
    tree.iter()
        .filter_map(|entry| {
            let rest = entry.path.strip_prefix(&prefix)?;
            match rest.split_once('/') {
                Some((directory, _)) => Some(directory.to_string()),
                None if entry.is_directory() => Some(rest.to_string()),
                None => None,
            }
        })
        .collect()
}

/// Files directly inside `directory` (the root when empty) with the given extension
pub fn files_with_extension<'a>(
    tree: &'a [FileEntry],
    directory: &'a str,
    extension: &'a str,
) -> impl Iterator<Item = &'a FileEntry> + 'a {
    tree.iter().filter(move |entry| {
        !entry.is_directory() && entry.parent() == directory && entry.path.ends_with(extension)
    })
}

fn single_directory(tree: &[FileEntry], parent: &str, git_ref: &str) -> Result<String, HacsError> {
    let directories = directories_in(tree, parent);
    let mut names = directories.iter();

    match (names.next(), names.next()) {
        (Some(name), None) => Ok(format!("{}/{}", parent, name)),
        (None, _) => Err(HacsError::NonCompliant {
            git_ref: display_ref(git_ref).to_string(),
        }),
        (Some(_), Some(_)) => Err(HacsError::AmbiguousContent {
            git_ref: display_ref(git_ref).to_string(),
            candidates: directories.into_iter().collect(),
        }),
    }
}

fn first_location_with(
    tree: &[FileEntry],
    locations: &[&str],
    extension: &str,
    git_ref: &str,
) -> Result<String, HacsError> {
    locations
        .iter()
        .find(|location| files_with_extension(tree, location, extension).next().is_some())
        .map(|location| location.to_string())
        .ok_or_else(|| HacsError::NonCompliant {
            git_ref: display_ref(git_ref).to_string(),
        })
}
