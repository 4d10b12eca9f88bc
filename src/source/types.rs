//! Wire types returned by the source host

use serde::Deserialize;

/// Repository metadata
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoHandle {
    pub full_name: String,
    pub default_branch: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub stargazers_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Blob,
    Tree,
    Commit,
}

/// One entry of a recursive tree listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl FileEntry {
    pub fn blob(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: EntryKind::Blob,
        }
    }

    pub fn tree(path: &str) -> Self {
        Self {
            path: path.to_string(),
            kind: EntryKind::Tree,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Tree
    }

    /// Last path segment
    pub fn filename(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Directory containing this entry, empty for root-level entries
    pub fn parent(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}

/// Latest published release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub body: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("custom_components/foo/manifest.json", "manifest.json", "custom_components/foo")]
    #[case("README.md", "README.md", "")]
    #[case("dist/card.js", "card.js", "dist")]
    fn file_entry_splits_path(
        #[case] path: &str,
        #[case] filename: &str,
        #[case] parent: &str,
    ) {
        let entry = FileEntry::blob(path);
        assert_eq!(entry.filename(), filename);
        assert_eq!(entry.parent(), parent);
    }

    #[test]
    fn file_entry_deserializes_github_tree_item() {
        let entry: FileEntry = serde_json::from_str(
            r#"{"path": "custom_components", "mode": "040000", "type": "tree", "sha": "abc"}"#,
        )
        .unwrap();

        assert_eq!(entry, FileEntry::tree("custom_components"));
        assert!(entry.is_directory());
    }
}
