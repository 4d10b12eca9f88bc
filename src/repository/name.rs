//! Repository name helpers

use std::sync::LazyLock;

use regex::Regex;

use crate::repository::{Category, Repository};

static RE_REPOSITORY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:(?:.*github\.com.)|^)([A-Za-z0-9-]+/[\w.-]+?)(?:(?:\.git)?|(?:[^\w.-].*)?)$")
        .expect("repository pattern is valid")
});

/// Extract the `owner/name` part from a repository URL or slug, case preserved
pub fn repository_from_url(url: &str) -> Option<String> {
    RE_REPOSITORY
        .captures(url.trim())
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str().to_string())
}

/// Extract the lower-cased `owner/name` part from a repository URL or slug
pub fn extract_repository_from_url(url: &str) -> Option<String> {
    repository_from_url(url).map(|name| name.to_lowercase())
}

/// Name shown to users.
///
/// Prefers the `hacs.json` name, then the integration manifest name, then a
/// title-cased form of the repository name.
pub fn display_name(repository: &Repository) -> String {
    if let Some(name) = &repository.repository_manifest.name {
        return name.clone();
    }

    if repository.category() == Category::Integration {
        let manifest_name = repository
            .integration_manifest
            .as_ref()
            .and_then(|manifest| manifest.name.as_ref());
        if let Some(name) = manifest_name {
            return name.clone();
        }
    }

    title_case(&repository.short_name().replace(['-', '_'], " "))
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
