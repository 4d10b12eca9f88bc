use crate::repository::Repository;
use crate::repository::content::{files_with_extension, join_path};
use crate::validate::{ValidationException, ValidationRule};

/// Check that the content directory holds at least one file with `extension`,
/// and the file named in `hacs.json` when there is one
fn require_content_file(
    repository: &Repository,
    extension: &str,
    kind: &str,
) -> Result<(), ValidationException> {
    let directory = repository.content.path.remote.as_deref().unwrap_or("");

    if let Some(filename) = &repository.repository_manifest.filename {
        let expected = join_path(directory, filename);
        if !repository.tree.iter().any(|entry| entry.path == expected) {
            return Err(ValidationException::new(format!(
                "The file '{}' named in hacs.json does not exist",
                expected
            )));
        }
        return Ok(());
    }

    if files_with_extension(&repository.tree, directory, extension)
        .next()
        .is_none()
    {
        return Err(ValidationException::new(format!(
            "The repository has no {} file",
            kind
        )));
    }
    Ok(())
}

pub struct PluginJavascript;

impl ValidationRule for PluginJavascript {
    fn name(&self) -> &'static str {
        "plugin_javascript"
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        require_content_file(repository, ".js", "JavaScript")
    }
}

pub struct ThemeYaml;

impl ValidationRule for ThemeYaml {
    fn name(&self) -> &'static str {
        "theme_yaml"
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        require_content_file(repository, ".yaml", "theme YAML")
    }
}

pub struct PythonScriptFile;

impl ValidationRule for PythonScriptFile {
    fn name(&self) -> &'static str {
        "python_script_file"
    }

    fn check(&self, repository: &Repository) -> Result<(), ValidationException> {
        require_content_file(repository, ".py", "Python script")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Category;
    use crate::validate::rules::test_support::repository_with_tree;
    use rstest::rstest;

    #[rstest]
    #[case(&["card.js"], Some(""), true)]
    #[case(&["dist/card.js"], Some("dist"), true)]
    #[case(&["dist/card.js"], Some(""), false)]
    #[case(&["README.md"], None, false)]
    fn plugin_needs_javascript_in_content_directory(
        #[case] paths: &[&str],
        #[case] remote: Option<&str>,
        #[case] passes: bool,
    ) {
        let mut repository = repository_with_tree(Category::Plugin, paths);
        repository.content.path.remote = remote.map(|s| s.to_string());

        assert_eq!(PluginJavascript.check(&repository).is_ok(), passes);
    }

    #[test]
    fn named_file_from_hacs_json_must_exist() {
        let mut repository = repository_with_tree(Category::Plugin, &["dist/other.js"]);
        repository.content.path.remote = Some("dist".to_string());
        repository.repository_manifest.filename = Some("card.js".to_string());

        assert_eq!(
            PluginJavascript.check(&repository).unwrap_err().message,
            "The file 'dist/card.js' named in hacs.json does not exist"
        );
    }

    #[test]
    fn theme_and_python_script_check_their_extensions() {
        let mut theme = repository_with_tree(Category::Theme, &["themes/dark.yaml"]);
        theme.content.path.remote = Some("themes".to_string());
        assert!(ThemeYaml.check(&theme).is_ok());

        let mut script = repository_with_tree(Category::PythonScript, &["python_scripts/a.txt"]);
        script.content.path.remote = Some("python_scripts".to_string());
        assert!(PythonScriptFile.check(&script).is_err());
    }
}
