use std::fmt;

/// Category of a tracked repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Custom integration (custom_components/<domain>)
    Integration,
    /// Frontend plugin (www/community/<name>)
    Plugin,
    /// Frontend theme (themes/)
    Theme,
    /// Python script (python_scripts/)
    PythonScript,
    /// AppDaemon app (appdaemon/apps/<name>)
    AppDaemon,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Integration,
        Category::Plugin,
        Category::Theme,
        Category::PythonScript,
        Category::AppDaemon,
    ];

    /// Returns the string representation of the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Integration => "integration",
            Category::Plugin => "plugin",
            Category::Theme => "theme",
            Category::PythonScript => "python_script",
            Category::AppDaemon => "appdaemon",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integration" => Ok(Category::Integration),
            "plugin" => Ok(Category::Plugin),
            "theme" => Ok(Category::Theme),
            "python_script" => Ok(Category::PythonScript),
            "appdaemon" => Ok(Category::AppDaemon),
            _ => Err(()),
        }
    }
}
