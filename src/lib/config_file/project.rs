//! Metadata about the user's project
use serde::*;

/// [`ProjectAttribute`] - Metadata about the program being bundled
/// * `name` - The name handed to the bundler's `--name` flag. When absent,
/// the entry file stem (or the project directory name) is used instead
///
/// ### Tests
///
/// ```rust
/// use pybundle::config_file::project::ProjectAttribute;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[project]
///     name = 'calculator'
///"#;
///
/// let config: ProjectAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the pybundle toml file");
///
/// assert_eq!(config.name, Some("calculator"));
/// ```
#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectAttribute<'a> {
    #[serde(borrow)]
    pub name: Option<&'a str>,
}
