//! file that contains the dependency-management options of the tool
use serde::*;

/// [`DependenciesAttribute`] - The libraries to install before bundling
///
/// * `auto_install` - Install the listed packages (and the default
/// packaging toolchain) before the build. Defaults to true
/// * `packages` - Package names to hand to the package manager. Merged,
/// case-insensitively deduplicated, with the ones given on the command line
///
/// ### Tests
///
/// ```rust
/// use pybundle::config_file::dependencies::DependenciesAttribute;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[dependencies]
///     auto_install = false
///     packages = [ 'pillow' ]
///"#;
///
/// let config: DependenciesAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the pybundle toml file");
///
/// assert_eq!(config.auto_install, Some(false));
/// assert_eq!(config.packages, Some(vec!["pillow"]));
/// ```
#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct DependenciesAttribute<'a> {
    pub auto_install: Option<bool>,
    #[serde(borrow)]
    pub packages: Option<Vec<&'a str>>,
}
