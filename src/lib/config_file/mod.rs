//! root file for the crate where the datastructures that holds the TOML
//! parsed data lives.
pub mod build;
pub mod dependencies;
pub mod project;

use serde::{Deserialize, Serialize};

use self::{
    build::BuildAttribute, dependencies::DependenciesAttribute, project::ProjectAttribute,
};

/// ```rust
/// use pybundle::config_file::PyBundleConfigFile;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     [project]
///     name = 'calculator'
///
///     [build]
///     script = 'calc.py'
///     output_dir = 'release'
///     windowed = true
///     extra_args = [ '--log-level=WARN' ]
///
///     [dependencies]
///     auto_install = true
///     packages = [ 'requests', 'numpy' ]
/// "#;
///
/// let config: PyBundleConfigFile = pybundle::config_file::pybundle_cfg_from_file(CONFIG_FILE_MOCK)
///     .expect("A failure happened parsing the pybundle toml file");
///
/// let project = config.project.expect("Missing the [project] table");
/// assert_eq!(project.name, Some("calculator"));
///
/// let build = config.build.expect("Missing the [build] table");
/// assert_eq!(build.script, Some("calc.py"));
/// assert_eq!(build.output_dir, Some("release"));
/// assert_eq!(build.windowed, Some(true));
/// assert_eq!(build.onefile, None);
///
/// let dependencies = config.dependencies.expect("Missing the [dependencies] table");
/// assert_eq!(dependencies.packages, Some(vec!["requests", "numpy"]));
/// ```
/// The [`PyBundleConfigFile`] is the type that holds
/// the whole hierarchy of the pybundle config file attributes
/// and properties
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct PyBundleConfigFile<'a> {
    #[serde(borrow)]
    pub project: Option<ProjectAttribute<'a>>,
    #[serde(borrow)]
    pub build: Option<BuildAttribute<'a>>,
    #[serde(borrow)]
    pub dependencies: Option<DependenciesAttribute<'a>>,
}

/// Deserializes the raw text of a `pybundle.toml` into a [`PyBundleConfigFile`]
pub fn pybundle_cfg_from_file(raw_file: &str) -> Result<PyBundleConfigFile<'_>, toml::de::Error> {
    toml::from_str::<PyBundleConfigFile>(raw_file)
}
