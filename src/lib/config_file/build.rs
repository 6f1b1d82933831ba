//! file that contains the configuration options available
//! within pybundle to drive the bundler's invocation
use serde::*;

/// [`BuildAttribute`] - Stores the per-build options handed to the bundler
///
/// * `script` - The entry script to bundle (single-file mode)
/// * `project_dir` - The project directory to bundle (directory mode);
/// mutually exclusive with `script`
/// * `entry_module` - The entry module inside `project_dir`; required by
/// directory mode and must live inside the project directory
/// * `output_dir` - Where the bundler dumps the frozen executable
/// (`--distpath`). Defaults to the bundler's own `dist`
/// * `icon` - The icon file embedded into the executable. Silently skipped
/// with a warning when the file doesn't exist
/// * `onefile` - Emit a single self-contained executable. Defaults to true
/// * `windowed` - Suppress the console window. Defaults to false
/// * `clean` - Wipe the bundler's temporary build artifacts. Defaults to true
/// * `extra_args` - Raw arguments appended verbatim to the bundler's
/// command line
///
/// ### Tests
///
/// ```rust
/// use pybundle::config_file::build::BuildAttribute;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[build]
///     project_dir = 'src'
///     entry_module = 'src/main.py'
///     onefile = false
///     clean = false
///"#;
///
/// let config: BuildAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the pybundle toml file");
///
/// assert_eq!(config.project_dir, Some("src"));
/// assert_eq!(config.entry_module, Some("src/main.py"));
/// assert_eq!(config.onefile, Some(false));
/// assert_eq!(config.windowed, None);
/// assert_eq!(config.clean, Some(false));
/// ```
#[derive(Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct BuildAttribute<'a> {
    #[serde(borrow)]
    pub script: Option<&'a str>,
    #[serde(borrow)]
    pub project_dir: Option<&'a str>,
    #[serde(borrow)]
    pub entry_module: Option<&'a str>,
    #[serde(borrow)]
    pub output_dir: Option<&'a str>,
    #[serde(borrow)]
    pub icon: Option<&'a str>,
    pub onefile: Option<bool>,
    pub windowed: Option<bool>,
    pub clean: Option<bool>,
    #[serde(borrow)]
    pub extra_args: Option<Vec<&'a str>>,
}
