//! Constant value definitions to use across the whole program

pub const CONFIG_FILE_NAME: &str = "pybundle.toml";

/// The external programs this tool drives. The interpreter default follows
/// the platform's conventional launcher name.
pub mod programs {
    pub const BUNDLER: &str = "pyinstaller";

    pub const PYTHON: &str = if cfg!(target_os = "windows") {
        "python"
    } else {
        "python3"
    };
}

/// The output directory PyInstaller dumps the frozen executable into
/// when `--distpath` is not given
pub const DEFAULT_DIST_DIR: &str = "dist";

/// Seconds granted to a presence-check subprocess before its answer
/// is treated as inconclusive
pub const PRESENCE_CHECK_TIMEOUT_SECS: u64 = 5;

/// Directory names that never contain bundleable project sources, skipped
/// during the directory-mode walk
pub const EXCLUDED_WALK_DIRS: [&str; 8] = [
    ".git",
    "__pycache__",
    "venv",
    "env",
    ".venv",
    "node_modules",
    "dist",
    "build",
];

/// The bytecode cache directory name, dropped from inferred module paths
pub const BYTECODE_CACHE_DIR: &str = "__pycache__";

pub const PYTHON_SOURCE_EXTENSION: &str = "py";

/// Names that must be queried through `pip show` directly, since the
/// interpreter cannot reliably introspect the tooling it runs under
pub const PIP_MANAGED_PACKAGES: [&str; 4] = ["pyinstaller", "setuptools", "wheel", "pip"];

pub mod error_messages {
    pub const READ_CFG_FILE: &str = "Could not read the configuration file";
    pub const PARSE_CFG_FILE: &str = "Could not parse the configuration file";
    pub const MISSING_ENTRY_PATH: &str = "The script or project directory does not exist";
    pub const ENTRY_IS_NOT_A_FILE: &str = "The selected entry path is not a regular file";
    pub const ENTRY_IS_NOT_A_DIR: &str = "The selected project path is not a directory";
    pub const MISSING_ENTRY_MODULE: &str =
        "Directory mode requires an entry module file inside the project directory";
    pub const ENTRY_MODULE_OUTSIDE_PROJECT: &str =
        "The entry module must live inside the selected project directory";
    pub const DEFAULT_LIBRARIES_INSTALL: &str =
        "Unable to install the required packaging toolchain";
    pub const FAILURE_SPAWNING_BUNDLER: &str = "Failed to spawn the bundler process";
}
