//! The read-only data model that drives one bundling invocation. Built fresh
//! per run by merging the configuration file with the command line input,
//! never mutated after the assembler consumes it.

pub mod outcome;
pub mod platform;

use std::path::{Path, PathBuf};

use indexmap::IndexSet;

use crate::utils::constants::DEFAULT_DIST_DIR;

/// How the entry path is to be interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackMode {
    /// The entry path is the script itself
    SingleFile,
    /// The entry path is a project directory; `entry_module` is the script
    /// inside it whose execution starts the program
    Directory { entry_module: PathBuf },
}

/// The collected user input for one build invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Script file (single-file mode) or project directory (directory mode)
    pub entry: PathBuf,
    pub mode: PackMode,
    pub output_dir: Option<PathBuf>,
    pub icon: Option<PathBuf>,
    pub name: Option<String>,
    pub onefile: bool,
    pub windowed: bool,
    pub clean: bool,
    /// Raw arguments appended verbatim, in order, to the bundler command line
    pub extra_args: Vec<String>,
    /// Case-insensitively deduplicated package names to install beforehand
    pub dependencies: IndexSet<String>,
    pub auto_install: bool,
    /// The interpreter launcher that fronts the package manager
    pub python: String,
    /// The bundler executable itself
    pub bundler: String,
}

impl BuildOptions {
    /// The entry path handed to the bundler as its final positional
    /// argument: the script itself, or the entry module in directory mode
    pub fn entry_script(&self) -> &Path {
        match &self.mode {
            PackMode::SingleFile => &self.entry,
            PackMode::Directory { entry_module } => entry_module,
        }
    }

    /// Where the frozen executable ends up, for reporting purposes.
    /// Falls back to the bundler's own default when unset.
    pub fn effective_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR))
    }
}
