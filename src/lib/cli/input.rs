use std::path::PathBuf;

use clap::Parser;

/// [`CliArgs`] is the command line arguments parser
///
/// #Test
/// ```rust
/// use clap::Parser;
/// use pybundle::cli::input::CliArgs;
///
/// let parser = CliArgs::parse_from(["", "-v", "script.py"]);
/// assert_eq!(1, parser.verbose);
///
/// let parser = CliArgs::parse_from(["", "script.py", "-o", "out", "-n", "App", "--no-onefile"]);
/// assert_eq!(parser.entry.as_deref(), Some(std::path::Path::new("script.py")));
/// assert_eq!(parser.output_dir.as_deref(), Some(std::path::Path::new("out")));
/// assert_eq!(parser.name.as_deref(), Some("App"));
/// assert_eq!(parser.onefile(), Some(false));
/// assert_eq!(parser.clean(), None);
///
/// let parser = CliArgs::parse_from(["", "proj", "--directory", "--entry", "proj/main.py",
///     "-d", "requests", "numpy", "--add-arg", "--noupx"]);
/// assert!(parser.directory);
/// assert_eq!(parser.dependencies, vec!["requests", "numpy"]);
/// assert_eq!(parser.add_arg, vec!["--noupx"]);
/// ```
#[derive(Parser, Debug)]
#[command(name = "pybundle")]
#[command(author = "alanbulan")]
#[command(version)]
#[command(
    about = "pybundle packages Python scripts and projects into standalone executables",
    long_about = "A convenience front-end over PyInstaller: installs the packaging \
toolchain and any requested libraries, assembles the bundler command line from the \
given options and streams the build output back"
)]
pub struct CliArgs {
    /// The Python script to bundle, or the project directory with --directory
    pub entry: Option<PathBuf>,

    /// Treat the entry as a whole project directory
    #[arg(long)]
    pub directory: bool,

    /// The entry module inside the project directory (directory mode only)
    #[arg(long = "entry", value_name = "FILE")]
    pub entry_module: Option<PathBuf>,

    /// Output directory for the frozen executable (default: dist)
    #[arg(short = 'o', long = "output")]
    pub output_dir: Option<PathBuf>,

    /// Icon file embedded into the executable (.ico)
    #[arg(short = 'i', long = "icon")]
    pub icon_path: Option<PathBuf>,

    /// Program name (default: the entry file stem)
    #[arg(short = 'n', long = "name")]
    pub name: Option<String>,

    /// Bundle into a single self-contained executable (default)
    #[arg(long, conflicts_with = "no_onefile")]
    pub onefile: bool,

    /// Keep the bundle as a directory instead of a single executable
    #[arg(long)]
    pub no_onefile: bool,

    /// Window mode: suppress the console window
    #[arg(short = 'w', long)]
    pub windowed: bool,

    /// Wipe the bundler's temporary build files (default)
    #[arg(long, conflicts_with = "no_clean")]
    pub clean: bool,

    /// Keep the bundler's temporary build files around
    #[arg(long)]
    pub no_clean: bool,

    /// Extra raw argument passed through to the bundler verbatim (repeatable)
    #[arg(long = "add-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub add_arg: Vec<String>,

    /// Libraries to install before bundling (space separated)
    #[arg(short = 'd', long = "dependencies", num_args = 1..)]
    pub dependencies: Vec<String>,

    /// Read the library list from a file: one or more comma-separated names
    /// per line, '#' lines ignored
    #[arg(long = "deps-file", value_name = "FILE")]
    pub deps_file: Option<PathBuf>,

    /// Skip every automatic install, including the packaging toolchain check
    #[arg(long = "no-auto-install")]
    pub no_auto_install: bool,

    /// The interpreter launcher fronting the package manager
    #[arg(long, value_name = "PROGRAM")]
    pub python: Option<String>,

    /// The bundler executable to invoke
    #[arg(long, value_name = "PROGRAM")]
    pub bundler: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "pybundle maximum allowed verbosity level is: '-v'")]
    pub verbose: u8,
}

impl CliArgs {
    /// The tri-state reading of the onefile flag pair: `Some` only when the
    /// user said something explicitly, so the configuration file keeps its say
    pub fn onefile(&self) -> Option<bool> {
        explicit_flag_pair(self.onefile, self.no_onefile)
    }

    /// Tri-state reading of the clean flag pair
    pub fn clean(&self) -> Option<bool> {
        explicit_flag_pair(self.clean, self.no_clean)
    }
}

fn explicit_flag_pair(enable: bool, disable: bool) -> Option<bool> {
    if enable {
        Some(true)
    } else if disable {
        Some(false)
    } else {
        None
    }
}
