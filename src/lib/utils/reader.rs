//! Maps the parsed configuration file and the command line input into the
//! read-only [`BuildOptions`] model that drives one invocation. The command
//! line always wins over the configuration file, which wins over the
//! defaults.

use std::path::{Path, PathBuf};

use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use indexmap::IndexSet;

use crate::cli::input::CliArgs;
use crate::config_file::PyBundleConfigFile;
use crate::project_model::platform::PlatformTag;
use crate::project_model::{BuildOptions, PackMode};
use crate::resolver;
use crate::utils::constants::{error_messages, programs, CONFIG_FILE_NAME};

/// Checks for a `pybundle.toml` at the project root, returning its path
/// when present. Unlike the entry script, the configuration file is
/// entirely optional.
pub fn find_config_file(base_path: &Path) -> Option<PathBuf> {
    let candidate = base_path.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        log::debug!("Found a configuration file: {candidate:?}");
        Some(candidate)
    } else {
        None
    }
}

/// Builds the [`BuildOptions`] for this invocation out of the optional
/// configuration file and the parsed command line
pub fn build_options(
    config: &PyBundleConfigFile<'_>,
    cli_args: &CliArgs,
    platform: PlatformTag,
) -> Result<BuildOptions> {
    let cfg_build = config.build.as_ref();
    let cfg_deps = config.dependencies.as_ref();

    let (entry, directory_mode) = assemble_entry(cli_args, config)?;

    let mode = if directory_mode {
        let entry_module = cli_args
            .entry_module
            .clone()
            .or_else(|| cfg_build.and_then(|build| build.entry_module.map(PathBuf::from)))
            .ok_or_else(|| eyre!(error_messages::MISSING_ENTRY_MODULE))?;
        PackMode::Directory { entry_module }
    } else {
        PackMode::SingleFile
    };

    let output_dir = cli_args
        .output_dir
        .clone()
        .or_else(|| cfg_build.and_then(|build| build.output_dir.map(PathBuf::from)));

    let icon = cli_args
        .icon_path
        .clone()
        .or_else(|| cfg_build.and_then(|build| build.icon.map(PathBuf::from)));

    let name = cli_args
        .name
        .clone()
        .or_else(|| {
            config
                .project
                .as_ref()
                .and_then(|project| project.name.map(str::to_owned))
        })
        .or_else(|| default_program_name(&entry, directory_mode));

    let mut extra_args: Vec<String> = cfg_build
        .and_then(|build| build.extra_args.as_ref())
        .map(|args| args.iter().map(|arg| (*arg).to_owned()).collect())
        .unwrap_or_default();
    extra_args.extend(cli_args.add_arg.iter().cloned());

    let dependencies = collect_dependencies(cli_args, config, platform)?;

    // The command line can only turn automatic installs off
    let auto_install =
        !cli_args.no_auto_install && cfg_deps.and_then(|deps| deps.auto_install).unwrap_or(true);

    Ok(BuildOptions {
        entry,
        mode,
        output_dir,
        icon,
        name,
        onefile: cli_args
            .onefile()
            .or_else(|| cfg_build.and_then(|build| build.onefile))
            .unwrap_or(true),
        windowed: cli_args.windowed
            || cfg_build.and_then(|build| build.windowed).unwrap_or(false),
        clean: cli_args
            .clean()
            .or_else(|| cfg_build.and_then(|build| build.clean))
            .unwrap_or(true),
        extra_args,
        dependencies,
        auto_install,
        python: cli_args
            .python
            .clone()
            .unwrap_or_else(|| programs::PYTHON.to_owned()),
        bundler: cli_args
            .bundler
            .clone()
            .unwrap_or_else(|| programs::BUNDLER.to_owned()),
    })
}

/// The entry path and whether it denotes a whole project directory
fn assemble_entry(cli_args: &CliArgs, config: &PyBundleConfigFile<'_>) -> Result<(PathBuf, bool)> {
    if let Some(entry) = &cli_args.entry {
        return Ok((entry.clone(), cli_args.directory));
    }

    let cfg_build = config.build.as_ref();
    if let Some(script) = cfg_build.and_then(|build| build.script) {
        return Ok((PathBuf::from(script), false));
    }
    if let Some(project_dir) = cfg_build.and_then(|build| build.project_dir) {
        return Ok((PathBuf::from(project_dir), true));
    }

    Err(eyre!(
        "No entry given. Pass a script path (or a project directory with --directory), \
or declare one in {CONFIG_FILE_NAME}"
    ))
}

fn default_program_name(entry: &Path, directory_mode: bool) -> Option<String> {
    let component = if directory_mode {
        entry.file_name()
    } else {
        entry.file_stem()
    };
    component
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Gathers the requested dependency names from every source: the command
/// line list, the dependencies file and the configuration file, in that
/// order, collapsed case-insensitively and filtered for the platform
fn collect_dependencies(
    cli_args: &CliArgs,
    config: &PyBundleConfigFile<'_>,
    platform: PlatformTag,
) -> Result<IndexSet<String>> {
    let mut names: Vec<String> = cli_args.dependencies.clone();

    if let Some(deps_file) = &cli_args.deps_file {
        if deps_file.is_file() {
            let raw = std::fs::read_to_string(deps_file)
                .with_context(|| format!("Could not read the dependencies file {deps_file:?}"))?;
            names.extend(parse_dependency_lines(&raw));
        } else {
            log::warn!("The dependencies file does not exist: {deps_file:?}");
        }
    }

    if let Some(packages) = config
        .dependencies
        .as_ref()
        .and_then(|deps| deps.packages.as_ref())
    {
        names.extend(packages.iter().map(|package| (*package).to_owned()));
    }

    Ok(resolver::normalize_requested(names, platform))
}

/// One or more comma-separated names per line; blank lines and
/// `#`-prefixed comment lines are ignored
fn parse_dependency_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split(','))
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_file;
    use clap::Parser;
    use color_eyre::Result;
    use tempfile::tempdir;

    const CONFIG_FILE_MOCK: &str = r#"
        [project]
        name = 'from-config'

        [build]
        script = 'configured.py'
        output_dir = 'release'
        onefile = false
        windowed = true

        [dependencies]
        packages = [ 'pillow', 'Requests' ]
    "#;

    #[test]
    fn test_cli_flags_override_the_config_file() -> Result<()> {
        let config = config_file::pybundle_cfg_from_file(CONFIG_FILE_MOCK)?;
        let cli_args = CliArgs::parse_from(["", "cli.py", "-o", "out", "-n", "App", "--onefile"]);

        let options = build_options(&config, &cli_args, PlatformTag::Unix)?;

        assert_eq!(options.entry, PathBuf::from("cli.py"));
        assert_eq!(options.output_dir, Some(PathBuf::from("out")));
        assert_eq!(options.name.as_deref(), Some("App"));
        assert!(options.onefile);
        // Not set on the command line: the config file keeps its say
        assert!(options.windowed);

        Ok(())
    }

    #[test]
    fn test_config_file_fills_the_gaps() -> Result<()> {
        let config = config_file::pybundle_cfg_from_file(CONFIG_FILE_MOCK)?;
        let cli_args = CliArgs::parse_from([""]);

        let options = build_options(&config, &cli_args, PlatformTag::Unix)?;

        assert_eq!(options.entry, PathBuf::from("configured.py"));
        assert_eq!(options.mode, PackMode::SingleFile);
        assert_eq!(options.output_dir, Some(PathBuf::from("release")));
        assert_eq!(options.name.as_deref(), Some("from-config"));
        assert!(!options.onefile);
        assert!(options.clean);
        assert!(options.dependencies.contains("pillow"));
        assert!(options.dependencies.contains("requests"));

        Ok(())
    }

    #[test]
    fn test_defaults_when_nothing_else_says_otherwise() -> Result<()> {
        let config = PyBundleConfigFile::default();
        let cli_args = CliArgs::parse_from(["", "tool/script.py"]);

        let options = build_options(&config, &cli_args, PlatformTag::Unix)?;

        assert!(options.onefile);
        assert!(!options.windowed);
        assert!(options.clean);
        assert!(options.auto_install);
        assert_eq!(options.output_dir, None);
        assert_eq!(options.name.as_deref(), Some("script"));
        assert_eq!(options.bundler, "pyinstaller");

        Ok(())
    }

    #[test]
    fn test_missing_entry_is_an_error() {
        let config = PyBundleConfigFile::default();
        let cli_args = CliArgs::parse_from([""]);
        assert!(build_options(&config, &cli_args, PlatformTag::Unix).is_err());
    }

    #[test]
    fn test_directory_mode_requires_an_entry_module() {
        let config = PyBundleConfigFile::default();
        let cli_args = CliArgs::parse_from(["", "project", "--directory"]);
        assert!(build_options(&config, &cli_args, PlatformTag::Unix).is_err());

        let cli_args =
            CliArgs::parse_from(["", "project", "--directory", "--entry", "project/main.py"]);
        let options = build_options(&config, &cli_args, PlatformTag::Unix).unwrap();
        assert_eq!(
            options.mode,
            PackMode::Directory {
                entry_module: PathBuf::from("project/main.py")
            }
        );
        assert_eq!(options.name.as_deref(), Some("project"));
    }

    #[test]
    fn test_dependency_lines_parsing() {
        let parsed = parse_dependency_lines(
            "requests, numpy\n# a comment\n\npandas\n  flask ,  \n",
        );
        assert_eq!(parsed, vec!["requests", "numpy", "pandas", "flask"]);
    }

    #[test]
    fn test_deps_file_and_cli_lists_are_merged_deduplicated() -> Result<()> {
        let temp = tempdir()?;
        let deps_file = temp.path().join("requirements.txt");
        std::fs::write(&deps_file, "requests\nNumpy, requests\n")?;

        let config = PyBundleConfigFile::default();
        let mut cli_args = CliArgs::parse_from(["", "script.py", "-d", "numpy", "pandas"]);
        cli_args.deps_file = Some(deps_file);

        let options = build_options(&config, &cli_args, PlatformTag::Unix)?;

        assert_eq!(
            options.dependencies,
            IndexSet::from([
                "numpy".to_owned(),
                "pandas".to_owned(),
                "requests".to_owned()
            ])
        );

        Ok(())
    }

    #[test]
    fn test_extra_args_keep_config_then_cli_order() -> Result<()> {
        let config = config_file::pybundle_cfg_from_file(
            r#"
            [build]
            script = 'app.py'
            extra_args = [ '--log-level=WARN' ]
        "#,
        )?;
        let cli_args = CliArgs::parse_from(["", "--add-arg", "--noupx"]);

        let options = build_options(&config, &cli_args, PlatformTag::Unix)?;
        assert_eq!(options.extra_args, vec!["--log-level=WARN", "--noupx"]);

        Ok(())
    }
}
