//! The build command assembler: validates the collected options, maps them
//! onto the bundler's argument vector and runs the bundler as a child
//! process with its output streamed back to the caller.
//!
//! One linear pipeline, no state between steps: validate, assemble,
//! spawn, stream, report.

use std::path::Path;

use color_eyre::{
    eyre::{eyre, Context},
    Result,
};
use indexmap::IndexSet;
use walkdir::{DirEntry, WalkDir};

use crate::cli::output::arguments::Arguments;
use crate::cli::output::executors;
use crate::events::LogSink;
use crate::project_model::outcome::BuildResult;
use crate::project_model::platform::PlatformTag;
use crate::project_model::{BuildOptions, PackMode};
use crate::utils::constants::{
    error_messages, BYTECODE_CACHE_DIR, EXCLUDED_WALK_DIRS, PYTHON_SOURCE_EXTENSION,
};
use crate::utils::fs;

/// Rejects unusable input before anything is spawned.
///
/// The entry path must exist, and directory mode additionally requires an
/// entry module that lives inside the selected project directory.
pub fn validate(options: &BuildOptions) -> Result<()> {
    if !options.entry.exists() {
        return Err(eyre!(
            "{}: {:?}",
            error_messages::MISSING_ENTRY_PATH,
            options.entry
        ));
    }

    match &options.mode {
        PackMode::SingleFile => {
            if !options.entry.is_file() {
                return Err(eyre!(
                    "{}: {:?}",
                    error_messages::ENTRY_IS_NOT_A_FILE,
                    options.entry
                ));
            }
        }
        PackMode::Directory { entry_module } => {
            if !options.entry.is_dir() {
                return Err(eyre!(
                    "{}: {:?}",
                    error_messages::ENTRY_IS_NOT_A_DIR,
                    options.entry
                ));
            }
            if !entry_module.is_file() {
                return Err(eyre!(
                    "{}: {:?}",
                    error_messages::MISSING_ENTRY_MODULE,
                    entry_module
                ));
            }
            if !fs::is_contained_in(entry_module, &options.entry) {
                return Err(eyre!(
                    "{}: {:?}",
                    error_messages::ENTRY_MODULE_OUTSIDE_PROJECT,
                    entry_module
                ));
            }
        }
    }

    Ok(())
}

/// Maps the build options onto the bundler's argument vector.
///
/// Directory mode additionally adds the project directory as a module search
/// path and a bundled data directory, plus one `--hidden-import` per source
/// module found by the walk. The entry script goes last, as the single
/// positional argument the bundler expects.
pub fn assemble(options: &BuildOptions, platform: PlatformTag, sink: &dyn LogSink) -> Arguments {
    let mut args = Arguments::with_capacity(16);

    if let Some(output_dir) = &options.output_dir {
        args.push_flag_with_value("--distpath", output_dir);
    }

    if let Some(icon) = &options.icon {
        if icon.exists() {
            args.push_flag_with_value("--icon", icon);
        } else {
            // Non-fatal: the flag is dropped and the build carries on
            log::warn!("The icon file does not exist: {icon:?}");
            sink.line(&format!(
                "Warning: the icon file does not exist: {}",
                icon.display()
            ));
        }
    }

    if let Some(name) = &options.name {
        args.push_flag_with_value("--name", name.as_str());
    }

    if options.onefile {
        args.create_and_push("--onefile");
    }
    if options.windowed {
        args.create_and_push("--windowed");
    }
    if options.clean {
        args.create_and_push("--clean");
    }

    args.extend(options.extra_args.iter().map(|raw| raw.as_str().into()));

    if matches!(options.mode, PackMode::Directory { .. }) {
        args.push_flag_with_value("--paths", &options.entry);
        args.push_flag_with_value(
            "--add-data",
            format!(
                "{}{}.",
                options.entry.display(),
                platform.path_list_separator()
            ),
        );
        for module in infer_hidden_imports(&options.entry) {
            args.push_flag_with_value("--hidden-import", module);
        }
    }

    args.create_and_push(options.entry_script());

    args
}

/// Walks the project directory and converts every source file into the
/// dot-separated module name the bundler needs for an explicit import.
///
/// Conventional non-source directories are skipped, bytecode-cache segments
/// are dropped from the names, and duplicates collapse while preserving the
/// walk order. A heuristic: non-standard layouts (namespace packages,
/// src-layout) can yield module names the interpreter won't resolve.
pub fn infer_hidden_imports(project_dir: &Path) -> IndexSet<String> {
    let mut modules = IndexSet::new();

    let walker = WalkDir::new(project_dir)
        .into_iter()
        .filter_entry(|entry| !is_excluded_dir(entry));

    for entry in walker.filter_map(|entry| entry.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension() != Some(std::ffi::OsStr::new(PYTHON_SOURCE_EXTENSION)) {
            continue;
        }

        let relative = match path.strip_prefix(project_dir) {
            Ok(relative) => relative,
            Err(_) => continue,
        };

        let module_name = relative
            .with_extension("")
            .components()
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .filter(|segment| !segment.is_empty() && segment != BYTECODE_CACHE_DIR)
            .collect::<Vec<_>>()
            .join(".");

        if !module_name.is_empty() {
            modules.insert(module_name);
        }
    }

    modules
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| EXCLUDED_WALK_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Spawns the bundler with the assembled argument vector, streaming its
/// combined output into the sink, and reports the terminal outcome.
/// A non-zero exit is a build failure; it is not retried.
pub fn invoke(
    options: &BuildOptions,
    args: &Arguments,
    sink: &dyn LogSink,
) -> Result<BuildResult> {
    sink.line(&format!("Running: {} {}", options.bundler, args));

    let status = executors::execute_streamed(&options.bundler, args.as_slice(), sink)
        .with_context(|| error_messages::FAILURE_SPAWNING_BUNDLER)?;

    if status.success() {
        let output_dir = options.effective_output_dir();
        let output_dir = fs::absolute_path(&output_dir).unwrap_or(output_dir);
        sink.line(&format!("Bundle complete. Output: {}", output_dir.display()));
        Ok(BuildResult::Bundled { output_dir })
    } else {
        sink.line("Bundle failed");
        Ok(BuildResult::BundlerFailed {
            exit_code: status.code(),
        })
    }
}

/// The whole assembler pipeline for one invocation
pub fn bundle(
    options: &BuildOptions,
    platform: PlatformTag,
    sink: &dyn LogSink,
) -> Result<BuildResult> {
    validate(options)?;
    let args = assemble(options, platform, sink);
    invoke(options, &args, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::LogSink;
    use color_eyre::Result;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[derive(Default)]
    struct CollectingSink {
        lines: Mutex<Vec<String>>,
    }

    impl CollectingSink {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl LogSink for CollectingSink {
        fn line(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_owned());
        }
    }

    fn options_for(entry: PathBuf) -> BuildOptions {
        BuildOptions {
            entry,
            mode: PackMode::SingleFile,
            output_dir: None,
            icon: None,
            name: None,
            onefile: false,
            windowed: false,
            clean: false,
            extra_args: vec![],
            dependencies: Default::default(),
            auto_install: true,
            python: "python3".into(),
            bundler: "pyinstaller".into(),
        }
    }

    fn raw_args(args: &Arguments) -> Vec<&str> {
        args.iter().map(|arg| arg.value.as_str()).collect()
    }

    #[test]
    fn test_flag_order_and_windowed_omission() {
        let sink = CollectingSink::default();
        let mut options = options_for(PathBuf::from("script.py"));
        options.output_dir = Some(PathBuf::from("out"));
        options.name = Some("App".into());
        options.onefile = true;
        options.clean = true;

        let args = assemble(&options, PlatformTag::Unix, &sink);

        assert_eq!(
            raw_args(&args),
            vec![
                "--distpath",
                "out",
                "--name",
                "App",
                "--onefile",
                "--clean",
                "script.py"
            ]
        );
        assert!(!args.contains("--windowed"));
    }

    #[test]
    fn test_extra_args_are_appended_verbatim_in_order() {
        let sink = CollectingSink::default();
        let mut options = options_for(PathBuf::from("script.py"));
        options.extra_args = vec!["--log-level=WARN".into(), "--noupx".into()];

        let args = assemble(&options, PlatformTag::Unix, &sink);

        assert_eq!(
            raw_args(&args),
            vec!["--log-level=WARN", "--noupx", "script.py"]
        );
    }

    #[test]
    fn test_missing_icon_is_omitted_with_a_warning() {
        let sink = CollectingSink::default();
        let mut options = options_for(PathBuf::from("script.py"));
        options.icon = Some(PathBuf::from("definitely/not/there.ico"));

        let args = assemble(&options, PlatformTag::Unix, &sink);

        assert!(!args.contains("--icon"));
        assert!(sink
            .lines()
            .iter()
            .any(|line| line.starts_with("Warning: the icon file does not exist")));
    }

    #[test]
    fn test_existing_icon_is_kept() -> Result<()> {
        let temp = tempdir()?;
        let icon = temp.path().join("app.ico");
        std::fs::write(&icon, b"ico")?;

        let sink = CollectingSink::default();
        let mut options = options_for(PathBuf::from("script.py"));
        options.icon = Some(icon.clone());

        let args = assemble(&options, PlatformTag::Unix, &sink);

        assert!(args.contains("--icon"));
        assert!(args.contains(&icon.display().to_string()));
        assert!(sink.lines().is_empty());

        Ok(())
    }

    #[test]
    fn test_module_inference_skips_the_bytecode_cache() -> Result<()> {
        let temp = tempdir()?;
        let pkg = temp.path().join("pkg");
        std::fs::create_dir_all(pkg.join("__pycache__"))?;
        std::fs::write(pkg.join("a.py"), "x = 1")?;
        std::fs::write(pkg.join("__pycache__").join("a.pyc"), b"\x00")?;

        let modules = infer_hidden_imports(temp.path());

        assert_eq!(modules, IndexSet::from(["pkg.a".to_owned()]));
        Ok(())
    }

    #[test]
    fn test_module_inference_skips_conventional_non_source_dirs() -> Result<()> {
        let temp = tempdir()?;
        for dir in ["venv", ".git", "dist", "build", "node_modules"] {
            let excluded = temp.path().join(dir);
            std::fs::create_dir_all(&excluded)?;
            std::fs::write(excluded.join("mod.py"), "x = 1")?;
        }
        std::fs::write(temp.path().join("main.py"), "print('hi')")?;

        let modules = infer_hidden_imports(temp.path());

        assert_eq!(modules, IndexSet::from(["main".to_owned()]));
        Ok(())
    }

    #[test]
    fn test_directory_mode_adds_paths_data_and_hidden_imports() -> Result<()> {
        let temp = tempdir()?;
        let project = temp.path().join("project");
        std::fs::create_dir_all(project.join("pkg"))?;
        std::fs::write(project.join("main.py"), "print('hi')")?;
        std::fs::write(project.join("pkg").join("util.py"), "x = 1")?;

        let sink = CollectingSink::default();
        let mut options = options_for(project.clone());
        options.mode = PackMode::Directory {
            entry_module: project.join("main.py"),
        };

        let args = assemble(&options, PlatformTag::Unix, &sink);
        let add_data = format!("{}:.", project.display());
        let entry_module = project.join("main.py").display().to_string();
        let raw = raw_args(&args);

        assert!(args.contains("--paths"));
        assert!(raw.contains(&add_data.as_str()));
        assert!(args.contains("--hidden-import"));
        assert!(args.contains("main"));
        assert!(args.contains("pkg.util"));
        // The entry module stays the final positional argument
        assert_eq!(raw.last().copied(), Some(entry_module.as_str()));

        Ok(())
    }

    #[test]
    fn test_validation_rejects_a_missing_entry() {
        let options = options_for(PathBuf::from("nope/missing.py"));
        assert!(validate(&options).is_err());
    }

    #[test]
    fn test_validation_rejects_an_entry_module_outside_the_project() -> Result<()> {
        let temp = tempdir()?;
        let project = temp.path().join("project");
        std::fs::create_dir(&project)?;
        let stray = temp.path().join("stray.py");
        std::fs::write(&stray, "print('no')")?;

        let mut options = options_for(project);
        options.mode = PackMode::Directory {
            entry_module: stray,
        };

        assert!(validate(&options).is_err());
        Ok(())
    }

    #[test]
    fn test_validation_accepts_a_contained_entry_module() -> Result<()> {
        let temp = tempdir()?;
        let project = temp.path().join("project");
        std::fs::create_dir(&project)?;
        let entry = project.join("main.py");
        std::fs::write(&entry, "print('hi')")?;

        let mut options = options_for(project);
        options.mode = PackMode::Directory {
            entry_module: entry,
        };

        assert!(validate(&options).is_ok());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_invocation_reports_the_exit_status_without_stale_state() -> Result<()> {
        let temp = tempdir()?;
        let script = temp.path().join("script.py");
        std::fs::write(&script, "print('hi')")?;

        let sink = CollectingSink::default();
        let mut options = options_for(script);
        options.bundler = "false".into();

        let failed = bundle(&options, PlatformTag::Unix, &sink)?;
        assert!(!failed.success());

        // A corrected follow-up invocation succeeds: nothing persists
        options.bundler = "true".into();
        let succeeded = bundle(&options, PlatformTag::Unix, &sink)?;
        assert!(succeeded.success());

        Ok(())
    }
}
