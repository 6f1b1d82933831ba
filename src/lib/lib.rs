pub mod bundler;
pub mod cli;
pub mod config_file;
pub mod events;
pub mod project_model;
pub mod resolver;
pub mod utils;

/// The entry point for the execution of the program.
///
/// This module existence is motivated to let us run
/// integration tests for the whole operations of the program
/// without having to do fancy work about checking the
/// data sent to stdout/stderr
pub mod worker {
    use std::fs;
    use std::path::Path;

    use color_eyre::{
        eyre::{eyre, Context},
        Result,
    };

    use crate::bundler;
    use crate::cli::input::CliArgs;
    use crate::config_file::{self, PyBundleConfigFile};
    use crate::events::LogSink;
    use crate::project_model::outcome::BuildResult;
    use crate::project_model::platform::PlatformTag;
    use crate::resolver;
    use crate::utils::constants::error_messages;
    use crate::utils::reader;

    /// The main work of the program: merge the configuration file with the
    /// command line input, make sure the packaging toolchain and the
    /// requested libraries are present, then assemble and run the bundler.
    pub fn run_pybundle(
        cli_args: &CliArgs,
        base_path: &Path,
        sink: &dyn LogSink,
    ) -> Result<BuildResult> {
        let raw_file = match reader::find_config_file(base_path) {
            Some(cfg_path) => fs::read_to_string(&cfg_path)
                .with_context(|| format!("{}: {:?}", error_messages::READ_CFG_FILE, cfg_path))?,
            None => String::new(),
        };

        let config: PyBundleConfigFile = if raw_file.is_empty() {
            PyBundleConfigFile::default()
        } else {
            config_file::pybundle_cfg_from_file(raw_file.as_str())
                .with_context(|| error_messages::PARSE_CFG_FILE)?
        };

        let platform = PlatformTag::current();
        let options = reader::build_options(&config, cli_args, platform)?;

        if options.auto_install {
            install_prerequisites(&options, platform, sink)?;
        }

        bundler::bundle(&options, platform, sink)
    }

    /// Default toolchain first, then the user-requested libraries. A failure
    /// on the former aborts the run; failures on the latter only warn, and
    /// the build proceeds.
    fn install_prerequisites(
        options: &crate::project_model::BuildOptions,
        platform: PlatformTag,
        sink: &dyn LogSink,
    ) -> Result<()> {
        let defaults = resolver::ensure_default_libraries(platform, &options.python, sink);
        if defaults.has_failures() {
            return Err(eyre!(
                "{}: {}",
                error_messages::DEFAULT_LIBRARIES_INSTALL,
                join_names(&defaults.failed)
            ));
        }

        if !options.dependencies.is_empty() {
            let outcome = resolver::resolve(&options.dependencies, &options.python, sink);
            if outcome.has_failures() {
                sink.line(&format!(
                    "Warning: failed to install: {}",
                    join_names(&outcome.failed)
                ));
                sink.line("Continuing with the build anyway...");
            }
        }

        Ok(())
    }

    fn join_names(names: &indexmap::IndexSet<String>) -> String {
        names.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
