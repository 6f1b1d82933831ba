//! The dependency resolver: decides which of the requested libraries are
//! already importable and installs the missing ones through the package
//! manager, reporting per-item success or failure.
//!
//! Presence is checked through interpreter introspection first, with the
//! package manager's metadata query as the fallback. Both run as short
//! bounded subprocesses; an inconclusive answer degrades to "not installed"
//! rather than failing the run, at worst triggering a redundant install.

use std::time::Duration;

use indexmap::IndexSet;

use crate::cli::output::executors::{self, TimedRun};
use crate::events::LogSink;
use crate::project_model::outcome::InstallOutcome;
use crate::project_model::platform::{default_requirements, PlatformTag, DEFAULT_LIBRARIES};
use crate::utils::constants::{PIP_MANAGED_PACKAGES, PRESENCE_CHECK_TIMEOUT_SECS};

/// Exits 0 when an importable module by the given name exists
const FIND_SPEC_SNIPPET: &str =
    "import importlib.util, sys; sys.exit(0 if importlib.util.find_spec(sys.argv[1]) is not None else 1)";

/// Collapses the requested names case-insensitively (package names are
/// case-insensitive to the package manager) and drops the ones tagged
/// Windows-only when the platform isn't Windows. First-seen order survives.
pub fn normalize_requested<I, S>(names: I, platform: PlatformTag) -> IndexSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .map(|name| name.as_ref().trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .filter(|name| platform == PlatformTag::Windows || !is_windows_only(name))
        .collect()
}

fn is_windows_only(name: &str) -> bool {
    DEFAULT_LIBRARIES
        .iter()
        .any(|lib| lib.windows_only && lib.name == name)
}

/// Whether a library by this name is already available in the current
/// environment.
///
/// The package manager itself and its own prerequisites go straight to the
/// `pip show` query, since introspection cannot see them reliably. Everything
/// else is asked from the interpreter (hyphens normalized to underscores),
/// falling back to `pip show` when the answer is negative or inconclusive.
pub fn is_package_installed(python: &str, package: &str) -> bool {
    if PIP_MANAGED_PACKAGES.contains(&package) {
        return pip_show_succeeds(python, package);
    }

    let import_name = package.replace('-', "_");
    let introspection = executors::run_with_timeout(
        python,
        &["-c", FIND_SPEC_SNIPPET, import_name.as_str()],
        Duration::from_secs(PRESENCE_CHECK_TIMEOUT_SECS),
    );

    match introspection {
        Ok(TimedRun::Exited(status)) if status.success() => true,
        // Negative, timed out or unspawnable: ask the package metadata instead
        _ => pip_show_succeeds(python, package),
    }
}

fn pip_show_succeeds(python: &str, package: &str) -> bool {
    let query = executors::run_with_timeout(
        python,
        &["-m", "pip", "show", package],
        Duration::from_secs(PRESENCE_CHECK_TIMEOUT_SECS),
    );
    matches!(query, Ok(TimedRun::Exited(status)) if status.success())
}

/// Installs every requested library that isn't present yet, relaying the
/// package manager's output to the sink as it is produced.
///
/// A per-item failure (non-zero exit or spawn error) is recorded and never
/// aborts the remaining items.
pub fn resolve(
    requested: &IndexSet<String>,
    python: &str,
    sink: &dyn LogSink,
) -> InstallOutcome {
    let mut outcome = InstallOutcome::default();

    for package in requested {
        if is_package_installed(python, package) {
            log::debug!("{package} is already installed");
            outcome.already_installed.insert(package.clone());
            continue;
        }

        sink.line(&format!("Installing: {package}"));
        let installed = executors::execute_streamed(
            python,
            &["-m", "pip", "install", package.as_str()],
            sink,
        );

        match installed {
            Ok(status) if status.success() => {
                sink.line(&format!("✓ {package} installed"));
                outcome.newly_installed.insert(package.clone());
            }
            Ok(_) => {
                sink.line(&format!("✗ {package} failed to install"));
                outcome.failed.insert(package.clone());
            }
            Err(report) => {
                sink.line(&format!("✗ {package} failed to install: {report}"));
                outcome.failed.insert(package.clone());
            }
        }
    }

    outcome
}

/// Makes sure the bundler and its auxiliary libraries are present,
/// installing whatever the platform-filtered default list is missing
pub fn ensure_default_libraries(
    platform: PlatformTag,
    python: &str,
    sink: &dyn LogSink,
) -> InstallOutcome {
    let requested = normalize_requested(default_requirements(platform), platform);
    let outcome = resolve(&requested, python, sink);

    if outcome.newly_installed.is_empty() && !outcome.has_failures() {
        sink.line("The packaging toolchain is already installed");
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_names_are_deduplicated_case_insensitively() {
        let requested = normalize_requested(
            ["Requests", "requests", "NUMPY", "numpy", " numpy "],
            PlatformTag::Unix,
        );
        assert_eq!(
            requested,
            IndexSet::from(["requests".to_owned(), "numpy".to_owned()])
        );
    }

    #[test]
    fn test_windows_only_names_are_dropped_off_windows() {
        let requested = normalize_requested(
            ["pyinstaller", "pywin32-ctypes", "pefile"],
            PlatformTag::Unix,
        );
        assert!(!requested.contains("pywin32-ctypes"));
        assert!(requested.contains("pyinstaller"));
        assert!(requested.contains("pefile"));

        let on_windows = normalize_requested(["pywin32-ctypes"], PlatformTag::Windows);
        assert!(on_windows.contains("pywin32-ctypes"));
    }

    #[test]
    fn test_blank_entries_are_ignored() {
        let requested = normalize_requested(["", "  ", "pandas"], PlatformTag::Unix);
        assert_eq!(requested, IndexSet::from(["pandas".to_owned()]));
    }
}
