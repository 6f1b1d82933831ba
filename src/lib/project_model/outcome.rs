//! Result types reported back by the resolver and the bundler invocation

use std::path::PathBuf;

use indexmap::IndexSet;

/// Per-library result of one resolver pass. Failures are cumulative:
/// a failed install never aborts the processing of the remaining items.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub already_installed: IndexSet<String>,
    pub newly_installed: IndexSet<String>,
    pub failed: IndexSet<String>,
}

impl InstallOutcome {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Terminal state of one bundler invocation. Nothing here persists across
/// invocations; a failed build leaves no state behind for the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildResult {
    /// The bundler exited 0; `output_dir` is where the executable landed
    Bundled { output_dir: PathBuf },
    /// The bundler exited non-zero (or was killed by a signal);
    /// never retried by this layer
    BundlerFailed { exit_code: Option<i32> },
}

impl BuildResult {
    pub fn success(&self) -> bool {
        matches!(self, BuildResult::Bundled { .. })
    }
}
