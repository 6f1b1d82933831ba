//! Platform tagging for the default library list and the
//! platform-conditional pieces of the bundler command line

/// One library the bundling toolchain expects to be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryRequirement {
    pub name: &'static str,
    /// Only meaningful on Windows; filtered out everywhere else
    pub windows_only: bool,
}

impl LibraryRequirement {
    const fn on_any_platform(name: &'static str) -> Self {
        Self {
            name,
            windows_only: false,
        }
    }

    const fn windows_only(name: &'static str) -> Self {
        Self {
            name,
            windows_only: true,
        }
    }
}

/// The bundler and its auxiliary libraries, installed up front so the
/// build itself never trips over a missing tool
pub const DEFAULT_LIBRARIES: [LibraryRequirement; 8] = [
    LibraryRequirement::on_any_platform("pyinstaller"),
    LibraryRequirement::on_any_platform("setuptools"),
    LibraryRequirement::on_any_platform("wheel"),
    LibraryRequirement::on_any_platform("pip"),
    LibraryRequirement::on_any_platform("pefile"),
    LibraryRequirement::on_any_platform("altgraph"),
    LibraryRequirement::on_any_platform("pyinstaller-hooks-contrib"),
    LibraryRequirement::windows_only("pywin32-ctypes"),
];

/// The coarse platform distinction this tool cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformTag {
    Windows,
    Unix,
}

impl PlatformTag {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            PlatformTag::Windows
        } else {
            PlatformTag::Unix
        }
    }

    /// The separator the bundler expects inside `--add-data` source/target
    /// pairs on this platform
    pub fn path_list_separator(&self) -> char {
        match self {
            PlatformTag::Windows => ';',
            PlatformTag::Unix => ':',
        }
    }
}

/// The default library names that apply on the given platform.
///
/// A pure function rather than a mutable module-level list, so the
/// filtering is testable on its own against any platform tag.
pub fn default_requirements(platform: PlatformTag) -> Vec<&'static str> {
    DEFAULT_LIBRARIES
        .iter()
        .filter(|lib| !lib.windows_only || platform == PlatformTag::Windows)
        .map(|lib| lib.name)
        .collect()
}
