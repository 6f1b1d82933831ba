//! Types and procedures that represents a command line argument,
//! or collections of command line arguments

use std::ops::Deref;
use std::path::Path;
use std::{borrow::Borrow, ffi::OsStr, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Type for represent a command line argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub value: String,
}

impl From<&str> for Argument {
    fn from(value: &str) -> Self {
        Self {
            value: value.to_owned(),
        }
    }
}

impl From<String> for Argument {
    fn from(value: String) -> Self {
        Self { value }
    }
}

impl From<&Path> for Argument {
    fn from(value: &Path) -> Self {
        Self::from(format!("{}", value.display()))
    }
}

impl From<PathBuf> for Argument {
    fn from(value: PathBuf) -> Self {
        Self::from(format!("{}", value.display()))
    }
}

impl From<&PathBuf> for Argument {
    fn from(value: &PathBuf) -> Self {
        Self::from(format!("{}", value.display()))
    }
}

impl Deref for Argument {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl Borrow<str> for Argument {
    fn borrow(&self) -> &str {
        &self.value
    }
}

impl AsRef<OsStr> for Argument {
    fn as_ref(&self) -> &OsStr {
        OsStr::new(&self.value)
    }
}

impl core::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Strong type for represent a linear collection of [`Argument`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Arguments(Vec<Argument>);

impl Arguments {
    /// Returns a new collection of [`Argument`] with the specified capacity
    pub fn with_capacity(cap: usize) -> Self {
        Self(Vec::with_capacity(cap))
    }

    /// Creates and stores a new [`Argument`] to the end of this collection
    pub fn create_and_push<T>(&mut self, val: T)
    where
        T: Into<Argument>,
    {
        self.0.push(val.into())
    }

    /// Appends a flag and its value as two consecutive arguments,
    /// the way PyInstaller expects its valued options
    pub fn push_flag_with_value<T>(&mut self, flag: &str, val: T)
    where
        T: Into<Argument>,
    {
        self.create_and_push(flag);
        self.0.push(val.into());
    }

    /// Extends the underlying collection from an Iterator of [`Argument`]
    pub fn extend(&mut self, iter: impl IntoIterator<Item = Argument>) {
        self.0.extend(iter);
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.iter().any(|arg| arg.value == value)
    }

    pub fn as_slice(&self) -> &[Argument] {
        &self.0
    }
}

impl Deref for Arguments {
    type Target = [Argument];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Arguments {
    type Item = Argument;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl core::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut args = self.0.iter();
        if let Some(first) = args.next() {
            write!(f, "{first}")?;
            for arg in args {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
