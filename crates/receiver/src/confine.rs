//! Mapping untrusted names onto the incoming directory.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Component, MAIN_SEPARATOR_STR, Path, PathBuf};

use qfile_protocol::MAX_PATH_LENGTH;
use serde::{Deserialize, Serialize};

use crate::UnpackError;

/// How strictly names are kept inside the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confinement {
    /// Folds `..` in names and rejects those that climb above the root or
    /// carry a prefix component. Also rejects symlink targets that resolve
    /// outside the root, and entries whose parent directory physically lies
    /// outside the root.
    #[default]
    Strict,
    /// Plain `root + separator + name`. Only absolute symlink targets are
    /// denied; anything else is left to the filesystem.
    Legacy,
}

/// Whether a symlink should be created as a file or a directory link.
///
/// Only Windows distinguishes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    File,
    Directory,
}

impl LinkKind {
    /// Best-effort classification of a resolved link target. Anything that
    /// is not an existing non-directory is treated as a directory.
    pub fn classify(resolved: &Path) -> Self {
        match fs::metadata(resolved) {
            Ok(meta) if !meta.is_dir() => Self::File,
            _ => Self::Directory,
        }
    }
}

/// Resolves untrusted relative names under a fixed root.
#[derive(Debug, Clone)]
pub struct Confiner {
    root: PathBuf,
    mode: Confinement,
}

impl Confiner {
    /// Creates a confiner for an existing `root`, which is canonicalized.
    pub fn new(root: impl AsRef<Path>, mode: Confinement) -> io::Result<Self> {
        let root = fs::canonicalize(root.as_ref())?;
        Ok(Self { root, mode })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> Confinement {
        self.mode
    }

    /// Validates a declared entry name length before anything is read.
    pub fn check_name_len(len: u64) -> Result<usize, UnpackError> {
        bounded(len).ok_or(UnpackError::NameTooLong {
            len,
            max: MAX_PATH_LENGTH - 1,
        })
    }

    /// Validates a declared symlink target length before anything is read.
    pub fn check_target_len(len: u64) -> Result<usize, UnpackError> {
        bounded(len).ok_or(UnpackError::LinkTargetTooLong {
            len,
            max: MAX_PATH_LENGTH - 1,
        })
    }

    /// Maps an untrusted relative name to a local path under the root.
    pub fn resolve(&self, name: &Path) -> Result<PathBuf, UnpackError> {
        match self.mode {
            Confinement::Legacy => {
                let mut joined = OsString::from(self.root.as_os_str());
                joined.push(MAIN_SEPARATOR_STR);
                joined.push(name.as_os_str());
                Ok(PathBuf::from(joined))
            }
            Confinement::Strict => {
                let mut path = self.root.clone();
                let mut depth = 0usize;
                for component in name.components() {
                    match component {
                        Component::Normal(part) => {
                            path.push(part);
                            depth += 1;
                        }
                        Component::CurDir | Component::RootDir => {}
                        Component::ParentDir if depth > 0 => {
                            path.pop();
                            depth -= 1;
                        }
                        Component::ParentDir | Component::Prefix(_) => {
                            return Err(UnpackError::EscapesRoot(name.display().to_string()));
                        }
                    }
                }
                Ok(path)
            }
        }
    }

    /// Checks that the directory `path` will be created in really lies
    /// under the root, following any symlinks already on disk.
    ///
    /// A missing parent is accepted; creating the entry fails on its own.
    pub fn check_parent(&self, path: &Path) -> Result<(), UnpackError> {
        if self.mode == Confinement::Legacy || path == self.root {
            return Ok(());
        }
        let Some(parent) = path.parent() else {
            return Ok(());
        };
        match fs::canonicalize(parent) {
            Ok(real) if real.starts_with(&self.root) => Ok(()),
            Ok(real) => Err(UnpackError::EscapesRoot(real.display().to_string())),
            Err(_) => Ok(()),
        }
    }

    /// Validates an untrusted symlink target for the link at `link`.
    ///
    /// Returns the target resolved against the link's directory. Absolute
    /// targets are always denied.
    ///
    /// In strict mode the target must stay under the root both lexically
    /// and after following the links already on disk, so a chain of
    /// in-root links cannot climb out through `..`.
    pub fn resolve_link_target(&self, link: &Path, target: &Path) -> Result<PathBuf, UnpackError> {
        if is_absolute_target(target) {
            return Err(UnpackError::AbsoluteLinkTarget(target.display().to_string()));
        }

        let base = link.parent().unwrap_or(&self.root);
        let joined = base.join(target);
        let lexical = normalize(&joined);
        if self.mode == Confinement::Legacy {
            return Ok(lexical);
        }

        if !lexical.starts_with(&self.root) {
            return Err(UnpackError::EscapesRoot(target.display().to_string()));
        }
        let physical = resolve_existing(&joined);
        if !physical.starts_with(&self.root) {
            return Err(UnpackError::EscapesRoot(physical.display().to_string()));
        }
        Ok(physical)
    }
}

/// Converts raw wire bytes into a path.
#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> Result<&Path, UnpackError> {
    use std::os::unix::ffi::OsStrExt;

    Ok(Path::new(std::ffi::OsStr::from_bytes(bytes)))
}

/// Converts raw wire bytes into a path. Non-UTF-8 names are rejected.
#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> Result<&Path, UnpackError> {
    std::str::from_utf8(bytes)
        .map(Path::new)
        .map_err(|_| UnpackError::InvalidName)
}

fn bounded(len: u64) -> Option<usize> {
    usize::try_from(len)
        .ok()
        .filter(|&len| len < MAX_PATH_LENGTH)
}

fn is_absolute_target(target: &Path) -> bool {
    target.is_absolute()
        || target.has_root()
        || matches!(target.components().next(), Some(Component::Prefix(_)))
}

/// Canonicalizes the longest existing prefix of `path` and folds the rest
/// lexically. Missing components cannot be links yet.
fn resolve_existing(path: &Path) -> PathBuf {
    let components: Vec<Component<'_>> = path.components().collect();
    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        if let Ok(mut real) = fs::canonicalize(&prefix) {
            real.extend(&components[split..]);
            return normalize(&real);
        }
    }
    normalize(path)
}

/// Lexically folds `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}
