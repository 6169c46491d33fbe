// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path containment checks

use std::path::{Component, Path, PathBuf};

/// Absolute, lexically normalized form of `path` (no symlink resolution)
pub fn absolutize(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    let mut ans = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                ans.pop();
            }
            other => ans.push(other.as_os_str()),
        }
    }
    ans
}

/// Symlink-resolved form of `path`; trailing components that do not exist
/// yet are appended to the resolved form of their nearest existing ancestor.
fn realpath(path: &Path) -> PathBuf {
    let mut existing = absolutize(path);
    let mut missing = Vec::new();
    while std::fs::symlink_metadata(&existing).is_err() {
        match existing.file_name() {
            Some(name) => {
                missing.push(name.to_os_string());
                existing.pop();
            }
            None => break,
        }
    }
    let mut ans = std::fs::canonicalize(&existing).unwrap_or(existing);
    for name in missing.iter().rev() {
        ans.push(name);
    }
    ans
}

/// Whether `lhs` lies at or beneath `rhs`, comparing whole components both
/// lexically and after resolving symlinks.
pub fn path_really_within(lhs: impl AsRef<Path>, rhs: impl AsRef<Path>) -> bool {
    let (lhs, rhs) = (lhs.as_ref(), rhs.as_ref());
    absolutize(lhs).starts_with(absolutize(rhs)) && realpath(lhs).starts_with(realpath(rhs))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
