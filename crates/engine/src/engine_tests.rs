// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::TempDir;

#[test]
fn open_creates_enabled_cache_dirs_only() {
    let tmp = TempDir::new().unwrap();
    let mut config = RunConfig::default();
    config.download_cache.put = true;
    config.download_cache.dir = tmp.path().join("downloads");
    config.call_cache.dir = tmp.path().join("calls");

    let cache = CacheHandle::open(&config).unwrap();
    assert_eq!(cache.download_dir(), Some(tmp.path().join("downloads").as_path()));
    assert!(tmp.path().join("downloads").is_dir());
    assert_eq!(cache.call_dir(), None);
    assert!(!tmp.path().join("calls").exists());
}

#[test]
fn locks_held_until_drop() {
    let tmp = TempDir::new().unwrap();
    let lock_path = tmp.path().join(".lock");
    let cache = CacheHandle::default();
    cache.hold_lock(&lock_path).unwrap();
    assert_eq!(cache.held_locks(), 1);

    let other = File::open(&lock_path).unwrap();
    assert!(other.try_lock_exclusive().is_err());

    drop(cache);
    other.try_lock_exclusive().unwrap();
}
