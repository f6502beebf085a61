//! Test utilities for storekit crates.

use parking_lot::{const_mutex, Mutex, MutexGuard};
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

static ENV_LOCK: Mutex<()> = const_mutex(());

/// Creates a temporary directory that is cleaned up on drop.
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Creates a temporary file with given content.
pub fn temp_file(content: &str) -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let path = dir.path().join("test_file");
    std::fs::write(&path, content).expect("Failed to write temp file");
    (dir, path)
}

/// Sets environment variables for the lifetime of the guard and restores the
/// previous values on drop.
///
/// Guards are serialized process-wide, so only one test touches the
/// environment at a time. Do not hold two at once on the same thread.
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Start with no variables touched.
    pub fn new() -> Self {
        Self {
            saved: Vec::new(),
            _lock: ENV_LOCK.lock(),
        }
    }

    fn remember(&mut self, var: &str) {
        if !self.saved.iter().any(|(name, _)| name == var) {
            self.saved.push((var.to_string(), env::var(var).ok()));
        }
    }

    /// Set `var` to `value`.
    pub fn set(mut self, var: &str, value: &str) -> Self {
        self.remember(var);
        env::set_var(var, value);
        self
    }

    /// Remove `var`.
    pub fn unset(mut self, var: &str) -> Self {
        self.remember(var);
        env::remove_var(var);
        self
    }
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (var, value) in self.saved.drain(..).rev() {
            match value {
                Some(v) => env::set_var(&var, v),
                None => env::remove_var(&var),
            }
        }
    }
}

/// Assert that a Result is Ok and return the value.
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a Result is Err and return the error.
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
