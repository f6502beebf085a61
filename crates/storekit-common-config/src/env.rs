//! Environment variable handling.

use std::env;

/// Environment variable names.
pub mod vars {
    pub const STOREKIT_CONFIG: &str = "STOREKIT_CONFIG";
    pub const STOREKIT_MONGO_URI: &str = "STOREKIT_MONGO_URI";
    pub const STOREKIT_REDIS_URL: &str = "STOREKIT_REDIS_URL";
    pub const STOREKIT_ENV: &str = "STOREKIT_ENV";
}

/// Environment access.
pub struct Environment {
    _guard: (),
}

impl Environment {
    /// Initialize environment from .env files.
    ///
    /// Later files override earlier ones: `.env`, `.env.local`, then
    /// `.env.<STOREKIT_ENV>` when that variable is set. Missing files are skipped.
    pub fn init() -> Self {
        let _ = dotenvy::from_filename(".env");
        let _ = dotenvy::from_filename(".env.local");

        if let Ok(profile) = env::var(vars::STOREKIT_ENV) {
            let _ = dotenvy::from_filename(format!(".env.{profile}"));
        }

        Self { _guard: () }
    }

    /// Get an optional, non-empty string variable.
    pub fn get(var: &str) -> Option<String> {
        env::var(var).ok().filter(|v| !v.is_empty())
    }
}
