// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Loading secrets from environment variables.
//!
//! Secrets are injected, never hardcoded. A secret named `FOO` may be
//! provided either directly in `FOO` or indirectly via `FOO_FILE`, which
//! names a file whose contents are the secret (the usual container-secret
//! mount convention). Setting both is a configuration error.

use std::env;
use std::fs;
use std::path::PathBuf;

use slipway_common_secret::SecretString;
use thiserror::Error;

/// Errors from resolving a secret environment variable.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	/// Both `VAR` and `VAR_FILE` were set.
	#[error("both {var} and {var}_FILE are set; set exactly one")]
	BothSet { var: String },

	/// The file named by `VAR_FILE` could not be read.
	#[error("failed to read secret file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Error from [`require_secret_env`] when the secret is absent.
#[derive(Debug, Error)]
pub enum RequiredSecretError {
	#[error("{var} is not set (set {var} or {var}_FILE)")]
	Missing { var: String },

	#[error(transparent)]
	Env(#[from] SecretEnvError),
}

/// Load an optional secret from `var` or `var_FILE`.
///
/// Returns `Ok(None)` when neither variable is set. File contents have a
/// single trailing newline stripped, matching how secret files are written
/// by `echo` and most secret mounts.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	let direct = env::var(var).ok();
	let file = env::var(&file_var).ok();

	match (direct, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::BothSet {
			var: var.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let contents = fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
				path: path.clone(),
				source,
			})?;
			let trimmed = contents.strip_suffix('\n').unwrap_or(&contents);
			Ok(Some(SecretString::new(trimmed.to_string())))
		}
		(None, None) => Ok(None),
	}
}

/// Load a secret from `var` or `var_FILE`, failing if neither is set.
pub fn require_secret_env(var: &str) -> Result<SecretString, RequiredSecretError> {
	load_secret_env(var)?.ok_or_else(|| RequiredSecretError::Missing {
		var: var.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	// Each test uses a unique variable name so tests can run in parallel
	// without stepping on each other's environment.

	#[test]
	fn test_direct_value() {
		env::set_var("SLIPWAY_TEST_SECRET_DIRECT", "s3cret");
		let secret = load_secret_env("SLIPWAY_TEST_SECRET_DIRECT").unwrap();
		assert_eq!(secret.unwrap().expose(), "s3cret");
		env::remove_var("SLIPWAY_TEST_SECRET_DIRECT");
	}

	#[test]
	fn test_missing_returns_none() {
		assert!(load_secret_env("SLIPWAY_TEST_SECRET_ABSENT")
			.unwrap()
			.is_none());
	}

	#[test]
	fn test_file_value_strips_trailing_newline() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "s3cret-from-file").unwrap();

		env::set_var("SLIPWAY_TEST_SECRET_FILEVAR_FILE", file.path());
		let secret = load_secret_env("SLIPWAY_TEST_SECRET_FILEVAR").unwrap();
		assert_eq!(secret.unwrap().expose(), "s3cret-from-file");
		env::remove_var("SLIPWAY_TEST_SECRET_FILEVAR_FILE");
	}

	#[test]
	fn test_both_set_is_an_error() {
		let file = tempfile::NamedTempFile::new().unwrap();
		env::set_var("SLIPWAY_TEST_SECRET_BOTH", "direct");
		env::set_var("SLIPWAY_TEST_SECRET_BOTH_FILE", file.path());

		let err = load_secret_env("SLIPWAY_TEST_SECRET_BOTH").unwrap_err();
		assert!(matches!(err, SecretEnvError::BothSet { .. }));

		env::remove_var("SLIPWAY_TEST_SECRET_BOTH");
		env::remove_var("SLIPWAY_TEST_SECRET_BOTH_FILE");
	}

	#[test]
	fn test_unreadable_file_is_an_error() {
		env::set_var(
			"SLIPWAY_TEST_SECRET_NOFILE_FILE",
			"/nonexistent/slipway-secret",
		);
		let err = load_secret_env("SLIPWAY_TEST_SECRET_NOFILE").unwrap_err();
		assert!(matches!(err, SecretEnvError::FileRead { .. }));
		env::remove_var("SLIPWAY_TEST_SECRET_NOFILE_FILE");
	}

	#[test]
	fn test_require_missing() {
		let err = require_secret_env("SLIPWAY_TEST_SECRET_REQUIRED").unwrap_err();
		assert!(matches!(err, RequiredSecretError::Missing { .. }));
		assert!(err.to_string().contains("SLIPWAY_TEST_SECRET_REQUIRED"));
	}
}
