// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Filesystem staging for publish: the working directory a commit is built
//! from.

use std::path::Path;

use tokio::fs;
use tracing::debug;

use crate::error::RepoError;

/// Ignore rules written into every published repository.
pub(crate) const GITIGNORE_RULES: &str = "*.pyc\n__pycache__/\n.env\n";

/// License file written into every published repository.
pub(crate) const LICENSE_TEXT: &str =
	"MIT License\n\nCopyright (c) [year] [fullname]\n\nPermission is hereby granted...";

/// Create the staging directory, failing if it already exists.
pub(crate) async fn create_staging_dir(staging: &Path) -> Result<(), RepoError> {
	fs::create_dir(staging).await.map_err(|source| {
		if source.kind() == std::io::ErrorKind::AlreadyExists {
			RepoError::StagingExists {
				path: staging.to_path_buf(),
			}
		} else {
			RepoError::Staging {
				path: staging.to_path_buf(),
				source,
			}
		}
	})
}

/// Copy the source file in and write the fixed `.gitignore` and `LICENSE`.
pub(crate) async fn populate(staging: &Path, source: &Path) -> Result<(), RepoError> {
	let file_name = source.file_name().ok_or_else(|| RepoError::InvalidSource {
		path: source.to_path_buf(),
	})?;

	let dest = staging.join(file_name);
	fs::copy(source, &dest)
		.await
		.map_err(|e| staging_err(source, e))?;

	let gitignore = staging.join(".gitignore");
	fs::write(&gitignore, GITIGNORE_RULES)
		.await
		.map_err(|e| staging_err(&gitignore, e))?;

	let license = staging.join("LICENSE");
	fs::write(&license, LICENSE_TEXT)
		.await
		.map_err(|e| staging_err(&license, e))?;

	debug!(staging = %staging.display(), source = %source.display(), "staged working directory");
	Ok(())
}

fn staging_err(path: &Path, source: std::io::Error) -> RepoError {
	RepoError::Staging {
		path: path.to_path_buf(),
		source,
	}
}
