// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the repository provisioning workflow.
#[derive(Debug, Error)]
pub enum RepoError {
	/// Remote repository creation or lookup failed.
	#[error(transparent)]
	Github(#[from] slipway_github::GithubError),

	/// A git subprocess step failed; earlier staging steps are abandoned.
	#[error(transparent)]
	Git(#[from] slipway_git::GitError),

	/// The staging directory already exists. Publish owns its staging
	/// directory exclusively and will not reuse or delete one it did not
	/// create.
	#[error("staging directory {path} already exists")]
	StagingExists { path: PathBuf },

	/// A filesystem staging step failed.
	#[error("staging step failed at {path}: {source}")]
	Staging {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The source path does not name a file.
	#[error("source path {path} has no file name")]
	InvalidSource { path: PathBuf },
}
