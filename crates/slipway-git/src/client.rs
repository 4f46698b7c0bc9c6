// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;

use async_trait::async_trait;

use crate::error::GitError;

/// Trait abstracting the git operations publishing needs, for testability.
///
/// Every operation is rooted at an explicit working directory; nothing here
/// touches the process-wide current directory.
#[async_trait]
pub trait GitClient: Send + Sync {
	/// Initialize a new repository with the given initial branch name.
	async fn init(&self, path: &Path, initial_branch: &str) -> Result<(), GitError>;

	/// Set a repository-local configuration value.
	async fn set_config(&self, path: &Path, key: &str, value: &str) -> Result<(), GitError>;

	/// Register a named remote.
	async fn add_remote(&self, path: &Path, name: &str, url: &str) -> Result<(), GitError>;

	/// Stage all changes in the repository, including untracked files.
	async fn stage_all(&self, path: &Path) -> Result<(), GitError>;

	/// Create a commit with the given message, returning its SHA.
	async fn commit(&self, path: &Path, message: &str) -> Result<String, GitError>;

	/// Push the branch to the remote, setting the upstream.
	async fn push_upstream(&self, path: &Path, remote: &str, branch: &str) -> Result<(), GitError>;
}
