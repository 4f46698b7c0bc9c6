// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace, warn};

use crate::client::GitClient;
use crate::error::GitError;

/// Git client implementation using the git CLI.
pub struct CommandGitClient;

impl CommandGitClient {
	pub fn new() -> Self {
		Self
	}
}

impl Default for CommandGitClient {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl GitClient for CommandGitClient {
	async fn init(&self, path: &Path, initial_branch: &str) -> Result<(), GitError> {
		let branch_flag = format!("--initial-branch={initial_branch}");
		run_git(path, &["init", &branch_flag]).await?;
		debug!(path = %path.display(), branch = %initial_branch, "initialized repository");
		Ok(())
	}

	async fn set_config(&self, path: &Path, key: &str, value: &str) -> Result<(), GitError> {
		run_git(path, &["config", key, value]).await?;
		Ok(())
	}

	async fn add_remote(&self, path: &Path, name: &str, url: &str) -> Result<(), GitError> {
		run_git(path, &["remote", "add", name, url]).await?;
		debug!(path = %path.display(), remote = %name, "registered remote");
		Ok(())
	}

	async fn stage_all(&self, path: &Path) -> Result<(), GitError> {
		run_git(path, &["add", "."]).await?;
		debug!(path = %path.display(), "staged all changes");
		Ok(())
	}

	async fn commit(&self, path: &Path, message: &str) -> Result<String, GitError> {
		run_git(path, &["commit", "-m", message]).await?;

		let sha = run_git(path, &["rev-parse", "HEAD"]).await?;

		debug!(path = %path.display(), sha = %sha, "created commit");
		Ok(sha)
	}

	async fn push_upstream(&self, path: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
		run_git(path, &["push", "-u", remote, branch]).await?;
		debug!(path = %path.display(), remote = %remote, branch = %branch, "pushed branch");
		Ok(())
	}
}

/// Runs a git command and returns the stdout on success.
async fn run_git(path: &Path, args: &[&str]) -> Result<String, GitError> {
	let mut cmd = Command::new("git");
	cmd.arg("-C").arg(path).args(args);

	trace!(
			cmd = %format!("git -C {} {}", path.display(), args.join(" ")),
			"running git command"
	);

	let output = cmd.output().await.map_err(|e| {
		if e.kind() == std::io::ErrorKind::NotFound {
			warn!("git not found in PATH");
			GitError::GitNotInstalled
		} else {
			GitError::Io(e)
		}
	})?;

	if output.status.success() {
		Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
	} else {
		let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
		Err(GitError::CommandFailed {
			args: args.iter().map(|s| s.to_string()).collect(),
			stderr,
		})
	}
}
