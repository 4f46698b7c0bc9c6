// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// Errors from running git operations.
#[derive(Debug, Error)]
pub enum GitError {
	/// The `git` binary was not found in PATH.
	#[error("git is not installed or not in PATH")]
	GitNotInstalled,

	/// Spawning the subprocess failed for a reason other than a missing
	/// binary.
	#[error("failed to run git: {0}")]
	Io(#[from] std::io::Error),

	/// A git command exited non-zero.
	#[error("git {} failed: {stderr}", .args.join(" "))]
	CommandFailed { args: Vec<String>, stderr: String },
}
