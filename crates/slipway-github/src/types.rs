// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use serde::Deserialize;

use crate::error::GithubError;

/// What to create: the caller-facing description of a repository.
#[derive(Clone, Debug)]
pub struct RepositorySpec {
	pub name: String,
	pub description: String,
	pub private: bool,
}

impl RepositorySpec {
	/// A public repository with an empty description, matching the
	/// provisioner's defaults.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			private: false,
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	pub fn private(mut self, private: bool) -> Self {
		self.private = private;
		self
	}
}

/// The provider-side repository handle returned by ensure.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct RemoteRepository {
	pub full_name: String,
	pub clone_url: String,
	pub html_url: String,
}

pub fn validate_repo_name(name: &str) -> Result<(), GithubError> {
	if name.is_empty() || name.len() > 100 {
		return Err(GithubError::InvalidName(
			"Name must be 1-100 characters".into(),
		));
	}

	if name == "." || name == ".." {
		return Err(GithubError::InvalidName("Invalid name".into()));
	}

	if name.starts_with('.') || name.starts_with('-') {
		return Err(GithubError::InvalidName(
			"Name cannot start with '.' or '-'".into(),
		));
	}

	if name.contains("..") {
		return Err(GithubError::InvalidName("Name cannot contain '..'".into()));
	}

	if !name
		.chars()
		.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
	{
		return Err(GithubError::InvalidName(
			"Name can only contain letters, numbers, dash, underscore, dot".into(),
		));
	}

	Ok(())
}
