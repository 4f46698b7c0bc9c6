// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use slipway_common_core::Ensured;
use slipway_git::GitClient;
use slipway_github::{GithubClient, RemoteRepository, RepositorySpec};
use tokio::fs;
use tracing::{info, warn};

use crate::error::RepoError;
use crate::stage;

/// Fixed commit message for the initial publish commit.
const COMMIT_MESSAGE: &str = "Initial commit with .gitignore, LICENSE, and source file";

/// Committer identity for the automated commit; fresh machines and CI have
/// no ambient git identity to fall back on.
const COMMITTER_NAME: &str = "slipway";
const COMMITTER_EMAIL: &str = "slipway@localhost";

const DEFAULT_BRANCH: &str = "master";
const REMOTE_NAME: &str = "origin";

/// What to publish and where to stage it.
#[derive(Clone, Debug)]
pub struct PublishSpec {
	pub clone_url: String,
	pub source_path: PathBuf,
	pub staging_dir: PathBuf,
	pub branch: String,
}

impl PublishSpec {
	pub fn new(
		clone_url: impl Into<String>,
		source_path: impl Into<PathBuf>,
		staging_dir: impl Into<PathBuf>,
	) -> Self {
		Self {
			clone_url: clone_url.into(),
			source_path: source_path.into(),
			staging_dir: staging_dir.into(),
			branch: DEFAULT_BRANCH.to_string(),
		}
	}

	pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
		self.branch = branch.into();
		self
	}
}

/// Ensures a remote repository exists and publishes a local source artifact
/// into it.
pub struct RepoProvisioner<G: GitClient> {
	github: GithubClient,
	git: G,
}

impl<G: GitClient> RepoProvisioner<G> {
	pub fn new(github: GithubClient, git: G) -> Self {
		Self { github, git }
	}

	/// Ensure the remote repository exists, creating it if absent.
	pub async fn ensure_repository(
		&self,
		spec: &RepositorySpec,
	) -> Result<Ensured<RemoteRepository>, RepoError> {
		let ensured = self.github.create_repository(spec).await?;
		if ensured.was_created() {
			info!(name = %spec.name, "repository created");
		} else {
			info!(name = %spec.name, "repository already existed");
		}
		Ok(ensured)
	}

	/// Stage, commit, and push the source artifact.
	///
	/// Every step is a hard dependency: the first failure abandons the rest.
	/// The staging directory this call created is removed before returning,
	/// on success and on every failure path. A staging directory that
	/// already exists is refused and left untouched.
	pub async fn publish(&self, spec: &PublishSpec) -> Result<(), RepoError> {
		stage::create_staging_dir(&spec.staging_dir).await?;

		let result = self.publish_inner(spec).await;

		if let Err(e) = fs::remove_dir_all(&spec.staging_dir).await {
			warn!(
					path = %spec.staging_dir.display(),
					error = %e,
					"failed to remove staging directory"
			);
		}

		result
	}

	async fn publish_inner(&self, spec: &PublishSpec) -> Result<(), RepoError> {
		stage::populate(&spec.staging_dir, &spec.source_path).await?;

		let dir = spec.staging_dir.as_path();
		self.git.init(dir, &spec.branch).await?;
		self.git.set_config(dir, "user.name", COMMITTER_NAME).await?;
		self.git
			.set_config(dir, "user.email", COMMITTER_EMAIL)
			.await?;
		self.git.add_remote(dir, REMOTE_NAME, &spec.clone_url).await?;
		self.git.stage_all(dir).await?;
		let sha = self.git.commit(dir, COMMIT_MESSAGE).await?;
		self.git
			.push_upstream(dir, REMOTE_NAME, &spec.branch)
			.await?;

		info!(
				clone_url = %spec.clone_url,
				sha = %sha,
				"code pushed to the repository"
		);
		Ok(())
	}
}
