// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The repository-ensure REST client.

use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use slipway_common_core::Ensured;
use tracing::{debug, info};

use crate::config::GithubConfig;
use crate::error::GithubError;
use crate::types::{validate_repo_name, RemoteRepository, RepositorySpec};

#[derive(Serialize)]
struct CreateRepositoryBody<'a> {
	name: &'a str,
	description: &'a str,
	private: bool,
}

#[derive(Deserialize)]
struct AuthenticatedUser {
	login: String,
}

/// GitHub REST client for repository provisioning.
pub struct GithubClient {
	http: Client,
	config: GithubConfig,
}

impl GithubClient {
	pub fn new(config: GithubConfig) -> Self {
		Self {
			http: slipway_common_http::new_client(),
			config,
		}
	}

	/// Ensure the repository exists, creating it if absent.
	///
	/// There is no existence pre-check: the create call is issued first, and
	/// a name conflict reported by the provider is recovered by looking up
	/// the existing repository. Any other non-created status fails with the
	/// provider's raw response body and is never retried.
	pub async fn create_repository(
		&self,
		spec: &RepositorySpec,
	) -> Result<Ensured<RemoteRepository>, GithubError> {
		validate_repo_name(&spec.name)?;

		let url = self.endpoint("user/repos")?;
		let body = CreateRepositoryBody {
			name: &spec.name,
			description: &spec.description,
			private: spec.private,
		};

		debug!(name = %spec.name, "creating repository");

		let response = self
			.http
			.post(url)
			.header("Authorization", self.auth_header())
			.json(&body)
			.send()
			.await?;

		match response.status() {
			StatusCode::CREATED => {
				let repo = parse_repository(&response.text().await?)?;
				info!(name = %spec.name, clone_url = %repo.clone_url, "repository created");
				Ok(Ensured::Created(repo))
			}
			StatusCode::UNAUTHORIZED => Err(GithubError::Unauthorized),
			StatusCode::UNPROCESSABLE_ENTITY => {
				let body = response.text().await?;
				if body.contains("already exists") {
					info!(name = %spec.name, "repository already exists, looking it up");
					let repo = self.lookup_repository(&spec.name).await?;
					Ok(Ensured::Existing(repo))
				} else {
					Err(GithubError::api_error(422, body))
				}
			}
			status => {
				let body = response.text().await?;
				Err(GithubError::api_error(status.as_u16(), body))
			}
		}
	}

	/// Look up an existing repository owned by the authenticated user.
	async fn lookup_repository(&self, name: &str) -> Result<RemoteRepository, GithubError> {
		let user = self.get_json::<AuthenticatedUser>("user").await?;
		let path = format!("repos/{}/{}", user.login, name);
		let response_body = self.get_text(&path).await?;
		parse_repository(&response_body)
	}

	async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, GithubError> {
		let body = self.get_text(path).await?;
		serde_json::from_str(&body).map_err(|e| GithubError::InvalidResponse(e.to_string()))
	}

	async fn get_text(&self, path: &str) -> Result<String, GithubError> {
		let url = self.endpoint(path)?;
		let response = self
			.http
			.get(url)
			.header("Authorization", self.auth_header())
			.send()
			.await?;

		let status = response.status();
		let body = response.text().await?;
		if status == StatusCode::UNAUTHORIZED {
			return Err(GithubError::Unauthorized);
		}
		if !status.is_success() {
			return Err(GithubError::api_error(status.as_u16(), body));
		}
		Ok(body)
	}

	fn endpoint(&self, path: &str) -> Result<Url, GithubError> {
		self.config
			.base_url()
			.join(path)
			.map_err(|e| GithubError::Config(format!("invalid endpoint path '{path}': {e}")))
	}

	fn auth_header(&self) -> String {
		format!("token {}", self.config.token().expose())
	}
}

fn parse_repository(body: &str) -> Result<RemoteRepository, GithubError> {
	serde_json::from_str(body).map_err(|e| GithubError::InvalidResponse(e.to_string()))
}
