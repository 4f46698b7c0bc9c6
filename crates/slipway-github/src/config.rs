// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration for the GitHub client.

use reqwest::Url;
use slipway_common_config::{require_secret_env, SecretString};

use crate::error::GithubError;

const DEFAULT_BASE_URL: &str = "https://api.github.com";

const TOKEN_ENV: &str = "SLIPWAY_GITHUB_TOKEN";
const BASE_URL_ENV: &str = "SLIPWAY_GITHUB_BASE_URL";

/// Configuration for the GitHub client.
///
/// The token is stored as [`SecretString`] to prevent accidental logging.
/// It is always injected — from the caller or from the environment — never
/// embedded in code.
#[derive(Clone, Debug)]
pub struct GithubConfig {
	token: SecretString,
	base_url: Url,
}

impl GithubConfig {
	/// Create a configuration against the public GitHub API.
	pub fn new(token: SecretString) -> Self {
		Self {
			token,
			base_url: Url::parse(DEFAULT_BASE_URL).expect("default URL is valid"),
		}
	}

	/// Point the client at a different API base URL.
	///
	/// Requirements:
	/// - Must be a valid URL with a host
	/// - Must use HTTPS, except for loopback hosts (local stubs)
	pub fn with_base_url(mut self, raw: &str) -> Result<Self, GithubError> {
		self.base_url = validate_and_normalize_base_url(raw)?;
		Ok(self)
	}

	/// Create configuration from environment variables.
	///
	/// Required:
	/// - `SLIPWAY_GITHUB_TOKEN`: the access token (or `_FILE` suffix for a
	///   file path)
	///
	/// Optional:
	/// - `SLIPWAY_GITHUB_BASE_URL`: API base URL (defaults to
	///   api.github.com)
	pub fn from_env() -> Result<Self, GithubError> {
		let token = require_secret_env(TOKEN_ENV).map_err(|e| GithubError::Config(e.to_string()))?;

		if token.expose().is_empty() {
			return Err(GithubError::Config(format!("{TOKEN_ENV} is empty")));
		}

		let config = Self::new(token);
		match std::env::var(BASE_URL_ENV) {
			Ok(raw) => config.with_base_url(&raw),
			Err(_) => Ok(config),
		}
	}

	pub fn token(&self) -> &SecretString {
		&self.token
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}
}

fn validate_and_normalize_base_url(raw: &str) -> Result<Url, GithubError> {
	let url = Url::parse(raw)
		.map_err(|e| GithubError::Config(format!("Invalid GitHub base URL '{raw}': {e}")))?;

	let host = url
		.host_str()
		.ok_or_else(|| GithubError::Config("GitHub base URL must include a host".to_string()))?;

	let loopback = host == "localhost" || host == "127.0.0.1" || host == "::1" || host == "[::1]";

	if url.scheme() != "https" && !(url.scheme() == "http" && loopback) {
		return Err(GithubError::Config(format!(
			"GitHub base URL must use https, got '{}'",
			url.scheme()
		)));
	}

	Ok(url)
}
