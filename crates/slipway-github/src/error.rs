// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the GitHub client.

use thiserror::Error;

/// Errors that can occur when interacting with the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[from] reqwest::Error),

	/// Invalid or rejected token.
	#[error("Unauthorized: token was rejected by GitHub")]
	Unauthorized,

	/// GitHub API returned an unexpected status. Carries the raw response
	/// body so the provider's own message reaches the operator unmodified.
	#[error("GitHub API error: {status} - {body}")]
	ApiError { status: u16, body: String },

	/// Invalid or unparseable response.
	#[error("Invalid response from GitHub: {0}")]
	InvalidResponse(String),

	/// Configuration error.
	#[error("Configuration error: {0}")]
	Config(String),

	/// Repository name failed validation before any network call.
	#[error("Invalid repository name: {0}")]
	InvalidName(String),
}

impl GithubError {
	/// Create an API error from status code and raw body.
	pub fn api_error(status: u16, body: impl Into<String>) -> Self {
		Self::ApiError {
			status,
			body: body.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_api_error_display_carries_body() {
		let err = GithubError::api_error(500, r#"{"message":"boom"}"#);
		let rendered = err.to_string();
		assert!(rendered.contains("500"));
		assert!(rendered.contains("boom"));
	}

	#[test]
	fn test_invalid_name_display() {
		let err = GithubError::InvalidName("Name must be 1-100 characters".into());
		assert!(err.to_string().contains("Invalid repository name"));
	}
}
