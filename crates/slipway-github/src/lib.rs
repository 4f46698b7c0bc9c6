// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GitHub repository provisioning client for Slipway.
//!
//! This crate provides:
//! - [`GithubConfig`]: validated configuration with an injected token
//! - [`GithubClient`]: the REST client behind the repository-ensure workflow
//!
//! Repository creation is idempotent: a name conflict from the provider is
//! recovered by looking up the existing repository, never by pre-checking
//! existence (pre-checks cannot be race-free).

mod client;
mod config;
mod error;
mod types;

pub use client::GithubClient;
pub use config::GithubConfig;
pub use error::GithubError;
pub use types::{validate_repo_name, RemoteRepository, RepositorySpec};
