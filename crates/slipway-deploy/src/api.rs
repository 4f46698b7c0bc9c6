// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Capability interfaces over the provider's control planes.
//!
//! The provisioner talks to the identity service and the compute service
//! through these two traits. Implementations wrap whatever transport the
//! deployment target uses; the provisioner only depends on the conflict /
//! not-found / other split in the error types.

use async_trait::async_trait;
use thiserror::Error;

/// Handle to an execution identity (role).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleHandle {
	pub name: String,
	pub arn: String,
}

/// What the compute service knows about an existing function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDescription {
	pub function_name: String,
	pub arn: Option<String>,
}

/// Result of a create or update call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDeployment {
	pub function_name: String,
	pub version: Option<String>,
	pub arn: Option<String>,
}

/// Everything the create path submits. The update path submits only new
/// code; configuration fields are not re-applied to existing functions.
#[derive(Clone, Debug)]
pub struct CreateFunctionRequest {
	pub function_name: String,
	pub runtime: String,
	pub role_arn: String,
	pub handler: String,
	pub archive: Vec<u8>,
	pub timeout_secs: u32,
	pub publish: bool,
}

/// Errors from the identity control plane.
#[derive(Debug, Error)]
pub enum IdentityApiError {
	/// The named identity already exists.
	#[error("identity already exists")]
	Conflict,

	/// The named identity does not exist.
	#[error("identity not found")]
	NotFound,

	/// Any other provider-side failure.
	#[error("identity provider error: {0}")]
	Provider(String),
}

/// Errors from the compute control plane.
#[derive(Debug, Error)]
pub enum FunctionApiError {
	/// The named function already exists.
	#[error("function already exists")]
	Conflict,

	/// The named function does not exist.
	#[error("function not found")]
	NotFound,

	/// Any other provider-side failure.
	#[error("function provider error: {0}")]
	Provider(String),
}

/// Identity/access management operations the provisioner needs.
#[async_trait]
pub trait IdentityApi: Send + Sync {
	/// Create a role with the given trust policy document.
	async fn create_role(
		&self,
		role_name: &str,
		trust_policy: &str,
	) -> Result<RoleHandle, IdentityApiError>;

	/// Look up an existing role.
	async fn get_role(&self, role_name: &str) -> Result<RoleHandle, IdentityApiError>;

	/// Attach a managed policy to a role.
	async fn attach_role_policy(
		&self,
		role_name: &str,
		policy_arn: &str,
	) -> Result<(), IdentityApiError>;
}

/// Compute deployment operations the provisioner needs.
#[async_trait]
pub trait FunctionApi: Send + Sync {
	/// Look up a function by name; `None` means it does not exist.
	async fn get_function(
		&self,
		function_name: &str,
	) -> Result<Option<FunctionDescription>, FunctionApiError>;

	/// Create a new function and optionally publish a version.
	async fn create_function(
		&self,
		request: CreateFunctionRequest,
	) -> Result<FunctionDeployment, FunctionApiError>;

	/// Replace the code of an existing function, optionally publishing.
	async fn update_function_code(
		&self,
		function_name: &str,
		archive: Vec<u8>,
		publish: bool,
	) -> Result<FunctionDeployment, FunctionApiError>;
}
