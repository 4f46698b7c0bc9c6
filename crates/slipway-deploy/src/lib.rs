// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Serverless function provisioning workflow for Slipway.
//!
//! This crate provides:
//! - [`IdentityApi`] / [`FunctionApi`]: narrow capability traits over the
//!   provider's identity and compute control planes (no provider SDK here)
//! - [`CodePackage`]: in-memory single-entry archive packaging
//! - [`FunctionProvisioner`]: the ensure-identity, package, create-or-update
//!   pipeline
//!
//! Identity and function creation are idempotent: provider "already exists"
//! conflicts are recovered by lookup or by switching to the update path,
//! never surfaced as failures.

mod api;
mod error;
mod package;
mod provisioner;

pub use api::{
	CreateFunctionRequest, FunctionApi, FunctionApiError, FunctionDeployment, FunctionDescription,
	IdentityApi, IdentityApiError, RoleHandle,
};
pub use error::DeployError;
pub use package::{CodePackage, Handler, DEFAULT_HANDLER, DEFAULT_RUNTIME};
pub use provisioner::{
	assume_role_policy, default_policy_arns, role_name_for, DeploySpec, FunctionProvisioner,
	DEFAULT_PROPAGATION_DELAY, MAX_FUNCTION_TIMEOUT_SECS,
};
