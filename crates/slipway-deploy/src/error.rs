// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use thiserror::Error;

use crate::api::{FunctionApiError, IdentityApiError};

/// Errors from the function provisioning workflow.
///
/// Identity-phase and deployment-phase failures share this one channel;
/// callers match on the variant instead of inspecting result shapes.
#[derive(Debug, Error)]
pub enum DeployError {
	/// Identity creation or lookup failed (other than a recoverable
	/// conflict).
	#[error("identity provisioning failed: {0}")]
	Identity(#[from] IdentityApiError),

	/// Function creation or code update failed.
	#[error("function deployment failed: {0}")]
	Function(#[from] FunctionApiError),

	/// The handler reference is not of the form `module.function`.
	#[error("invalid handler '{0}': expected module.function")]
	InvalidHandler(String),

	/// No source file extension is known for the runtime.
	#[error("unsupported runtime '{0}'")]
	UnsupportedRuntime(String),

	/// Building the in-memory archive failed.
	#[error("failed to build code archive: {0}")]
	Archive(#[from] zip::result::ZipError),

	/// Writing into the in-memory archive failed.
	#[error("failed to write code archive: {0}")]
	ArchiveIo(#[from] std::io::Error),
}
