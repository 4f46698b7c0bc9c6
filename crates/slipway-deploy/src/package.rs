// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! In-memory code packaging.
//!
//! The deployable payload is a single-entry archive built fresh on every
//! invocation and never persisted locally. The entry name is derived from
//! the handler's module prefix and the runtime's source extension, so the
//! platform finds the module the handler reference points at.

use std::fmt;
use std::io::{Cursor, Write};
use std::str::FromStr;

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::DeployError;

/// Handler used when the caller does not supply one.
pub const DEFAULT_HANDLER: &str = "lambda_function.lambda_handler";

/// Runtime used when the caller does not supply one.
pub const DEFAULT_RUNTIME: &str = "python3.8";

/// A validated `module.function` entry-point reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Handler {
	raw: String,
	module: String,
}

impl Handler {
	/// Parse a `module.function` reference. The module is everything before
	/// the final dot.
	pub fn parse(raw: &str) -> Result<Self, DeployError> {
		let (module, function) = raw
			.rsplit_once('.')
			.ok_or_else(|| DeployError::InvalidHandler(raw.to_string()))?;

		if module.is_empty() || function.is_empty() {
			return Err(DeployError::InvalidHandler(raw.to_string()));
		}

		Ok(Self {
			raw: raw.to_string(),
			module: module.to_string(),
		})
	}

	/// The module prefix the archive entry is named after.
	pub fn module(&self) -> &str {
		&self.module
	}

	pub fn as_str(&self) -> &str {
		&self.raw
	}
}

impl fmt::Display for Handler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.raw)
	}
}

impl FromStr for Handler {
	type Err = DeployError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

/// Source file extension for a runtime identifier, by family prefix.
fn source_extension(runtime: &str) -> Option<&'static str> {
	if runtime.starts_with("python") {
		Some("py")
	} else if runtime.starts_with("nodejs") {
		Some("js")
	} else if runtime.starts_with("ruby") {
		Some("rb")
	} else {
		None
	}
}

/// A built single-entry code archive.
#[derive(Clone, Debug)]
pub struct CodePackage {
	entry_name: String,
	bytes: Vec<u8>,
}

impl CodePackage {
	/// Wrap the source text into an archive whose one entry matches the
	/// handler's module prefix.
	pub fn build(source: &str, handler: &Handler, runtime: &str) -> Result<Self, DeployError> {
		let extension = source_extension(runtime)
			.ok_or_else(|| DeployError::UnsupportedRuntime(runtime.to_string()))?;
		let entry_name = format!("{}.{}", handler.module(), extension);

		let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
		writer.start_file(entry_name.as_str(), SimpleFileOptions::default())?;
		writer.write_all(source.as_bytes())?;
		let cursor = writer.finish()?;

		Ok(Self {
			entry_name,
			bytes: cursor.into_inner(),
		})
	}

	pub fn entry_name(&self) -> &str {
		&self.entry_name
	}

	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.bytes
	}
}
