// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::time::Duration;

use slipway_common_core::Ensured;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::api::{
	CreateFunctionRequest, FunctionApi, FunctionApiError, FunctionDeployment, IdentityApi,
	IdentityApiError, RoleHandle,
};
use crate::error::DeployError;
use crate::package::{CodePackage, Handler, DEFAULT_HANDLER, DEFAULT_RUNTIME};

/// Ceiling on function timeout; the platform maximum of 15 minutes.
pub const MAX_FUNCTION_TIMEOUT_SECS: u32 = 900;

/// How long to wait for a freshly created identity to become visible to the
/// compute service.
pub const DEFAULT_PROPAGATION_DELAY: Duration = Duration::from_secs(10);

const ASSUME_ROLE_SERVICE: &str = "lambda.amazonaws.com";

/// Role name derived deterministically from the function name.
pub fn role_name_for(function_name: &str) -> String {
	format!("{}Role", function_name.to_lowercase())
}

/// The fixed trust policy allowing the compute service to assume the role.
pub fn assume_role_policy() -> String {
	serde_json::json!({
		"Version": "2012-10-17",
		"Statement": [{
			"Effect": "Allow",
			"Principal": {"Service": ASSUME_ROLE_SERVICE},
			"Action": "sts:AssumeRole"
		}]
	})
	.to_string()
}

/// Permission grants attached when the caller does not supply a list:
/// execution basics plus storage and log access.
pub fn default_policy_arns() -> Vec<String> {
	[
		"arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole",
		"arn:aws:iam::aws:policy/AmazonS3FullAccess",
		"arn:aws:iam::aws:policy/CloudWatchLogsFullAccess",
	]
	.iter()
	.map(|arn| arn.to_string())
	.collect()
}

/// What to deploy.
#[derive(Clone, Debug)]
pub struct DeploySpec {
	pub function_name: String,
	pub source: String,
	pub handler: Handler,
	pub runtime: String,
	pub timeout_secs: u32,
	pub policy_arns: Vec<String>,
}

impl DeploySpec {
	pub fn new(function_name: impl Into<String>, source: impl Into<String>) -> Self {
		Self {
			function_name: function_name.into(),
			source: source.into(),
			handler: Handler::parse(DEFAULT_HANDLER).expect("default handler is valid"),
			runtime: DEFAULT_RUNTIME.to_string(),
			timeout_secs: MAX_FUNCTION_TIMEOUT_SECS,
			policy_arns: default_policy_arns(),
		}
	}

	pub fn with_handler(mut self, handler: Handler) -> Self {
		self.handler = handler;
		self
	}

	pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
		self.runtime = runtime.into();
		self
	}

	pub fn with_timeout_secs(mut self, timeout_secs: u32) -> Self {
		self.timeout_secs = timeout_secs;
		self
	}

	pub fn with_policy_arns(mut self, policy_arns: Vec<String>) -> Self {
		self.policy_arns = policy_arns;
		self
	}
}

/// Ensures an execution identity and a function exist, creating or updating
/// as needed.
pub struct FunctionProvisioner<I, F> {
	identity: I,
	functions: F,
	propagation_delay: Duration,
}

impl<I: IdentityApi, F: FunctionApi> FunctionProvisioner<I, F> {
	pub fn new(identity: I, functions: F) -> Self {
		Self {
			identity,
			functions,
			propagation_delay: DEFAULT_PROPAGATION_DELAY,
		}
	}

	/// Override the identity propagation wait. Tests use zero.
	pub fn with_propagation_delay(mut self, delay: Duration) -> Self {
		self.propagation_delay = delay;
		self
	}

	/// Ensure the function's execution identity exists.
	///
	/// Creation is attempted first, with no existence pre-check; a conflict
	/// from the provider means the identity already exists and its handle is
	/// looked up instead. Permission grants are attached only to identities
	/// this call created — existing grants are never diffed or revoked.
	pub async fn ensure_identity(
		&self,
		function_name: &str,
		policy_arns: &[String],
	) -> Result<Ensured<RoleHandle>, DeployError> {
		let role_name = role_name_for(function_name);

		match self
			.identity
			.create_role(&role_name, &assume_role_policy())
			.await
		{
			Ok(role) => {
				info!(role = %role_name, arn = %role.arn, "execution identity created");
				for policy_arn in policy_arns {
					self.identity
						.attach_role_policy(&role_name, policy_arn)
						.await?;
					debug!(role = %role_name, policy = %policy_arn, "attached permission grant");
				}
				Ok(Ensured::Created(role))
			}
			Err(IdentityApiError::Conflict) => {
				debug!(role = %role_name, "identity already exists, looking it up");
				let role = self.identity.get_role(&role_name).await?;
				Ok(Ensured::Existing(role))
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Ensure the function exists with the given code, creating or updating.
	///
	/// The identity phase and the deployment phase share one failure
	/// channel: any error is a typed `Err`, and identity failures abort the
	/// flow before packaging.
	pub async fn create_or_update(
		&self,
		spec: &DeploySpec,
	) -> Result<Ensured<FunctionDeployment>, DeployError> {
		let role = self
			.ensure_identity(&spec.function_name, &spec.policy_arns)
			.await?
			.into_value();

		let package = CodePackage::build(&spec.source, &spec.handler, &spec.runtime)?;

		// A freshly created identity may not be visible to the compute
		// service yet. One fixed wait, not a retry loop.
		debug!(
				delay_secs = self.propagation_delay.as_secs(),
				"waiting out identity propagation"
		);
		sleep(self.propagation_delay).await;

		let existing = self.functions.get_function(&spec.function_name).await?;

		if existing.is_some() {
			let deployment = self.update(spec, package).await?;
			return Ok(Ensured::Existing(deployment));
		}

		let request = CreateFunctionRequest {
			function_name: spec.function_name.clone(),
			runtime: spec.runtime.clone(),
			role_arn: role.arn,
			handler: spec.handler.as_str().to_string(),
			archive: package.bytes().to_vec(),
			timeout_secs: spec.timeout_secs.min(MAX_FUNCTION_TIMEOUT_SECS),
			publish: true,
		};

		match self.functions.create_function(request).await {
			Ok(deployment) => {
				info!(
						function = %spec.function_name,
						version = deployment.version.as_deref().unwrap_or("-"),
						"function created"
				);
				Ok(Ensured::Created(deployment))
			}
			Err(FunctionApiError::Conflict) => {
				// Lost a create race; the function exists now, so update it.
				debug!(function = %spec.function_name, "create conflicted, switching to update");
				let deployment = self.update(spec, package).await?;
				Ok(Ensured::Existing(deployment))
			}
			Err(e) => Err(e.into()),
		}
	}

	async fn update(
		&self,
		spec: &DeploySpec,
		package: CodePackage,
	) -> Result<FunctionDeployment, DeployError> {
		let deployment = self
			.functions
			.update_function_code(&spec.function_name, package.into_bytes(), true)
			.await?;
		info!(
				function = %spec.function_name,
				version = deployment.version.as_deref().unwrap_or("-"),
				"function code updated"
		);
		Ok(deployment)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::FunctionDescription;
	use async_trait::async_trait;
	use std::collections::HashMap;
	use std::sync::Mutex;

	#[derive(Default)]
	struct IdentityState {
		roles: HashMap<String, RoleHandle>,
		attached: Vec<(String, String)>,
		create_attempts: usize,
		get_calls: usize,
	}

	#[derive(Default)]
	struct FakeIdentityApi {
		state: Mutex<IdentityState>,
	}

	impl FakeIdentityApi {
		fn with_existing_role(role_name: &str, arn: &str) -> Self {
			let fake = Self::default();
			fake.state.lock().unwrap().roles.insert(
				role_name.to_string(),
				RoleHandle {
					name: role_name.to_string(),
					arn: arn.to_string(),
				},
			);
			fake
		}
	}

	#[async_trait]
	impl IdentityApi for FakeIdentityApi {
		async fn create_role(
			&self,
			role_name: &str,
			_trust_policy: &str,
		) -> Result<RoleHandle, IdentityApiError> {
			let mut state = self.state.lock().unwrap();
			state.create_attempts += 1;
			if state.roles.contains_key(role_name) {
				return Err(IdentityApiError::Conflict);
			}
			let role = RoleHandle {
				name: role_name.to_string(),
				arn: format!("arn:aws:iam::123456789012:role/{role_name}"),
			};
			state.roles.insert(role_name.to_string(), role.clone());
			Ok(role)
		}

		async fn get_role(&self, role_name: &str) -> Result<RoleHandle, IdentityApiError> {
			let mut state = self.state.lock().unwrap();
			state.get_calls += 1;
			state
				.roles
				.get(role_name)
				.cloned()
				.ok_or(IdentityApiError::NotFound)
		}

		async fn attach_role_policy(
			&self,
			role_name: &str,
			policy_arn: &str,
		) -> Result<(), IdentityApiError> {
			let mut state = self.state.lock().unwrap();
			state
				.attached
				.push((role_name.to_string(), policy_arn.to_string()));
			Ok(())
		}
	}

	#[derive(Default)]
	struct FunctionState {
		functions: HashMap<String, FunctionDescription>,
		creates: Vec<CreateFunctionRequest>,
		updates: Vec<(String, Vec<u8>, bool)>,
	}

	#[derive(Default)]
	struct FakeFunctionApi {
		state: Mutex<FunctionState>,
		// Simulates a concurrent creator: get_function says absent while
		// create_function still conflicts.
		hide_from_get: bool,
	}

	impl FakeFunctionApi {
		fn with_existing_function(name: &str) -> Self {
			let fake = Self::default();
			fake.state.lock().unwrap().functions.insert(
				name.to_string(),
				FunctionDescription {
					function_name: name.to_string(),
					arn: Some(format!("arn:aws:lambda::123456789012:function:{name}")),
				},
			);
			fake
		}
	}

	#[async_trait]
	impl FunctionApi for FakeFunctionApi {
		async fn get_function(
			&self,
			function_name: &str,
		) -> Result<Option<FunctionDescription>, FunctionApiError> {
			if self.hide_from_get {
				return Ok(None);
			}
			Ok(self
				.state
				.lock()
				.unwrap()
				.functions
				.get(function_name)
				.cloned())
		}

		async fn create_function(
			&self,
			request: CreateFunctionRequest,
		) -> Result<FunctionDeployment, FunctionApiError> {
			let mut state = self.state.lock().unwrap();
			if state.functions.contains_key(&request.function_name) {
				return Err(FunctionApiError::Conflict);
			}
			let name = request.function_name.clone();
			state.functions.insert(
				name.clone(),
				FunctionDescription {
					function_name: name.clone(),
					arn: None,
				},
			);
			state.creates.push(request);
			Ok(FunctionDeployment {
				function_name: name,
				version: Some("1".to_string()),
				arn: None,
			})
		}

		async fn update_function_code(
			&self,
			function_name: &str,
			archive: Vec<u8>,
			publish: bool,
		) -> Result<FunctionDeployment, FunctionApiError> {
			let mut state = self.state.lock().unwrap();
			if !state.functions.contains_key(function_name) {
				return Err(FunctionApiError::NotFound);
			}
			state
				.updates
				.push((function_name.to_string(), archive, publish));
			Ok(FunctionDeployment {
				function_name: function_name.to_string(),
				version: Some("2".to_string()),
				arn: None,
			})
		}
	}

	fn provisioner(
		identity: FakeIdentityApi,
		functions: FakeFunctionApi,
	) -> FunctionProvisioner<FakeIdentityApi, FakeFunctionApi> {
		FunctionProvisioner::new(identity, functions).with_propagation_delay(Duration::ZERO)
	}

	#[test]
	fn test_role_name_is_lowercased_function_name() {
		assert_eq!(role_name_for("MyFunc"), "myfuncRole");
		assert_eq!(role_name_for("demo"), "demoRole");
	}

	#[test]
	fn test_trust_policy_names_compute_service() {
		let policy: serde_json::Value = serde_json::from_str(&assume_role_policy()).unwrap();
		assert_eq!(policy["Version"], "2012-10-17");
		assert_eq!(
			policy["Statement"][0]["Principal"]["Service"],
			"lambda.amazonaws.com"
		);
		assert_eq!(policy["Statement"][0]["Action"], "sts:AssumeRole");
	}

	/// Test: a fresh identity is created and all supplied grants attached.
	#[tokio::test]
	async fn test_ensure_identity_creates_and_attaches() {
		let p = provisioner(FakeIdentityApi::default(), FakeFunctionApi::default());
		let arns = vec!["arn:aws:iam::aws:policy/A".to_string()];

		let ensured = p.ensure_identity("Demo", &arns).await.unwrap();

		assert!(ensured.was_created());
		assert_eq!(ensured.value().name, "demoRole");

		let state = p.identity.state.lock().unwrap();
		assert_eq!(state.attached, vec![("demoRole".to_string(), arns[0].clone())]);
	}

	/// Test: a conflicting create falls back to lookup and reuses the
	/// existing handle.
	///
	/// Why this test is important: this is the only self-healing path in
	/// the system. Two resolutions against a pre-existing identity must
	/// yield the same handle, via lookup, without a successful second
	/// create and without re-attaching grants.
	#[tokio::test]
	async fn test_ensure_identity_conflict_uses_lookup() {
		let identity = FakeIdentityApi::with_existing_role(
			"demoRole",
			"arn:aws:iam::123456789012:role/demoRole",
		);
		let p = provisioner(identity, FakeFunctionApi::default());
		let arns = default_policy_arns();

		let first = p.ensure_identity("Demo", &arns).await.unwrap();
		let second = p.ensure_identity("Demo", &arns).await.unwrap();

		assert!(!first.was_created());
		assert!(!second.was_created());
		assert_eq!(first.value().arn, second.value().arn);

		let state = p.identity.state.lock().unwrap();
		assert_eq!(state.get_calls, 2, "both resolutions must use lookup");
		assert_eq!(
			state.create_attempts, 2,
			"each resolution issues exactly one create attempt"
		);
		assert!(
			state.attached.is_empty(),
			"grants are never re-attached to existing identities"
		);
	}

	/// Test: a non-conflict identity failure aborts the flow.
	#[tokio::test]
	async fn test_identity_failure_propagates() {
		struct FailingIdentityApi;

		#[async_trait]
		impl IdentityApi for FailingIdentityApi {
			async fn create_role(
				&self,
				_role_name: &str,
				_trust_policy: &str,
			) -> Result<RoleHandle, IdentityApiError> {
				Err(IdentityApiError::Provider("access denied".to_string()))
			}

			async fn get_role(&self, _role_name: &str) -> Result<RoleHandle, IdentityApiError> {
				unreachable!("lookup must not run after a non-conflict failure")
			}

			async fn attach_role_policy(
				&self,
				_role_name: &str,
				_policy_arn: &str,
			) -> Result<(), IdentityApiError> {
				unreachable!()
			}
		}

		let p = FunctionProvisioner::new(FailingIdentityApi, FakeFunctionApi::default())
			.with_propagation_delay(Duration::ZERO);

		let err = p
			.create_or_update(&DeploySpec::new("Demo", "print('hi')"))
			.await
			.unwrap_err();
		assert!(matches!(err, DeployError::Identity(_)));
	}

	/// Test: an absent function takes the create path with publish and the
	/// clamped timeout.
	#[tokio::test]
	async fn test_create_path_submits_full_configuration() {
		let p = provisioner(FakeIdentityApi::default(), FakeFunctionApi::default());
		let spec = DeploySpec::new("Demo", "print('hi')\n").with_timeout_secs(5000);

		let ensured = p.create_or_update(&spec).await.unwrap();

		assert!(ensured.was_created());
		assert_eq!(ensured.value().version.as_deref(), Some("1"));

		let state = p.functions.state.lock().unwrap();
		assert_eq!(state.creates.len(), 1);
		assert!(state.updates.is_empty());

		let request = &state.creates[0];
		assert_eq!(request.runtime, "python3.8");
		assert_eq!(request.handler, "lambda_function.lambda_handler");
		assert_eq!(request.role_arn, "arn:aws:iam::123456789012:role/demoRole");
		assert!(request.publish);
		assert_eq!(request.timeout_secs, MAX_FUNCTION_TIMEOUT_SECS);
		assert!(!request.archive.is_empty());
	}

	/// Test: a timeout below the ceiling is passed through unclamped.
	#[tokio::test]
	async fn test_timeout_below_ceiling_is_kept() {
		let p = provisioner(FakeIdentityApi::default(), FakeFunctionApi::default());
		let spec = DeploySpec::new("Demo", "print('hi')\n").with_timeout_secs(30);

		p.create_or_update(&spec).await.unwrap();

		let state = p.functions.state.lock().unwrap();
		assert_eq!(state.creates[0].timeout_secs, 30);
	}

	/// Test: an existing function takes the update path, which submits only
	/// new code.
	///
	/// Why this test is important: the update contract is that
	/// configuration fields are not re-applied. The capability interface
	/// makes this structural — update_function_code carries no runtime,
	/// handler, or timeout — so the assertion is that the create path was
	/// never taken.
	#[tokio::test]
	async fn test_update_path_submits_code_only() {
		let p = provisioner(
			FakeIdentityApi::default(),
			FakeFunctionApi::with_existing_function("Demo"),
		);

		let ensured = p
			.create_or_update(&DeploySpec::new("Demo", "print('v2')\n"))
			.await
			.unwrap();

		assert!(!ensured.was_created());
		assert_eq!(ensured.value().version.as_deref(), Some("2"));

		let state = p.functions.state.lock().unwrap();
		assert!(state.creates.is_empty(), "create must not run");
		assert_eq!(state.updates.len(), 1);
		let (name, archive, publish) = &state.updates[0];
		assert_eq!(name, "Demo");
		assert!(*publish);
		assert!(!archive.is_empty());
	}

	/// Test: losing a create race falls back to the update path.
	#[tokio::test]
	async fn test_create_conflict_falls_back_to_update() {
		let mut functions = FakeFunctionApi::with_existing_function("Demo");
		functions.hide_from_get = true;

		let p = provisioner(FakeIdentityApi::default(), functions);
		let ensured = p
			.create_or_update(&DeploySpec::new("Demo", "print('hi')\n"))
			.await
			.unwrap();

		assert!(!ensured.was_created());

		let state = p.functions.state.lock().unwrap();
		assert!(state.creates.is_empty());
		assert_eq!(state.updates.len(), 1);
	}

	/// Test: the propagation delay elapses between identity resolution and
	/// the deployment calls.
	#[tokio::test(start_paused = true)]
	async fn test_propagation_delay_is_waited() {
		let p = FunctionProvisioner::new(FakeIdentityApi::default(), FakeFunctionApi::default());

		let before = tokio::time::Instant::now();
		p.create_or_update(&DeploySpec::new("Demo", "print('hi')\n"))
			.await
			.unwrap();

		assert!(before.elapsed() >= DEFAULT_PROPAGATION_DELAY);
	}
}
