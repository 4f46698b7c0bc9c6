// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Slipway CLI - idempotent repository and function provisioning.
//!
//! Two independent workflows share one shape: ensure a named remote
//! resource exists, prepare a payload, submit it, report the result.
//! `repo` drives the repository-hosting workflow end to end; `function
//! package` builds the deployable archive locally (deploying it requires a
//! provider control-plane binding, which is a library concern).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use slipway_deploy::{CodePackage, Handler, DEFAULT_HANDLER, DEFAULT_RUNTIME};
use slipway_git::CommandGitClient;
use slipway_github::{GithubClient, GithubConfig, RepositorySpec};
use slipway_repo::{PublishSpec, RepoProvisioner};

/// Slipway - push-button provisioning for repositories and functions
#[derive(Parser, Debug)]
#[command(name = "slipway", version, about, long_about = None)]
struct Args {
	/// Log level (overridden by SLIPWAY_LOG)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Repository provisioning
	#[command(subcommand)]
	Repo(RepoCommand),

	/// Function provisioning
	#[command(subcommand)]
	Function(FunctionCommand),
}

#[derive(Subcommand, Debug)]
enum RepoCommand {
	/// Ensure the remote repository exists
	Create {
		/// Repository name
		#[arg(long)]
		name: String,

		/// Repository description
		#[arg(long, default_value = "")]
		description: String,

		/// Create a private repository
		#[arg(long)]
		private: bool,
	},

	/// Ensure the remote repository exists and push a source file into it
	Publish {
		/// Repository name
		#[arg(long)]
		name: String,

		/// Repository description
		#[arg(long, default_value = "")]
		description: String,

		/// Local source file to publish
		#[arg(long)]
		source: PathBuf,

		/// Staging directory (must not exist; removed on exit)
		#[arg(long)]
		staging_dir: Option<PathBuf>,

		/// Branch to push
		#[arg(long, default_value = "master")]
		branch: String,
	},
}

#[derive(Subcommand, Debug)]
enum FunctionCommand {
	/// Build the single-entry code archive a deploy would submit
	Package {
		/// Local source file to package
		#[arg(long)]
		source: PathBuf,

		/// Where to write the archive
		#[arg(long)]
		out: PathBuf,

		/// Entry-point handler reference (module.function)
		#[arg(long, default_value = DEFAULT_HANDLER)]
		handler: String,

		/// Runtime identifier
		#[arg(long, default_value = DEFAULT_RUNTIME)]
		runtime: String,
	},
}

#[tokio::main]
async fn main() -> Result<()> {
	let args = Args::parse();

	let filter = EnvFilter::try_from_env("SLIPWAY_LOG")
		.unwrap_or_else(|_| EnvFilter::new(&args.log_level));
	tracing_subscriber::fmt().with_env_filter(filter).init();

	match args.command {
		Command::Repo(cmd) => run_repo(cmd).await,
		Command::Function(cmd) => run_function(cmd).await,
	}
}

fn repo_provisioner() -> Result<RepoProvisioner<CommandGitClient>> {
	let config = GithubConfig::from_env().context("GitHub configuration")?;
	Ok(RepoProvisioner::new(
		GithubClient::new(config),
		CommandGitClient::new(),
	))
}

async fn run_repo(cmd: RepoCommand) -> Result<()> {
	match cmd {
		RepoCommand::Create {
			name,
			description,
			private,
		} => {
			let provisioner = repo_provisioner()?;
			let spec = RepositorySpec::new(&name)
				.with_description(description)
				.private(private);

			let ensured = provisioner.ensure_repository(&spec).await?;
			println!("{}", ensured.value().clone_url);
			Ok(())
		}
		RepoCommand::Publish {
			name,
			description,
			source,
			staging_dir,
			branch,
		} => {
			let provisioner = repo_provisioner()?;
			let spec = RepositorySpec::new(&name).with_description(description);

			let repo = provisioner.ensure_repository(&spec).await?.into_value();

			let staging_dir = staging_dir
				.unwrap_or_else(|| std::env::temp_dir().join(format!("slipway-publish-{name}")));
			let publish = PublishSpec::new(&repo.clone_url, source, staging_dir).with_branch(branch);

			provisioner.publish(&publish).await?;
			info!(repo = %repo.full_name, "published");
			println!("{}", repo.html_url);
			Ok(())
		}
	}
}

async fn run_function(cmd: FunctionCommand) -> Result<()> {
	match cmd {
		FunctionCommand::Package {
			source,
			out,
			handler,
			runtime,
		} => {
			let handler = Handler::parse(&handler)?;
			let text = tokio::fs::read_to_string(&source)
				.await
				.with_context(|| format!("reading {}", source.display()))?;

			let package = CodePackage::build(&text, &handler, &runtime)?;
			tokio::fs::write(&out, package.bytes())
				.await
				.with_context(|| format!("writing {}", out.display()))?;

			println!("{} ({} bytes)", package.entry_name(), package.bytes().len());
			Ok(())
		}
	}
}
