// Copyright (C) Parity Technologies (UK) Ltd.
// This file is part of Parity Bridges Common.

// Parity Bridges Common is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity Bridges Common is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity Bridges Common.  If not, see <http://www.gnu.org/licenses/>.

//! Command line interface.

use anyhow::Context;
use bp_xcm_hops::{Chain, Origin};
use clap::{Args, Parser, Subcommand};
use relay_xcm_hops::{
	DryRunRequest, Error, HopOrchestrator, Interrupted, SimulationRecording, XcmHopsConfig,
	LOG_TARGET,
};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Exit code of a failed run, caused by a request that may be fixed by the user.
pub const EXIT_INPUT_ERROR: i32 = 2;
/// Exit code of any other failed run.
pub const EXIT_FAILURE: i32 = 1;

/// Dry-run a call and follow every XCM message it sends to the other system chains.
#[derive(Debug, Parser)]
#[command(name = "xcm-hops", version, rename_all = "kebab-case")]
pub struct XcmHops {
	#[command(subcommand)]
	pub command: Command,
	/// Log without timestamps.
	#[arg(long, global = true)]
	pub no_timestamps: bool,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab-case")]
pub enum Command {
	/// Dry-run a call and every XCM message it sends to the known chains.
	DryRun(DryRunCmd),
	/// Print the shareable link of a dry-run request.
	Link(LinkCmd),
	/// List routes between the known chains.
	Routes(RoutesCmd),
}

impl Command {
	/// Run the command.
	pub async fn run(self) -> anyhow::Result<()> {
		match self {
			Command::DryRun(cmd) => cmd.run().await,
			Command::Link(cmd) => cmd.run(),
			Command::Routes(cmd) => cmd.run(),
		}
	}
}

/// The request, given piece by piece.
#[derive(Args, Debug, Clone)]
pub struct RequestParams {
	/// Chain where the call is dispatched, e.g. `westend` or `polkadotAssetHub`.
	#[arg(long)]
	pub chain: Option<Chain>,
	/// Origin of the call: `root`, `none`, `signed` or the name of a governance origin.
	#[arg(long, default_value = "root")]
	pub origin: String,
	/// Address of the account, for the `signed` origin.
	#[arg(long)]
	pub account: Option<String>,
	/// Hex-encoded call.
	#[arg(long)]
	pub call: Option<String>,
}

impl RequestParams {
	fn to_request(&self) -> anyhow::Result<DryRunRequest> {
		let chain = self.chain.context("--chain is required")?;
		let call = self.call.clone().context("--call is required")?;
		let origin =
			Origin::from_parts(&self.origin, self.account.as_deref()).map_err(Error::from)?;
		Ok(DryRunRequest { chain, origin, call })
	}
}

/// Dry-run the call and all messages it sends.
#[derive(Args, Debug)]
pub struct DryRunCmd {
	#[command(flatten)]
	pub request: RequestParams,
	/// Shared link (or its query) instead of the separate request arguments.
	#[arg(long, conflicts_with_all = ["chain", "account", "call"], required_unless_present_all = ["chain", "call"])]
	pub link: Option<String>,
	/// JSON file with recorded dry-run results.
	#[arg(long, env = "XCM_HOPS_RECORDING")]
	pub recording: PathBuf,
	/// TOML file with orchestrator limits and extra routes.
	#[arg(long, env = "XCM_HOPS_CONFIG")]
	pub config: Option<PathBuf>,
}

impl DryRunCmd {
	fn to_request(&self) -> anyhow::Result<DryRunRequest> {
		match self.link {
			Some(ref link) => Ok(DryRunRequest::from_query(link)?),
			None => self.request.to_request(),
		}
	}

	async fn run(self) -> anyhow::Result<()> {
		let request = self.to_request()?;
		let config = load_config(self.config.as_deref())?;
		let clients = SimulationRecording::load(&self.recording)
			.with_context(|| format!("Failed to load recording {:?}", self.recording))?
			.into_registry();
		let orchestrator = HopOrchestrator::new(config.routing_table()?, clients.clone())
			.with_config(config.orchestrator);

		let result = orchestrator
			.dry_run_with(&request, |hop| {
				tracing::info!(
					target: LOG_TARGET,
					chain = %hop.chain,
					origin = %hop.origin,
					success = hop.result.is_success(),
					"Dry-run hop",
				);
			})
			.await;
		clients.shutdown().await;

		match result {
			Ok(report) => {
				println!("{}", serde_json::to_string_pretty(&report)?);
				Ok(())
			},
			Err(interrupted) => {
				println!("{}", serde_json::to_string_pretty(&interrupted_report(&interrupted))?);
				Err(interrupted.error.into())
			},
		}
	}
}

/// Print the shareable link of the request.
#[derive(Args, Debug)]
pub struct LinkCmd {
	#[command(flatten)]
	pub request: RequestParams,
	/// URL to prepend to the query.
	#[arg(long)]
	pub base_url: Option<String>,
}

impl LinkCmd {
	fn link(&self) -> anyhow::Result<String> {
		let query = self.request.to_request()?.to_query();
		Ok(match self.base_url {
			Some(ref base_url) => format!("{}?{query}", base_url.trim_end_matches('?')),
			None => query,
		})
	}

	fn run(self) -> anyhow::Result<()> {
		println!("{}", self.link()?);
		Ok(())
	}
}

/// List routes between chains.
#[derive(Args, Debug)]
pub struct RoutesCmd {
	/// Only list routes, leaving this chain.
	#[arg(long)]
	pub chain: Option<Chain>,
	/// TOML file with extra routes.
	#[arg(long, env = "XCM_HOPS_CONFIG")]
	pub config: Option<PathBuf>,
}

impl RoutesCmd {
	fn run(self) -> anyhow::Result<()> {
		let table = load_config(self.config.as_deref())?.routing_table()?;
		let edges = table
			.edges()
			.iter()
			.filter(|edge| self.chain.map_or(true, |chain| edge.from == chain))
			.collect::<Vec<_>>();
		println!("{}", serde_json::to_string_pretty(&edges)?);
		Ok(())
	}
}

/// Hops, dry-run before the error, with the error itself.
fn interrupted_report(interrupted: &Interrupted) -> serde_json::Value {
	json!({ "hops": interrupted.hops, "error": interrupted.error.to_string() })
}

/// Exit code for the error of a failed run.
pub fn exit_code(error: &anyhow::Error) -> i32 {
	let is_input_error = error
		.chain()
		.find_map(|cause| cause.downcast_ref::<Error>())
		.map_or(false, Error::is_input_error);
	if is_input_error {
		EXIT_INPUT_ERROR
	} else {
		EXIT_FAILURE
	}
}

fn load_config(path: Option<&Path>) -> anyhow::Result<XcmHopsConfig> {
	match path {
		Some(path) => XcmHopsConfig::load(path)
			.with_context(|| format!("Failed to load configuration {path:?}")),
		None => Ok(XcmHopsConfig::default()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const ALICE: &str = "5GrwvaEF5zXb26Fz9rcQpDWS57CtERHpNehXCPcNoHGKutQY";

	fn parse(args: &[&str]) -> Result<XcmHops, clap::Error> {
		XcmHops::try_parse_from(std::iter::once("xcm-hops").chain(args.iter().copied()))
	}

	#[test]
	fn dry_run_accepts_separate_arguments() {
		let XcmHops { command: Command::DryRun(cmd), no_timestamps: false } = parse(&[
			"dry-run",
			"--chain",
			"westendAssetHub",
			"--origin",
			"signed",
			"--account",
			ALICE,
			"--call",
			"0x0a0300",
			"--recording",
			"recording.json",
		])
		.unwrap() else {
			panic!("expected dry-run command")
		};

		assert_eq!(
			cmd.to_request().unwrap(),
			DryRunRequest {
				chain: Chain::WestendAssetHub,
				origin: Origin::Signed(ALICE.parse().unwrap()),
				call: "0x0a0300".into(),
			}
		);
		assert_eq!(cmd.recording, PathBuf::from("recording.json"));
	}

	#[test]
	fn dry_run_accepts_link() {
		let XcmHops { command: Command::DryRun(cmd), .. } = parse(&[
			"dry-run",
			"--link",
			"https://dry-run.example/?chain=kusama&origin=root&call=0x00",
			"--recording",
			"recording.json",
			"--no-timestamps",
		])
		.unwrap() else {
			panic!("expected dry-run command")
		};

		assert_eq!(cmd.to_request().unwrap().chain, Chain::Kusama);
	}

	#[test]
	fn dry_run_requires_the_request() {
		assert!(parse(&["dry-run", "--chain", "kusama", "--recording", "r.json"]).is_err());
		assert!(parse(&[
			"dry-run",
			"--link",
			"chain=kusama&origin=root&call=0x00",
			"--call",
			"0x00",
			"--recording",
			"r.json"
		])
		.is_err());
		assert!(parse(&["dry-run", "--chain", "rococo", "--call", "0x00", "--recording", "r.json"])
			.is_err());
	}

	#[test]
	fn input_errors_have_own_exit_code() {
		let XcmHops { command: Command::Link(cmd), .. } =
			parse(&["link", "--chain", "kusama", "--origin", "signed", "--call", "0x00"])
				.unwrap()
		else {
			panic!("expected link command")
		};
		let error = cmd.link().unwrap_err();
		assert_eq!(exit_code(&error), EXIT_INPUT_ERROR);

		let link = anyhow::Error::from(Error::InvalidLink("`call` is missing".into()))
			.context("Failed to read the link");
		assert_eq!(exit_code(&link), EXIT_INPUT_ERROR);

		let missing = anyhow::Error::from(Error::MissingClient(Chain::Kusama));
		assert_eq!(exit_code(&missing), EXIT_FAILURE);
	}

	#[test]
	fn interrupted_run_prints_its_hops() {
		let interrupted = Interrupted {
			hops: Vec::new(),
			error: Error::RoutingCycleDetected { chain: Chain::Westend, hops: 8 },
		};
		assert_eq!(
			interrupted_report(&interrupted),
			json!({ "hops": [], "error": "Routing cycle detected at westend after 8 hops" })
		);
	}

	#[test]
	fn every_command_is_documented() {
		use clap::CommandFactory;

		let command = XcmHops::command();
		for name in ["dry-run", "link", "routes"] {
			let subcommand = command.find_subcommand(name).unwrap();
			assert!(subcommand.get_about().is_some(), "`{name}` has no description");
		}
	}

	#[test]
	fn link_is_built_from_arguments() {
		let XcmHops { command: Command::Link(cmd), .. } = parse(&[
			"link",
			"--chain",
			"polkadot",
			"--origin",
			"WhitelistedCaller",
			"--call",
			"0x0a0300",
			"--base-url",
			"https://dry-run.example/",
		])
		.unwrap() else {
			panic!("expected link command")
		};

		assert_eq!(
			cmd.link().unwrap(),
			"https://dry-run.example/?chain=polkadot&origin=WhitelistedCaller&call=0x0a0300"
		);
	}
}
