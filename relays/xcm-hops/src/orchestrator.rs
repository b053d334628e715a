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

//! Hop-by-hop traversal of a single dry-run request.
//!
//! The orchestrator has two states. While `Simulating`, exactly one chain dry-runs the
//! call (at the first hop) or the forwarded message (at all other hops). Every result is
//! appended to the hop list, and then either the next hop is found or the traversal is
//! `Done`.

use crate::{
	client::ClientRegistry,
	config::OrchestratorConfig,
	decoder::{CallDecoder, ScaleCallDecoder},
	disambiguator::select_onward_message,
	error::{Error, Interrupted, Result},
	request::DryRunRequest,
	routing::RoutingTable,
	LOG_TARGET,
};

use bp_xcm_hops::{
	Chain, EncodedCall, Hop, HopOrigin, Origin, SimulationResult, VersionedLocation, XcmMessage,
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt, sync::Arc};

/// Why the traversal has ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Termination {
	/// The last chain has rejected the call or the message.
	SimulationFailed,
	/// The last chain has not sent anything onwards.
	NoOnwardMessage,
	/// The last chain has sent the message outside of the known topology.
	UnroutableDestination(VersionedLocation),
}

impl fmt::Display for Termination {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Termination::SimulationFailed => f.write_str("simulation failed"),
			Termination::NoOnwardMessage => f.write_str("no onward message"),
			Termination::UnroutableDestination(destination) =>
				write!(f, "message sent to unroutable destination {destination}"),
		}
	}
}

/// Outcome of the dry-run request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DryRunReport {
	/// Dry-runs, in traversal order. The first hop is always at the requested chain.
	pub hops: Vec<Hop>,
	/// Why the traversal has ended.
	pub termination: Termination,
}

/// What is dry-run at a hop.
#[derive(Clone, Debug)]
enum HopInput {
	Call { origin: Origin, call: EncodedCall },
	Xcm { origin: VersionedLocation, message: XcmMessage },
}

impl HopInput {
	fn origin(&self) -> HopOrigin {
		match self {
			HopInput::Call { origin, .. } => HopOrigin::Dispatch(origin.clone()),
			HopInput::Xcm { origin, .. } => HopOrigin::Xcm(origin.clone()),
		}
	}

	fn payload(&self) -> &[u8] {
		match self {
			HopInput::Call { call, .. } => &call.0,
			HopInput::Xcm { message, .. } => &message.0,
		}
	}
}

enum State {
	Simulating { chain: Chain, input: HopInput },
	Done(Termination),
}

/// Dry-runs requests across the chains of the routing table.
#[derive(Clone)]
pub struct HopOrchestrator {
	routing: Arc<RoutingTable>,
	clients: ClientRegistry,
	decoder: Arc<dyn CallDecoder>,
	config: OrchestratorConfig,
}

impl HopOrchestrator {
	/// Create orchestrator with default decoder and limits.
	pub fn new(routing: RoutingTable, clients: ClientRegistry) -> Self {
		HopOrchestrator {
			routing: Arc::new(routing),
			clients,
			decoder: Arc::new(ScaleCallDecoder),
			config: OrchestratorConfig::default(),
		}
	}

	/// Use the given call decoder.
	pub fn with_decoder(mut self, decoder: impl CallDecoder + 'static) -> Self {
		self.decoder = Arc::new(decoder);
		self
	}

	/// Use the given limits.
	pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
		self.config = config;
		self
	}

	/// Dry-run the request.
	pub async fn dry_run(
		&self,
		request: &DryRunRequest,
	) -> std::result::Result<DryRunReport, Interrupted> {
		self.dry_run_with(request, |_| ()).await
	}

	/// Dry-run the request, calling `on_hop` every time a hop is appended to the report.
	///
	/// Nothing is dry-run if the call can not be decoded or the origin is not supported
	/// by the requested chain. If the dry-run stops with an error later, the error comes
	/// with all hops dry-run before it.
	pub async fn dry_run_with(
		&self,
		request: &DryRunRequest,
		mut on_hop: impl FnMut(&Hop) + Send,
	) -> std::result::Result<DryRunReport, Interrupted> {
		let call = self.decoder.decode_call(request.chain, &request.call).map_err(Error::from)?;
		if !request.origin.is_supported_by(request.chain) {
			return Err(Error::UnsupportedOrigin {
				chain: request.chain,
				origin: request.origin.clone(),
			}
			.into())
		}

		tracing::info!(
			target: LOG_TARGET,
			chain = %request.chain,
			origin = %request.origin,
			%call,
			"Starting dry-run",
		);

		let mut hops: Vec<Hop> = Vec::new();
		let mut visited = HashSet::new();
		let mut state = State::Simulating {
			chain: request.chain,
			input: HopInput::Call { origin: request.origin.clone(), call },
		};

		loop {
			let (chain, input) = match state {
				State::Simulating { chain, input } => (chain, input),
				State::Done(termination) => {
					tracing::info!(
						target: LOG_TARGET,
						hops = hops.len(),
						%termination,
						"Dry-run has completed",
					);
					return Ok(DryRunReport { hops, termination })
				},
			};

			let origin = input.origin();
			if hops.len() >= self.config.hop_limit ||
				!visited.insert((chain, origin.clone(), input.payload().to_vec()))
			{
				tracing::warn!(
					target: LOG_TARGET,
					%chain,
					%origin,
					hops = hops.len(),
					"Message keeps being forwarded. Stopping the dry-run",
				);
				let error = Error::RoutingCycleDetected { chain, hops: hops.len() };
				return Err(Interrupted { hops, error })
			}

			let result = match self.simulate(chain, &input).await {
				Ok(result) => result,
				Err(error) => return Err(Interrupted { hops, error }),
			};
			tracing::debug!(
				target: LOG_TARGET,
				%chain,
				%origin,
				success = result.is_success(),
				forwarded = result.forwarded_xcms().len(),
				"Dry-run hop",
			);

			state = self.next_state(chain, &result);
			hops.push(Hop { chain, origin, result });
			if let Some(hop) = hops.last() {
				on_hop(hop);
			}
		}
	}

	/// Dry-run the hop input at the given chain.
	async fn simulate(&self, chain: Chain, input: &HopInput) -> Result<SimulationResult> {
		let client = self.clients.client(chain)?;
		let simulation = async {
			match input {
				HopInput::Call { origin, call } => client.dry_run_call(origin, call).await,
				HopInput::Xcm { origin, message } => client.dry_run_xcm(origin, message).await,
			}
		};

		let result = match self.config.hop_timeout() {
			Some(timeout) => tokio::time::timeout(timeout, simulation)
				.await
				.map_err(|_| Error::HopTimeout { chain, timeout })?,
			None => simulation.await,
		};

		result.map_err(|error| Error::Client { chain, error })
	}

	/// Find what to dry-run after the given chain has produced the result.
	fn next_state(&self, chain: Chain, result: &SimulationResult) -> State {
		if !result.is_success() {
			return State::Done(Termination::SimulationFailed)
		}

		let Some(forwarded) = select_onward_message(result) else {
			return State::Done(Termination::NoOnwardMessage)
		};
		let Some((next, origin)) = self.routing.resolve(chain, &forwarded.destination) else {
			return State::Done(Termination::UnroutableDestination(forwarded.destination.clone()))
		};
		let Some(message) = forwarded.messages.first() else {
			return State::Done(Termination::NoOnwardMessage)
		};

		State::Simulating { chain: next, input: HopInput::Xcm { origin, message: message.clone() } }
	}
}

impl fmt::Debug for HopOrchestrator {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("HopOrchestrator")
			.field("edges", &self.routing.edges().len())
			.field("clients", &self.clients)
			.field("config", &self.config)
			.finish()
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;
	use crate::{client::ClientError, DecodeError, DryRunClient};
	use assert_matches::assert_matches;
	use async_trait::async_trait;
	use bp_xcm_hops::{DryRunEffects, GovernanceOrigin, Location, RuntimeEvent};
	use serde_json::json;
	use std::time::Duration;
	use tokio::sync::Mutex;

	pub const CALL: &str = "0x0a0300";

	/// Successful dry-run that has sent the message to the given destination.
	pub fn forwarding(
		chain: Chain,
		destination: VersionedLocation,
		message: XcmMessage,
	) -> SimulationResult {
		SimulationResult::Success(DryRunEffects {
			execution_result: json!({ "success": true }),
			emitted_events: vec![RuntimeEvent {
				pallet: chain.xcm_pallet_name().into(),
				variant: "Sent".into(),
				fields: json!({
					"origin": { "type": "V4", "value": { "parents": 0, "interior": { "type": "Here" } } },
					"destination": destination,
					"message": [],
					"message_id": "0x00",
				}),
			}],
			forwarded_xcms: vec![(destination, vec![message]).into()],
		})
	}

	/// Successful dry-run without any effects.
	pub fn quiet() -> SimulationResult {
		SimulationResult::Success(DryRunEffects {
			execution_result: json!({ "success": true }),
			emitted_events: Vec::new(),
			forwarded_xcms: Vec::new(),
		})
	}

	#[derive(Clone, Debug)]
	pub struct TestClient {
		pub data: Arc<Mutex<TestClientData>>,
	}

	#[derive(Debug)]
	pub struct TestClientData {
		pub call_result: std::result::Result<SimulationResult, String>,
		pub xcm_result: std::result::Result<SimulationResult, String>,
		pub hang: bool,
		pub calls: Vec<(Origin, EncodedCall)>,
		pub xcms: Vec<(VersionedLocation, XcmMessage)>,
	}

	impl TestClientData {
		pub fn minimal() -> Self {
			TestClientData {
				call_result: Ok(quiet()),
				xcm_result: Ok(quiet()),
				hang: false,
				calls: Vec::new(),
				xcms: Vec::new(),
			}
		}
	}

	impl From<TestClientData> for TestClient {
		fn from(data: TestClientData) -> TestClient {
			TestClient { data: Arc::new(Mutex::new(data)) }
		}
	}

	#[async_trait]
	impl DryRunClient for TestClient {
		async fn dry_run_call(
			&self,
			origin: &Origin,
			call: &EncodedCall,
		) -> std::result::Result<SimulationResult, ClientError> {
			let result = {
				let mut data = self.data.lock().await;
				data.calls.push((origin.clone(), call.clone()));
				if data.hang {
					None
				} else {
					Some(data.call_result.clone())
				}
			};
			match result {
				Some(result) => result.map_err(Into::into),
				None => futures::future::pending().await,
			}
		}

		async fn dry_run_xcm(
			&self,
			origin: &VersionedLocation,
			message: &XcmMessage,
		) -> std::result::Result<SimulationResult, ClientError> {
			let mut data = self.data.lock().await;
			data.xcms.push((origin.clone(), message.clone()));
			data.xcm_result.clone().map_err(Into::into)
		}
	}

	fn request(chain: Chain, origin: Origin) -> DryRunRequest {
		DryRunRequest { chain, origin, call: CALL.into() }
	}

	fn orchestrator(clients: Vec<(Chain, TestClient)>) -> HopOrchestrator {
		let registry = clients.into_iter().fold(ClientRegistry::new(), |registry, (chain, client)| {
			registry.with_client(chain, Arc::new(client))
		});
		HopOrchestrator::new(RoutingTable::system(), registry)
	}

	#[tokio::test]
	async fn failed_simulation_ends_after_first_hop() {
		let mut data = TestClientData::minimal();
		data.call_result = Ok(SimulationResult::Failure(json!({ "type": "BadOrigin" })));
		let report = orchestrator(vec![(Chain::Polkadot, data.into())])
			.dry_run(&request(Chain::Polkadot, Origin::Root))
			.await
			.unwrap();

		assert_eq!(report.hops.len(), 1);
		assert_eq!(report.hops[0].origin, HopOrigin::Dispatch(Origin::Root));
		assert_eq!(report.termination, Termination::SimulationFailed);
	}

	#[tokio::test]
	async fn nothing_forwarded_ends_after_first_hop() {
		let report = orchestrator(vec![(Chain::Kusama, TestClientData::minimal().into())])
			.dry_run(&request(Chain::Kusama, Origin::None))
			.await
			.unwrap();

		assert_eq!(report.hops.len(), 1);
		assert_eq!(report.hops[0].result, quiet());
		assert_eq!(report.termination, Termination::NoOnwardMessage);
	}

	#[tokio::test]
	async fn forwarded_message_is_dry_run_at_the_next_chain() {
		let message = XcmMessage(vec![4, 8, 1]);
		let mut relay = TestClientData::minimal();
		relay.call_result = Ok(forwarding(
			Chain::Westend,
			VersionedLocation::V4(Location::child_parachain(1000)),
			message.clone(),
		));
		let relay = TestClient::from(relay);
		let asset_hub = TestClient::from(TestClientData::minimal());

		let mut observed = Vec::new();
		let report = orchestrator(vec![
			(Chain::Westend, relay.clone()),
			(Chain::WestendAssetHub, asset_hub.clone()),
		])
		.dry_run_with(&request(Chain::Westend, Origin::Root), |hop| observed.push(hop.chain))
		.await
		.unwrap();

		assert_eq!(observed, vec![Chain::Westend, Chain::WestendAssetHub]);
		assert_eq!(report.hops.len(), 2);
		assert_eq!(report.hops[1].origin, HopOrigin::Xcm(VersionedLocation::V4(Location::parent())));
		assert_eq!(report.termination, Termination::NoOnwardMessage);

		assert_eq!(
			relay.data.lock().await.calls,
			vec![(Origin::Root, EncodedCall(vec![0x0a, 0x03, 0x00]))]
		);
		assert_eq!(
			asset_hub.data.lock().await.xcms,
			vec![(VersionedLocation::V4(Location::parent()), message)]
		);
	}

	#[tokio::test]
	async fn message_leaving_the_topology_ends_the_traversal() {
		let hydration = VersionedLocation::V4(Location::sibling_parachain(2034));
		let mut asset_hub = TestClientData::minimal();
		asset_hub.call_result =
			Ok(forwarding(Chain::PolkadotAssetHub, hydration.clone(), XcmMessage(vec![4])));

		let report = orchestrator(vec![(Chain::PolkadotAssetHub, asset_hub.into())])
			.dry_run(&request(Chain::PolkadotAssetHub, Origin::Root))
			.await
			.unwrap();

		assert_eq!(report.hops.len(), 1);
		assert_eq!(report.termination, Termination::UnroutableDestination(hydration));
	}

	#[tokio::test]
	async fn malformed_call_is_not_dry_run() {
		let relay = TestClient::from(TestClientData::minimal());
		let mut request = request(Chain::Westend, Origin::Root);
		request.call = "0xnothex".into();

		assert_matches!(
			orchestrator(vec![(Chain::Westend, relay.clone())]).dry_run(&request).await,
			Err(Interrupted { error: Error::Decode(DecodeError::InvalidHex(_)), hops })
				if hops.is_empty()
		);
		assert!(relay.data.lock().await.calls.is_empty());
	}

	#[tokio::test]
	async fn custom_decoder_is_used() {
		struct RejectingDecoder;

		impl CallDecoder for RejectingDecoder {
			fn decode_call(
				&self,
				_chain: Chain,
				_raw: &str,
			) -> std::result::Result<EncodedCall, DecodeError> {
				Err(DecodeError::Empty)
			}
		}

		let relay = TestClient::from(TestClientData::minimal());
		let orchestrator =
			orchestrator(vec![(Chain::Westend, relay.clone())]).with_decoder(RejectingDecoder);

		assert_matches!(
			orchestrator.dry_run(&request(Chain::Westend, Origin::Root)).await,
			Err(Interrupted { error: Error::Decode(DecodeError::Empty), .. })
		);
		assert!(relay.data.lock().await.calls.is_empty());
	}

	#[tokio::test]
	async fn governance_origin_is_rejected_by_parachains() {
		let asset_hub = TestClient::from(TestClientData::minimal());
		let origin = Origin::Governance(GovernanceOrigin::Treasurer);

		assert_matches!(
			orchestrator(vec![(Chain::KusamaAssetHub, asset_hub.clone())])
				.dry_run(&request(Chain::KusamaAssetHub, origin.clone()))
				.await,
			Err(Interrupted {
				error: Error::UnsupportedOrigin { chain: Chain::KusamaAssetHub, .. },
				..
			})
		);
		assert!(asset_hub.data.lock().await.calls.is_empty());

		let relay = TestClient::from(TestClientData::minimal());
		let report = orchestrator(vec![(Chain::Kusama, relay)])
			.dry_run(&request(Chain::Kusama, origin))
			.await
			.unwrap();
		assert_eq!(report.hops.len(), 1);
	}

	#[tokio::test]
	async fn message_bouncing_between_chains_is_detected() {
		let message = XcmMessage(vec![4, 42]);
		let mut relay = TestClientData::minimal();
		relay.call_result = Ok(forwarding(
			Chain::Westend,
			VersionedLocation::V4(Location::child_parachain(1000)),
			message.clone(),
		));
		relay.xcm_result = relay.call_result.clone();
		let mut asset_hub = TestClientData::minimal();
		asset_hub.xcm_result = Ok(forwarding(
			Chain::WestendAssetHub,
			VersionedLocation::V4(Location::parent()),
			message,
		));

		let interrupted = orchestrator(vec![
			(Chain::Westend, relay.into()),
			(Chain::WestendAssetHub, asset_hub.into()),
		])
		.dry_run(&request(Chain::Westend, Origin::Root))
		.await
		.unwrap_err();

		assert_matches!(
			interrupted.error,
			Error::RoutingCycleDetected { chain: Chain::WestendAssetHub, hops: 3 }
		);
		assert_eq!(
			interrupted.hops.iter().map(|hop| hop.chain).collect::<Vec<_>>(),
			vec![Chain::Westend, Chain::WestendAssetHub, Chain::Westend]
		);
		assert!(interrupted.hops.iter().all(|hop| hop.result.is_success()));
	}

	#[tokio::test]
	async fn hop_limit_is_respected() {
		let mut relay = TestClientData::minimal();
		relay.call_result = Ok(forwarding(
			Chain::Westend,
			VersionedLocation::V4(Location::child_parachain(1000)),
			XcmMessage(vec![4, 1]),
		));
		let mut asset_hub = TestClientData::minimal();
		asset_hub.xcm_result = Ok(forwarding(
			Chain::WestendAssetHub,
			VersionedLocation::V4(Location::parent()),
			XcmMessage(vec![4, 2]),
		));

		let orchestrator = orchestrator(vec![
			(Chain::Westend, relay.into()),
			(Chain::WestendAssetHub, asset_hub.into()),
		])
		.with_config(OrchestratorConfig { hop_limit: 2, ..Default::default() });

		assert_matches!(
			orchestrator.dry_run(&request(Chain::Westend, Origin::Root)).await,
			Err(Interrupted {
				error: Error::RoutingCycleDetected { chain: Chain::Westend, hops: 2 },
				hops,
			}) if hops.len() == 2
		);
	}

	#[tokio::test]
	async fn hung_client_times_out() {
		let mut relay = TestClientData::minimal();
		relay.hang = true;
		let orchestrator = orchestrator(vec![(Chain::Polkadot, relay.into())])
			.with_config(OrchestratorConfig { hop_limit: 8, hop_timeout_secs: Some(0) });

		assert_matches!(
			orchestrator.dry_run(&request(Chain::Polkadot, Origin::Root)).await,
			Err(Interrupted { error: Error::HopTimeout { chain: Chain::Polkadot, timeout }, hops })
				if timeout == Duration::ZERO && hops.is_empty()
		);
	}

	#[tokio::test]
	async fn client_failures_are_errors() {
		let mut relay = TestClientData::minimal();
		relay.call_result = Err("connection refused".into());

		assert_matches!(
			orchestrator(vec![(Chain::Polkadot, relay.into())])
				.dry_run(&request(Chain::Polkadot, Origin::Root))
				.await,
			Err(Interrupted { error: Error::Client { chain: Chain::Polkadot, .. }, .. })
		);
		assert_matches!(
			orchestrator(Vec::new()).dry_run(&request(Chain::Polkadot, Origin::Root)).await,
			Err(Interrupted { error: Error::MissingClient(Chain::Polkadot), .. })
		);
	}
}
