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

//! Dry-run client that replays recorded `DryRunApi` results.
//!
//! Recordings are JSON files with the results of `dry_run_call` and `dry_run_xcm`, in
//! the layout that `polkadot-api` returns them:
//!
//! ```json
//! [
//!   {
//!     "chain": "westend",
//!     "calls": [{ "origin": { "type": "Root" }, "call": "0x0a0300", "result": { "success": false, "value": {} } }],
//!     "xcms": [{ "result": { "success": false, "value": {} } }]
//!   }
//! ]
//! ```
//!
//! Missing `origin`, `call` and `message` fields match anything.

use crate::{
	client::{ClientError, ClientRegistry, DryRunClient},
	error::{Error, Result},
	LOG_TARGET,
};

use async_trait::async_trait;
use bp_xcm_hops::{Chain, EncodedCall, Origin, SimulationResult, VersionedLocation, XcmMessage};
use serde::{Deserialize, Serialize};
use std::{path::Path, sync::Arc};

/// Recorded result of `dry_run_call`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordedCall {
	/// Origin of the call. `None` matches any origin.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub origin: Option<Origin>,
	/// The call. `None` matches any call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub call: Option<EncodedCall>,
	/// Recorded result.
	pub result: SimulationResult,
}

impl RecordedCall {
	fn matches(&self, origin: &Origin, call: &EncodedCall) -> bool {
		self.origin.as_ref().map_or(true, |expected| expected == origin) &&
			self.call.as_ref().map_or(true, |expected| expected == call)
	}
}

/// Recorded result of `dry_run_xcm`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordedXcm {
	/// Location of the sender. `None` matches any sender. Versions are ignored.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub origin: Option<VersionedLocation>,
	/// The message. `None` matches any message.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<XcmMessage>,
	/// Recorded result.
	pub result: SimulationResult,
}

impl RecordedXcm {
	fn matches(&self, origin: &VersionedLocation, message: &XcmMessage) -> bool {
		self.origin.as_ref().map_or(true, |expected| expected.structurally_eq(origin)) &&
			self.message.as_ref().map_or(true, |expected| expected == message)
	}
}

/// Recorded results of a single chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainRecording {
	/// The chain.
	pub chain: Chain,
	/// Recorded call dry-runs, matched in order.
	#[serde(default)]
	pub calls: Vec<RecordedCall>,
	/// Recorded message dry-runs, matched in order.
	#[serde(default)]
	pub xcms: Vec<RecordedXcm>,
}

/// Contents of the recording file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimulationRecording(pub Vec<ChainRecording>);

impl SimulationRecording {
	/// Read recording from the JSON file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path)
			.map_err(|error| Error::Io { path: path.into(), error })?;
		let recording = Self::from_json(&contents)?;
		tracing::debug!(target: LOG_TARGET, ?path, chains = recording.0.len(), "Loaded recording");
		Ok(recording)
	}

	/// Parse recording from the JSON string.
	pub fn from_json(contents: &str) -> Result<Self> {
		Ok(serde_json::from_str(contents)?)
	}

	/// Registry with replaying clients of all recorded chains.
	///
	/// Recordings of the same chain are merged.
	pub fn into_registry(self) -> ClientRegistry {
		let mut clients: Vec<RecordedClient> = Vec::new();
		for recording in self.0 {
			match clients.iter_mut().find(|client| client.recording.chain == recording.chain) {
				Some(client) => {
					client.recording.calls.extend(recording.calls);
					client.recording.xcms.extend(recording.xcms);
				},
				None => clients.push(RecordedClient::new(recording)),
			}
		}

		clients.into_iter().fold(ClientRegistry::new(), |registry, client| {
			registry.with_client(client.recording.chain, Arc::new(client))
		})
	}
}

/// Client that answers with the first matching recorded result.
#[derive(Clone, Debug)]
pub struct RecordedClient {
	recording: ChainRecording,
}

impl RecordedClient {
	/// Create client, replaying the given recording.
	pub fn new(recording: ChainRecording) -> Self {
		RecordedClient { recording }
	}
}

#[async_trait]
impl DryRunClient for RecordedClient {
	async fn dry_run_call(
		&self,
		origin: &Origin,
		call: &EncodedCall,
	) -> std::result::Result<SimulationResult, ClientError> {
		let chain = self.recording.chain;
		let recorded = self
			.recording
			.calls
			.iter()
			.find(|recorded| recorded.matches(origin, call))
			.ok_or_else(|| format!("{chain} has no recorded dry-run of {call} from {origin}"))?;
		tracing::trace!(target: LOG_TARGET, %chain, %origin, %call, "Replaying recorded call");
		Ok(recorded.result.clone())
	}

	async fn dry_run_xcm(
		&self,
		origin: &VersionedLocation,
		message: &XcmMessage,
	) -> std::result::Result<SimulationResult, ClientError> {
		let chain = self.recording.chain;
		let recorded = self
			.recording
			.xcms
			.iter()
			.find(|recorded| recorded.matches(origin, message))
			.ok_or_else(|| format!("{chain} has no recorded dry-run of {message:?} from {origin}"))?;
		tracing::trace!(target: LOG_TARGET, %chain, %origin, "Replaying recorded message");
		Ok(recorded.result.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;
	use bp_xcm_hops::Location;
	use serde_json::json;
	use std::io::Write;

	fn failure(reason: &str) -> serde_json::Value {
		json!({ "success": false, "value": { "type": reason } })
	}

	fn recording() -> SimulationRecording {
		SimulationRecording::from_json(
			&json!([
				{
					"chain": "kusama",
					"calls": [
						{ "origin": { "type": "Root" }, "call": "0x0a03", "result": failure("First") },
						{ "call": "0x0a03", "result": failure("AnyOrigin") }
					]
				},
				{
					"chain": "kusamaAssetHub",
					"xcms": [
						{
							"origin": { "type": "V3", "value": { "parents": 1, "interior": { "type": "Here" } } },
							"message": "0x0401",
							"result": failure("FromRelay")
						},
						{ "result": failure("Anything") }
					]
				},
				{
					"chain": "kusama",
					"xcms": [{ "result": failure("Merged") }]
				}
			])
			.to_string(),
		)
		.unwrap()
	}

	#[tokio::test]
	async fn first_matching_call_is_replayed() {
		let registry = recording().into_registry();
		let relay = registry.client(Chain::Kusama).unwrap();
		let call = EncodedCall(vec![0x0a, 0x03]);

		assert_eq!(
			relay.dry_run_call(&Origin::Root, &call).await.unwrap(),
			SimulationResult::Failure(json!({ "type": "First" }))
		);
		assert_eq!(
			relay.dry_run_call(&Origin::None, &call).await.unwrap(),
			SimulationResult::Failure(json!({ "type": "AnyOrigin" }))
		);
		assert!(relay.dry_run_call(&Origin::Root, &EncodedCall(vec![0x0b, 0x00])).await.is_err());
		assert_eq!(
			relay.dry_run_xcm(&VersionedLocation::V4(Location::here()), &XcmMessage(vec![4])).await.unwrap(),
			SimulationResult::Failure(json!({ "type": "Merged" }))
		);
	}

	#[tokio::test]
	async fn recorded_xcm_sender_ignores_version() {
		let registry = recording().into_registry();
		let asset_hub = registry.client(Chain::KusamaAssetHub).unwrap();

		assert_eq!(
			asset_hub
				.dry_run_xcm(&VersionedLocation::V5(Location::parent()), &XcmMessage(vec![4, 1]))
				.await
				.unwrap(),
			SimulationResult::Failure(json!({ "type": "FromRelay" }))
		);
		assert_eq!(
			asset_hub
				.dry_run_xcm(&VersionedLocation::V5(Location::parent()), &XcmMessage(vec![4, 2]))
				.await
				.unwrap(),
			SimulationResult::Failure(json!({ "type": "Anything" }))
		);
	}

	#[test]
	fn unknown_chains_are_not_registered() {
		assert_matches!(
			recording().into_registry().client(Chain::Polkadot).err(),
			Some(Error::MissingClient(Chain::Polkadot))
		);
	}

	#[test]
	fn recording_is_read_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(serde_json::to_string(&recording()).unwrap().as_bytes()).unwrap();
		assert_eq!(SimulationRecording::load(file.path()).unwrap(), recording());

		assert_matches!(SimulationRecording::from_json("{}"), Err(Error::Recording(_)));
	}
}
