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

//! Effects of dry-running a call or a message, as reported by the `DryRunApi` of a
//! chain runtime.
//!
//! The JSON layout follows what `polkadot-api` returns from `dry_run_call` and
//! `dry_run_xcm`, so results may be recorded from a live chain and replayed later.

use crate::{
	chain::Chain,
	location::{VersionedLocation, XcmVersion},
	origin::Origin,
};

use codec::Decode;
use serde::{
	de::Error as _, ser::SerializeStruct, Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

/// Names of the XCM pallet in the runtime event log. Relay chains call it `XcmPallet`,
/// system parachains call it `PolkadotXcm`.
pub const XCM_PALLET_NAMES: [&str; 2] = ["XcmPallet", "PolkadotXcm"];

/// Name of the XCM pallet event, deposited when a message has been sent.
pub const XCM_SENT_EVENT: &str = "Sent";

/// SCALE-encoded runtime call.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncodedCall(#[serde(with = "crate::hex_serde")] pub Vec<u8>);

impl EncodedCall {
	/// Pallet and call indices, the first two bytes of every encoded runtime call.
	pub fn indices(&self) -> Option<(u8, u8)> {
		<(u8, u8)>::decode(&mut &self.0[..]).ok()
	}
}

impl fmt::Debug for EncodedCall {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "EncodedCall(0x{})", hex::encode(&self.0))
	}
}

impl fmt::Display for EncodedCall {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{}", hex::encode(&self.0))
	}
}

/// SCALE-encoded versioned XCM message.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XcmMessage(#[serde(with = "crate::hex_serde")] pub Vec<u8>);

impl XcmMessage {
	/// XCM version of the message, read from the `VersionedXcm` variant index.
	pub fn version(&self) -> Option<XcmVersion> {
		u8::decode(&mut &self.0[..]).ok().map(Into::into)
	}
}

impl fmt::Debug for XcmMessage {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "XcmMessage(0x{})", hex::encode(&self.0))
	}
}

/// Event, emitted by the runtime during the dry-run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaggedEvent", into = "TaggedEvent")]
pub struct RuntimeEvent {
	/// Name of the pallet that has deposited the event.
	pub pallet: String,
	/// Event variant.
	pub variant: String,
	/// Event fields, left undecoded.
	pub fields: serde_json::Value,
}

impl RuntimeEvent {
	/// Returns `true` if this is the XCM pallet `Sent` event.
	pub fn is_xcm_sent(&self) -> bool {
		XCM_PALLET_NAMES.contains(&self.pallet.as_str()) && self.variant == XCM_SENT_EVENT
	}

	/// Destination of the XCM pallet `Sent` event.
	///
	/// Returns `None` for other events and for `Sent` events without a readable
	/// destination.
	pub fn xcm_sent_destination(&self) -> Option<VersionedLocation> {
		if !self.is_xcm_sent() {
			return None
		}

		let destination = self.fields.get("destination")?;
		VersionedLocation::deserialize(destination).ok()
	}
}

#[derive(Serialize, Deserialize)]
struct TaggedEvent {
	#[serde(rename = "type")]
	pallet: String,
	value: TaggedVariant,
}

#[derive(Serialize, Deserialize)]
struct TaggedVariant {
	#[serde(rename = "type")]
	variant: String,
	#[serde(default)]
	value: serde_json::Value,
}

impl From<TaggedEvent> for RuntimeEvent {
	fn from(event: TaggedEvent) -> Self {
		RuntimeEvent { pallet: event.pallet, variant: event.value.variant, fields: event.value.value }
	}
}

impl From<RuntimeEvent> for TaggedEvent {
	fn from(event: RuntimeEvent) -> Self {
		TaggedEvent {
			pallet: event.pallet,
			value: TaggedVariant { variant: event.variant, value: event.fields },
		}
	}
}

/// Messages, queued for delivery to the same destination.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
	from = "(VersionedLocation, Vec<XcmMessage>)",
	into = "(VersionedLocation, Vec<XcmMessage>)"
)]
pub struct ForwardedXcms {
	/// Destination, relative to the chain that has queued the messages.
	pub destination: VersionedLocation,
	/// Queued messages, in order.
	pub messages: Vec<XcmMessage>,
}

impl From<(VersionedLocation, Vec<XcmMessage>)> for ForwardedXcms {
	fn from((destination, messages): (VersionedLocation, Vec<XcmMessage>)) -> Self {
		ForwardedXcms { destination, messages }
	}
}

impl From<ForwardedXcms> for (VersionedLocation, Vec<XcmMessage>) {
	fn from(forwarded: ForwardedXcms) -> Self {
		(forwarded.destination, forwarded.messages)
	}
}

/// Effects of a successful dry-run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DryRunEffects {
	/// Result of the call or message execution, left undecoded.
	pub execution_result: serde_json::Value,
	/// Events, emitted during execution.
	#[serde(default)]
	pub emitted_events: Vec<RuntimeEvent>,
	/// Messages, queued for delivery to other chains.
	#[serde(default)]
	pub forwarded_xcms: Vec<ForwardedXcms>,
}

/// Outcome of dry-running a call or a message at some chain.
#[derive(Clone, Debug, PartialEq)]
pub enum SimulationResult {
	/// The dry-run API has executed the call or message.
	Success(DryRunEffects),
	/// The dry-run API has rejected the call or message.
	Failure(serde_json::Value),
}

impl SimulationResult {
	/// Returns `true` if the dry-run has succeeded.
	pub fn is_success(&self) -> bool {
		matches!(self, SimulationResult::Success(_))
	}

	/// Effects of the successful dry-run.
	pub fn effects(&self) -> Option<&DryRunEffects> {
		match self {
			SimulationResult::Success(effects) => Some(effects),
			SimulationResult::Failure(_) => None,
		}
	}

	/// Messages, forwarded by the successful dry-run.
	pub fn forwarded_xcms(&self) -> &[ForwardedXcms] {
		self.effects().map(|effects| effects.forwarded_xcms.as_slice()).unwrap_or_default()
	}
}

impl Serialize for SimulationResult {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut state = serializer.serialize_struct("SimulationResult", 2)?;
		match self {
			SimulationResult::Success(effects) => {
				state.serialize_field("success", &true)?;
				state.serialize_field("value", effects)?;
			},
			SimulationResult::Failure(error) => {
				state.serialize_field("success", &false)?;
				state.serialize_field("value", error)?;
			},
		}
		state.end()
	}
}

impl<'de> Deserialize<'de> for SimulationResult {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		struct Raw {
			success: bool,
			#[serde(default)]
			value: serde_json::Value,
		}

		let raw = Raw::deserialize(deserializer)?;
		if raw.success {
			DryRunEffects::deserialize(raw.value)
				.map(SimulationResult::Success)
				.map_err(D::Error::custom)
		} else {
			Ok(SimulationResult::Failure(raw.value))
		}
	}
}

/// Origin, used to dry-run something at a hop.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum HopOrigin {
	/// Dispatch origin of the call, used at the first hop.
	Dispatch(Origin),
	/// Location of the previous chain, as seen from this chain. Used for forwarded messages.
	Xcm(VersionedLocation),
}

impl fmt::Display for HopOrigin {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			HopOrigin::Dispatch(origin) => write!(f, "{origin}"),
			HopOrigin::Xcm(location) => write!(f, "{location}"),
		}
	}
}

/// Dry-run at a single chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hop {
	/// The chain.
	pub chain: Chain,
	/// Origin of the dry-run.
	pub origin: HopOrigin,
	/// What has happened.
	pub result: SimulationResult,
}
