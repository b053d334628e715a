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

//! Selection of the message that continues the user operation at the next chain.
//!
//! A single dry-run may queue messages to several destinations. Only the destination
//! of the XCM pallet `Sent` event is the one that carries the user operation, so the
//! forwarded entries are correlated with that event instead of being taken in order.

use crate::LOG_TARGET;

use bp_xcm_hops::{ForwardedXcms, SimulationResult};

/// Select forwarded messages, matching the first XCM pallet `Sent` event.
///
/// Returns `None` if the dry-run has failed, if there is no `Sent` event, if nothing has
/// been forwarded to its destination or if the forwarded entry has no messages.
pub fn select_onward_message(result: &SimulationResult) -> Option<&ForwardedXcms> {
	let effects = result.effects()?;
	let destination = effects.emitted_events.iter().find_map(|event| {
		if !event.is_xcm_sent() {
			return None
		}

		let destination = event.xcm_sent_destination();
		if destination.is_none() {
			tracing::debug!(
				target: LOG_TARGET,
				pallet = %event.pallet,
				fields = %event.fields,
				"Ignoring sent event without readable destination",
			);
		}
		destination
	})?;

	let selected = effects
		.forwarded_xcms
		.iter()
		.find(|forwarded| forwarded.destination.structurally_eq(&destination))
		.filter(|forwarded| !forwarded.messages.is_empty());

	tracing::trace!(
		target: LOG_TARGET,
		%destination,
		forwarded = effects.forwarded_xcms.len(),
		selected = selected.is_some(),
		"Correlated sent event with forwarded messages",
	);

	selected
}

#[cfg(test)]
mod tests {
	use super::*;
	use bp_xcm_hops::{DryRunEffects, Location, RuntimeEvent, VersionedLocation, XcmMessage};
	use serde_json::json;

	/// Takes the first forwarded entry.
	fn select_first(result: &SimulationResult) -> Option<&ForwardedXcms> {
		result.forwarded_xcms().first()
	}

	/// Takes the entry, forwarded to the asset hub of the relay chain.
	fn select_asset_hub(result: &SimulationResult) -> Option<&ForwardedXcms> {
		result
			.forwarded_xcms()
			.iter()
			.find(|forwarded| forwarded.destination.location() == &Location::child_parachain(1000))
	}

	fn sent(pallet: &str, destination: &VersionedLocation) -> RuntimeEvent {
		RuntimeEvent {
			pallet: pallet.into(),
			variant: "Sent".into(),
			fields: json!({
				"origin": { "type": "V4", "value": { "parents": 0, "interior": { "type": "Here" } } },
				"destination": destination,
				"message": [],
				"message_id": "0x0000000000000000000000000000000000000000000000000000000000000000",
			}),
		}
	}

	fn forwarded(destination: Location, messages: Vec<XcmMessage>) -> ForwardedXcms {
		ForwardedXcms { destination: VersionedLocation::V4(destination), messages }
	}

	fn success(events: Vec<RuntimeEvent>, forwarded_xcms: Vec<ForwardedXcms>) -> SimulationResult {
		SimulationResult::Success(DryRunEffects {
			execution_result: json!({ "success": true }),
			emitted_events: events,
			forwarded_xcms,
		})
	}

	#[test]
	fn selects_entry_of_sent_event_not_the_first_one() {
		let people = Location::child_parachain(1004);
		let result = success(
			vec![sent("XcmPallet", &VersionedLocation::V4(people.clone()))],
			vec![
				forwarded(Location::child_parachain(1000), vec![XcmMessage(vec![4, 1])]),
				forwarded(people, vec![XcmMessage(vec![4, 2])]),
			],
		);

		assert_eq!(select_onward_message(&result), Some(&result.forwarded_xcms()[1]));
		assert_eq!(select_first(&result), Some(&result.forwarded_xcms()[0]));
		assert_eq!(select_asset_hub(&result), Some(&result.forwarded_xcms()[0]));
	}

	#[test]
	fn follows_destinations_other_than_asset_hub() {
		let coretime = Location::child_parachain(1005);
		let result = success(
			vec![sent("XcmPallet", &VersionedLocation::V4(coretime.clone()))],
			vec![forwarded(coretime, vec![XcmMessage(vec![4, 3])])],
		);

		assert_eq!(select_onward_message(&result), Some(&result.forwarded_xcms()[0]));
		assert_eq!(select_asset_hub(&result), None);
	}

	#[test]
	fn nothing_is_selected_without_sent_event() {
		let result = success(
			Vec::new(),
			vec![forwarded(Location::parent(), vec![XcmMessage(vec![4, 1])])],
		);
		assert_eq!(select_onward_message(&result), None);

		let mut not_sent = sent("PolkadotXcm", &VersionedLocation::V4(Location::parent()));
		not_sent.variant = "Attempted".into();
		let result = success(
			vec![not_sent],
			vec![forwarded(Location::parent(), vec![XcmMessage(vec![4, 1])])],
		);
		assert_eq!(select_onward_message(&result), None);
	}

	#[test]
	fn both_pallet_names_are_accepted() {
		for pallet in ["XcmPallet", "PolkadotXcm"] {
			let result = success(
				vec![sent(pallet, &VersionedLocation::V4(Location::parent()))],
				vec![forwarded(Location::parent(), vec![XcmMessage(vec![4, 1])])],
			);
			assert!(select_onward_message(&result).is_some(), "{pallet}");
		}
	}

	#[test]
	fn destination_versions_are_ignored() {
		let result = success(
			vec![sent("PolkadotXcm", &VersionedLocation::V3(Location::parent()))],
			vec![forwarded(Location::parent(), vec![XcmMessage(vec![4, 1])])],
		);
		assert_eq!(select_onward_message(&result), Some(&result.forwarded_xcms()[0]));
	}

	#[test]
	fn empty_message_list_ends_the_traversal() {
		let result = success(
			vec![sent("XcmPallet", &VersionedLocation::V4(Location::child_parachain(1000)))],
			vec![forwarded(Location::child_parachain(1000), Vec::new())],
		);
		assert_eq!(select_onward_message(&result), None);
	}

	#[test]
	fn only_the_first_sent_event_counts() {
		let result = success(
			vec![
				sent("XcmPallet", &VersionedLocation::V4(Location::child_parachain(1002))),
				sent("XcmPallet", &VersionedLocation::V4(Location::child_parachain(1000))),
			],
			vec![forwarded(Location::child_parachain(1000), vec![XcmMessage(vec![4, 1])])],
		);
		assert_eq!(select_onward_message(&result), None);
	}

	#[test]
	fn failed_dry_run_has_no_onward_message() {
		let result = SimulationResult::Failure(json!({ "type": "Unroutable" }));
		assert_eq!(select_onward_message(&result), None);
	}
}
