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

//! Chains known to the dry-run orchestrator.

use crate::location::ParaId;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, VariantNames};

/// Identifier of the Asset Hub system parachain.
pub const ASSET_HUB_PARA_ID: ParaId = 1000;
/// Identifier of the Collectives system parachain.
pub const COLLECTIVES_PARA_ID: ParaId = 1001;
/// Identifier of the Bridge Hub system parachain.
pub const BRIDGE_HUB_PARA_ID: ParaId = 1002;
/// Identifier of the People system parachain.
pub const PEOPLE_PARA_ID: ParaId = 1004;
/// Identifier of the Coretime system parachain.
pub const CORETIME_PARA_ID: ParaId = 1005;

/// Relay chain network, with all its system parachains.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	Serialize,
	Deserialize,
	EnumString,
	Display,
	EnumIter,
	VariantNames,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Network {
	/// Polkadot network.
	Polkadot,
	/// Kusama network.
	Kusama,
	/// Westend test network.
	Westend,
}

impl Network {
	/// Relay chain of the network.
	pub fn relay_chain(&self) -> Chain {
		match self {
			Network::Polkadot => Chain::Polkadot,
			Network::Kusama => Chain::Kusama,
			Network::Westend => Chain::Westend,
		}
	}

	/// All chains of the network, relay chain first.
	pub fn chains(&self) -> impl Iterator<Item = Chain> + '_ {
		Chain::iter().filter(move |chain| chain.network() == *self)
	}

	/// System parachains of the network.
	pub fn parachains(&self) -> impl Iterator<Item = Chain> + '_ {
		self.chains().filter(|chain| !chain.is_relay())
	}
}

/// A chain that may be dry-run.
///
/// Names are the camelCase identifiers (`westendAssetHub`), both in serialized form and in
/// command line arguments.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	PartialOrd,
	Ord,
	Serialize,
	Deserialize,
	EnumString,
	Display,
	EnumIter,
	VariantNames,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Chain {
	/// Polkadot relay chain.
	Polkadot,
	/// Polkadot Asset Hub.
	PolkadotAssetHub,
	/// Polkadot Collectives.
	PolkadotCollectives,
	/// Polkadot Bridge Hub.
	PolkadotBridgeHub,
	/// Polkadot People.
	PolkadotPeople,
	/// Polkadot Coretime.
	PolkadotCoretime,
	/// Kusama relay chain.
	Kusama,
	/// Kusama Asset Hub.
	KusamaAssetHub,
	/// Kusama Bridge Hub.
	KusamaBridgeHub,
	/// Kusama People.
	KusamaPeople,
	/// Kusama Coretime.
	KusamaCoretime,
	/// Westend relay chain.
	Westend,
	/// Westend Asset Hub.
	WestendAssetHub,
	/// Westend Collectives.
	WestendCollectives,
	/// Westend Bridge Hub.
	WestendBridgeHub,
	/// Westend People.
	WestendPeople,
	/// Westend Coretime.
	WestendCoretime,
}

impl Chain {
	/// Network this chain belongs to.
	pub fn network(&self) -> Network {
		match self {
			Chain::Polkadot |
			Chain::PolkadotAssetHub |
			Chain::PolkadotCollectives |
			Chain::PolkadotBridgeHub |
			Chain::PolkadotPeople |
			Chain::PolkadotCoretime => Network::Polkadot,
			Chain::Kusama |
			Chain::KusamaAssetHub |
			Chain::KusamaBridgeHub |
			Chain::KusamaPeople |
			Chain::KusamaCoretime => Network::Kusama,
			Chain::Westend |
			Chain::WestendAssetHub |
			Chain::WestendCollectives |
			Chain::WestendBridgeHub |
			Chain::WestendPeople |
			Chain::WestendCoretime => Network::Westend,
		}
	}

	/// Parachain identifier, `None` for relay chains.
	pub fn para_id(&self) -> Option<ParaId> {
		match self {
			Chain::Polkadot | Chain::Kusama | Chain::Westend => None,
			Chain::PolkadotAssetHub | Chain::KusamaAssetHub | Chain::WestendAssetHub =>
				Some(ASSET_HUB_PARA_ID),
			Chain::PolkadotCollectives | Chain::WestendCollectives => Some(COLLECTIVES_PARA_ID),
			Chain::PolkadotBridgeHub | Chain::KusamaBridgeHub | Chain::WestendBridgeHub =>
				Some(BRIDGE_HUB_PARA_ID),
			Chain::PolkadotPeople | Chain::KusamaPeople | Chain::WestendPeople =>
				Some(PEOPLE_PARA_ID),
			Chain::PolkadotCoretime | Chain::KusamaCoretime | Chain::WestendCoretime =>
				Some(CORETIME_PARA_ID),
		}
	}

	/// Returns `true` for relay chains.
	pub fn is_relay(&self) -> bool {
		self.para_id().is_none()
	}

	/// Relay chain of this chain (the chain itself for relay chains).
	pub fn relay(&self) -> Chain {
		self.network().relay_chain()
	}

	/// Find the parachain with given identifier in the network.
	pub fn parachain(network: Network, para_id: ParaId) -> Option<Chain> {
		network.parachains().find(|chain| chain.para_id() == Some(para_id))
	}

	/// Name of the XCM pallet, as it appears in the runtime event log of the chain.
	pub fn xcm_pallet_name(&self) -> &'static str {
		if self.is_relay() {
			"XcmPallet"
		} else {
			"PolkadotXcm"
		}
	}

	/// Returns `true` if the chain runtime has the OpenGov custom origins.
	pub fn accepts_governance_origins(&self) -> bool {
		self.is_relay()
	}
}
