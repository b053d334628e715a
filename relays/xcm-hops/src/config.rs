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

//! Orchestrator configuration file.
//!
//! ```toml
//! [orchestrator]
//! hop_limit = 8
//! hop_timeout_secs = 60
//!
//! [[routes]]
//! from = "polkadotBridgeHub"
//! to = "kusamaBridgeHub"
//!
//! [routes.destination]
//! parents = 2
//! interior = { type = "X2", value = [{ type = "GlobalConsensus", value = { type = "Kusama" } }, { type = "Parachain", value = 1002 }] }
//!
//! [routes.reverse]
//! parents = 2
//! interior = { type = "X2", value = [{ type = "GlobalConsensus", value = { type = "Polkadot" } }, { type = "Parachain", value = 1002 }] }
//! ```

use crate::{
	error::{Error, Result},
	routing::{RoutingEdge, RoutingTable},
	LOG_TARGET,
};

use bp_xcm_hops::{Chain, Location};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Default maximal number of hops in a single dry-run.
pub const DEFAULT_HOP_LIMIT: usize = 8;
/// Default time, given to a single chain to complete the dry-run.
pub const DEFAULT_HOP_TIMEOUT_SECS: u64 = 60;

/// Traversal limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrchestratorConfig {
	/// Maximal number of hops in a single dry-run.
	pub hop_limit: usize,
	/// Time, given to a single chain to complete the dry-run. `None` waits forever.
	pub hop_timeout_secs: Option<u64>,
}

impl OrchestratorConfig {
	/// Time, given to a single chain to complete the dry-run.
	pub fn hop_timeout(&self) -> Option<Duration> {
		self.hop_timeout_secs.map(Duration::from_secs)
	}
}

impl Default for OrchestratorConfig {
	fn default() -> Self {
		OrchestratorConfig {
			hop_limit: DEFAULT_HOP_LIMIT,
			hop_timeout_secs: Some(DEFAULT_HOP_TIMEOUT_SECS),
		}
	}
}

/// Route, added on top of the system topology.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
	/// Chain that sends the message.
	pub from: Chain,
	/// Chain that receives the message.
	pub to: Chain,
	/// Destination of the message, relative to `from`.
	pub destination: Location,
	/// Location of `from`, relative to `to`.
	pub reverse: Location,
}

impl From<RouteConfig> for RoutingEdge {
	fn from(route: RouteConfig) -> Self {
		RoutingEdge::new(route.from, route.destination, route.to, route.reverse)
	}
}

/// Contents of the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XcmHopsConfig {
	/// Traversal limits.
	pub orchestrator: OrchestratorConfig,
	/// Extra routes.
	pub routes: Vec<RouteConfig>,
}

impl XcmHopsConfig {
	/// Read configuration from the TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let contents = std::fs::read_to_string(path)
			.map_err(|error| Error::Io { path: path.into(), error })?;
		let config = Self::from_toml(&contents)?;
		tracing::debug!(
			target: LOG_TARGET,
			?path,
			hop_limit = config.orchestrator.hop_limit,
			routes = config.routes.len(),
			"Loaded configuration",
		);
		Ok(config)
	}

	/// Parse configuration from the TOML string.
	pub fn from_toml(contents: &str) -> Result<Self> {
		let config: Self = toml::from_str(contents)?;
		if config.orchestrator.hop_limit == 0 {
			return Err(Error::InvalidConfig("hop_limit must be positive".into()))
		}
		Ok(config)
	}

	/// System routing table, extended with the configured routes.
	pub fn routing_table(&self) -> Result<RoutingTable> {
		RoutingTable::system().extended(self.routes.iter().cloned().map(Into::into).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use assert_matches::assert_matches;
	use bp_xcm_hops::{Junction, Junctions, NetworkId, VersionedLocation};
	use std::io::Write;

	const BRIDGE_ROUTE: &str = r#"
		[orchestrator]
		hop_limit = 4

		[[routes]]
		from = "polkadotBridgeHub"
		to = "kusamaBridgeHub"

		[routes.destination]
		parents = 2
		interior = { type = "X2", value = [{ type = "GlobalConsensus", value = { type = "Kusama" } }, { type = "Parachain", value = 1002 }] }

		[routes.reverse]
		parents = 2
		interior = { type = "X2", value = [{ type = "GlobalConsensus", value = { type = "Polkadot" } }, { type = "Parachain", value = 1002 }] }
	"#;

	fn bridge_hub_of(network: NetworkId) -> Location {
		Location::new(
			2,
			Junctions::try_from(vec![Junction::GlobalConsensus(network), Junction::Parachain(1002)])
				.unwrap(),
		)
	}

	#[test]
	fn empty_file_means_defaults() {
		let config = XcmHopsConfig::from_toml("").unwrap();
		assert_eq!(config, XcmHopsConfig::default());
		assert_eq!(config.orchestrator.hop_timeout(), Some(Duration::from_secs(60)));
		assert_eq!(
			config.routing_table().unwrap().edges().len(),
			RoutingTable::system().edges().len()
		);
	}

	#[test]
	fn configured_routes_extend_the_system_table() {
		let config = XcmHopsConfig::from_toml(BRIDGE_ROUTE).unwrap();
		assert_eq!(config.orchestrator.hop_limit, 4);
		assert_eq!(config.orchestrator.hop_timeout_secs, Some(DEFAULT_HOP_TIMEOUT_SECS));

		let table = config.routing_table().unwrap();
		assert_eq!(
			table.resolve(
				Chain::PolkadotBridgeHub,
				&VersionedLocation::V5(bridge_hub_of(NetworkId::Kusama))
			),
			Some((Chain::KusamaBridgeHub, VersionedLocation::V5(bridge_hub_of(NetworkId::Polkadot))))
		);
	}

	#[test]
	fn overlapping_configured_route_is_rejected() {
		let config = XcmHopsConfig::from_toml(
			r#"
			[[routes]]
			from = "westendAssetHub"
			to = "westendPeople"
			destination = { parents = 1, interior = { type = "Here" } }
			reverse = { parents = 1, interior = { type = "X1", value = { type = "Parachain", value = 1000 } } }
		"#,
		)
		.unwrap();
		assert_matches!(
			config.routing_table(),
			Err(Error::OverlappingRoutes { from: Chain::WestendAssetHub, .. })
		);
	}

	#[test]
	fn invalid_files_are_rejected() {
		assert_matches!(
			XcmHopsConfig::from_toml("[orchestrator]\nhop_limit = 0"),
			Err(Error::InvalidConfig(_))
		);
		assert_matches!(XcmHopsConfig::from_toml("[orchestrator]\nhops = 3"), Err(Error::Config(_)));
		assert_matches!(
			XcmHopsConfig::from_toml("[[routes]]\nfrom = \"rococo\"\nto = \"westend\""),
			Err(Error::Config(_))
		);
		assert_matches!(XcmHopsConfig::load("/definitely/not/here.toml"), Err(Error::Io { .. }));
	}

	#[test]
	fn configuration_is_read_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(BRIDGE_ROUTE.as_bytes()).unwrap();
		let config = XcmHopsConfig::load(file.path()).unwrap();
		assert_eq!(config.routes.len(), 1);
		assert_eq!(config.routes[0].to, Chain::KusamaBridgeHub);
	}
}
