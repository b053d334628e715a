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

//! Static routing table: which chain a forwarded message lands on, and how that chain
//! sees the chain that has sent it.
//!
//! Routes are directional and chain-specific. The location of the previous chain, as
//! seen from the next one, is supplied by every edge instead of being derived from the
//! destination location: a parachain reaches its sibling by going up to the relay chain
//! and down into the sibling, and the sibling sees it the same way, while the relay
//! chain and its parachains use different shapes in each direction.

use crate::{
	error::{Error, Result},
	LOG_TARGET,
};

use bp_xcm_hops::{Chain, Location, Network, VersionedLocation};
use serde::Serialize;
use strum::IntoEnumIterator;

/// Directed edge of the routing table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoutingEdge {
	/// Chain that sends the message.
	pub from: Chain,
	/// Destination of the message, relative to `from`. Matched structurally.
	pub destination: Location,
	/// Chain that receives the message.
	pub to: Chain,
	/// Location of `from`, relative to `to`.
	pub reverse: Location,
}

impl RoutingEdge {
	/// Create new routing edge.
	pub fn new(from: Chain, destination: Location, to: Chain, reverse: Location) -> Self {
		RoutingEdge { from, destination, to, reverse }
	}

	/// Returns `true` if the edge routes messages sent to the given destination.
	pub fn accepts(&self, destination: &VersionedLocation) -> bool {
		destination.matches(self.destination.parents, self.destination.interior.as_slice())
	}

	/// Location of the sender, relative to the receiver, in the version of the routed
	/// destination.
	pub fn reverse(&self, destination: &VersionedLocation) -> VersionedLocation {
		destination.with_location(self.reverse.clone())
	}
}

/// Routing table over the known chains.
#[derive(Clone, Debug)]
pub struct RoutingTable {
	edges: Vec<RoutingEdge>,
}

impl RoutingTable {
	/// Create routing table from the given edges.
	///
	/// Fails if two edges from the same chain accept the same destination, or if an edge
	/// connects a chain to itself.
	pub fn new(edges: Vec<RoutingEdge>) -> Result<Self> {
		for (index, edge) in edges.iter().enumerate() {
			if edge.from == edge.to {
				return Err(Error::InvalidRoute {
					from: edge.from,
					reason: format!("route to {} leads back to the same chain", edge.destination),
				})
			}

			let overlaps = edges[index + 1..]
				.iter()
				.any(|other| other.from == edge.from && other.destination == edge.destination);
			if overlaps {
				return Err(Error::OverlappingRoutes {
					from: edge.from,
					location: edge.destination.clone(),
				})
			}
		}

		Ok(RoutingTable { edges })
	}

	/// Routing table between relay chains and their system parachains.
	pub fn system() -> Self {
		RoutingTable { edges: system_edges() }
	}

	/// Return the table with `extra` edges appended.
	pub fn extended(self, extra: Vec<RoutingEdge>) -> Result<Self> {
		let mut edges = self.edges;
		edges.extend(extra);
		RoutingTable::new(edges)
	}

	/// All edges of the table.
	pub fn edges(&self) -> &[RoutingEdge] {
		&self.edges
	}

	/// Edges, leaving the given chain.
	pub fn edges_from(&self, chain: Chain) -> impl Iterator<Item = &RoutingEdge> {
		self.edges.iter().filter(move |edge| edge.from == chain)
	}

	/// Find the chain that receives a message sent from `from` to `destination`.
	///
	/// Returns the receiving chain and the location of `from` relative to it. `None` means
	/// that the destination is outside of the known topology, which is a normal outcome.
	pub fn resolve(
		&self,
		from: Chain,
		destination: &VersionedLocation,
	) -> Option<(Chain, VersionedLocation)> {
		let resolved = self
			.edges_from(from)
			.find(|edge| edge.accepts(destination))
			.map(|edge| (edge.to, edge.reverse(destination)));

		match &resolved {
			Some((to, reverse)) => tracing::trace!(
				target: LOG_TARGET,
				%from,
				%destination,
				%to,
				%reverse,
				"Resolved route",
			),
			None => tracing::debug!(
				target: LOG_TARGET,
				%from,
				%destination,
				"Destination is outside of the known topology",
			),
		}

		resolved
	}
}

/// Edges between every relay chain and its system parachains, and between sibling system
/// parachains.
pub fn system_edges() -> Vec<RoutingEdge> {
	let mut edges = Vec::new();
	for network in Network::iter() {
		let relay = network.relay_chain();
		for parachain in network.parachains() {
			let Some(para_id) = parachain.para_id() else { continue };

			edges.push(RoutingEdge::new(
				relay,
				Location::child_parachain(para_id),
				parachain,
				Location::parent(),
			));
			edges.push(RoutingEdge::new(
				parachain,
				Location::parent(),
				relay,
				Location::child_parachain(para_id),
			));

			for sibling in network.parachains().filter(|sibling| *sibling != parachain) {
				let Some(sibling_id) = sibling.para_id() else { continue };
				edges.push(RoutingEdge::new(
					parachain,
					Location::sibling_parachain(sibling_id),
					sibling,
					Location::sibling_parachain(para_id),
				));
			}
		}
	}
	edges
}
