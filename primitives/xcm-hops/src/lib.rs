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

//! Primitives shared by the XCM multi-hop dry-run orchestrator.
//!
//! Everything here is plain data: versioned locations, the set of known chains, the
//! origins a call may be dispatched with and the effects reported by the `DryRunApi`
//! of a chain runtime.

#![warn(missing_docs)]

pub use chain::{
	Chain, Network, ASSET_HUB_PARA_ID, BRIDGE_HUB_PARA_ID, COLLECTIVES_PARA_ID,
	CORETIME_PARA_ID, PEOPLE_PARA_ID,
};
pub use location::{
	BodyId, BodyPart, Junction, Junctions, Location, NetworkId, ParaId, TooManyJunctions,
	VersionedLocation, XcmVersion, MAX_JUNCTIONS,
};
pub use origin::{AccountAddress, GovernanceOrigin, Origin, OriginParseError};
pub use simulation::{
	DryRunEffects, EncodedCall, ForwardedXcms, Hop, HopOrigin, RuntimeEvent, SimulationResult,
	XcmMessage, XCM_PALLET_NAMES, XCM_SENT_EVENT,
};

pub mod chain;
pub mod location;
pub mod origin;
pub mod simulation;

mod hex_serde;
