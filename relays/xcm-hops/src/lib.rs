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

//! Multi-hop XCM dry-run orchestrator.
//!
//! Dry-runs a call at one chain, finds the message that the chain has sent to another
//! chain, dry-runs that message at the destination and so on, until the message leaves
//! the known topology or nothing is sent anymore. Nothing is ever committed: every hop
//! goes through the `DryRunApi` of the chain runtime.

#![warn(missing_docs)]

pub use client::{ClientError, ClientRegistry, DryRunClient};
pub use config::{OrchestratorConfig, RouteConfig, XcmHopsConfig};
pub use decoder::{CallDecoder, DecodeError, ScaleCallDecoder};
pub use disambiguator::select_onward_message;
pub use error::{Error, Interrupted, Result};
pub use orchestrator::{DryRunReport, HopOrchestrator, Termination};
pub use recorded::{ChainRecording, RecordedCall, RecordedClient, RecordedXcm, SimulationRecording};
pub use request::DryRunRequest;
pub use routing::{RoutingEdge, RoutingTable};
pub use session::{DryRunSession, RunStatus, SessionState};

pub mod client;
pub mod config;
pub mod decoder;
pub mod disambiguator;
pub mod error;
pub mod initialize;
pub mod orchestrator;
pub mod recorded;
pub mod request;
pub mod routing;
pub mod session;

/// Log target of the orchestrator.
pub const LOG_TARGET: &str = "xcm::hops";
