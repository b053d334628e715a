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

//! Orchestrator errors.
//!
//! Failed simulations, unroutable destinations and the lack of forwarded messages are
//! not errors: they end the traversal and are reported in the
//! [`DryRunReport`](crate::DryRunReport).

use crate::{client::ClientError, decoder::DecodeError};

use bp_xcm_hops::{Chain, Hop, Location, Origin, OriginParseError};
use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// Result type used by the orchestrator.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that may happen during the dry-run.
#[derive(Error, Debug)]
pub enum Error {
	/// The call can not be decoded for the selected chain.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// The origin is not known to the selected chain.
	#[error("Origin {origin} is not supported by {chain}")]
	UnsupportedOrigin {
		/// Selected chain.
		chain: Chain,
		/// Requested origin.
		origin: Origin,
	},
	/// The origin can not be parsed.
	#[error(transparent)]
	InvalidOrigin(#[from] OriginParseError),
	/// The chain has no registered dry-run client.
	#[error("No dry-run client is registered for {0}")]
	MissingClient(Chain),
	/// The dry-run client has failed to talk to the chain.
	#[error("Dry-run client of {chain} has failed: {error}")]
	Client {
		/// Chain of the client.
		chain: Chain,
		/// Underlying client error.
		#[source]
		error: ClientError,
	},
	/// The dry-run has not completed in time.
	#[error("Dry-run at {chain} has not completed in {timeout:?}")]
	HopTimeout {
		/// Chain that has been dry-running.
		chain: Chain,
		/// Configured hop timeout.
		timeout: Duration,
	},
	/// The message keeps being forwarded between chains.
	#[error("Routing cycle detected at {chain} after {hops} hops")]
	RoutingCycleDetected {
		/// Chain where the message would have been dry-run next.
		chain: Chain,
		/// Number of hops, dry-run before the cycle has been detected.
		hops: usize,
	},
	/// The routing table has two edges with the same predicate.
	#[error("Route from {from} to {location} is declared more than once")]
	OverlappingRoutes {
		/// Source chain of both edges.
		from: Chain,
		/// Destination location, matched by both edges.
		location: Location,
	},
	/// The route configuration is not valid.
	#[error("Invalid route from {from}: {reason}")]
	InvalidRoute {
		/// Source chain of the route.
		from: Chain,
		/// What is wrong.
		reason: String,
	},
	/// The shareable request link is not valid.
	#[error("Invalid dry-run link: {0}")]
	InvalidLink(String),
	/// File can not be read.
	#[error("Failed to read {path:?}: {error}")]
	Io {
		/// Path to the file.
		path: PathBuf,
		/// Underlying error.
		#[source]
		error: std::io::Error,
	},
	/// Configuration is not valid.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),
	/// Configuration file can not be parsed.
	#[error("Failed to parse configuration: {0}")]
	Config(#[from] toml::de::Error),
	/// Simulation recording can not be parsed.
	#[error("Failed to parse simulation recording: {0}")]
	Recording(#[from] serde_json::Error),
	/// The dry-run session has been started outside of the tokio runtime.
	#[error("Dry-run session requires a tokio runtime: {0}")]
	Runtime(#[from] tokio::runtime::TryCurrentError),
}

impl Error {
	/// Returns `true` if the error is caused by the user input and may be fixed by changing
	/// the request.
	pub fn is_input_error(&self) -> bool {
		matches!(
			self,
			Error::Decode(_) |
				Error::UnsupportedOrigin { .. } |
				Error::InvalidOrigin(_) |
				Error::InvalidLink(_)
		)
	}
}

/// Dry-run that has stopped with an error, with all hops dry-run before the error.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct Interrupted {
	/// Hops, dry-run before the error. Empty if the request has been rejected upfront.
	pub hops: Vec<Hop>,
	/// Why the dry-run has stopped.
	pub error: Error,
}

impl From<Error> for Interrupted {
	fn from(error: Error) -> Self {
		Interrupted { hops: Vec::new(), error }
	}
}
