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

//! Clients of the chain `DryRunApi` and the registry that owns them.

use crate::{
	error::{Error, Result},
	LOG_TARGET,
};

use async_trait::async_trait;
use bp_xcm_hops::{Chain, EncodedCall, Origin, SimulationResult, VersionedLocation, XcmMessage};
use std::{collections::HashMap, fmt, sync::Arc};

/// Error, returned by the dry-run client.
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// Client of the `DryRunApi` runtime API of a single chain.
///
/// Rejections of the call or the message by the runtime are reported as
/// [`SimulationResult::Failure`]. Errors are reserved for failures to talk to the chain.
#[async_trait]
pub trait DryRunClient: Send + Sync {
	/// Dry-run the call, dispatched with the given origin.
	async fn dry_run_call(
		&self,
		origin: &Origin,
		call: &EncodedCall,
	) -> std::result::Result<SimulationResult, ClientError>;

	/// Dry-run the message, received from the given location.
	async fn dry_run_xcm(
		&self,
		origin: &VersionedLocation,
		message: &XcmMessage,
	) -> std::result::Result<SimulationResult, ClientError>;

	/// Release resources, held by the client.
	async fn close(&self) {}
}

/// Dry-run clients of all known chains.
///
/// The registry is built once and shared by all dry-runs.
#[derive(Clone, Default)]
pub struct ClientRegistry {
	clients: HashMap<Chain, Arc<dyn DryRunClient>>,
}

impl ClientRegistry {
	/// Create empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the registry with the client of the given chain.
	pub fn with_client(mut self, chain: Chain, client: Arc<dyn DryRunClient>) -> Self {
		self.register(chain, client);
		self
	}

	/// Register client of the given chain, replacing the previous one.
	pub fn register(&mut self, chain: Chain, client: Arc<dyn DryRunClient>) {
		if self.clients.insert(chain, client).is_some() {
			tracing::debug!(target: LOG_TARGET, %chain, "Replaced dry-run client");
		}
	}

	/// Client of the given chain.
	pub fn client(&self, chain: Chain) -> Result<Arc<dyn DryRunClient>> {
		self.clients.get(&chain).cloned().ok_or(Error::MissingClient(chain))
	}

	/// Chains with registered clients.
	pub fn chains(&self) -> impl Iterator<Item = Chain> + '_ {
		self.clients.keys().copied()
	}

	/// Close all registered clients.
	pub async fn shutdown(&self) {
		futures::future::join_all(self.clients.values().map(|client| client.close())).await;
		tracing::debug!(target: LOG_TARGET, clients = self.clients.len(), "Closed dry-run clients");
	}
}

impl fmt::Debug for ClientRegistry {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let mut chains = self.chains().collect::<Vec<_>>();
		chains.sort();
		f.debug_struct("ClientRegistry").field("chains", &chains).finish()
	}
}
