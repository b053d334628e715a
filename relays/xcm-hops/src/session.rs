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

//! Interactive dry-run session.
//!
//! The session runs one request at a time. Starting a new request supersedes the
//! running one: its task is aborted and nothing it produces afterwards reaches the
//! session state, because every update is checked against the generation of the run.

use crate::{
	error::Result,
	orchestrator::{HopOrchestrator, Termination},
	request::DryRunRequest,
	LOG_TARGET,
};

use bp_xcm_hops::Hop;
use std::sync::Arc;
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};

/// Status of the latest run.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RunStatus {
	/// Nothing has been started yet.
	#[default]
	Idle,
	/// The run is in progress.
	Running,
	/// The run has completed.
	Finished(Termination),
	/// The run has failed.
	Failed(String),
}

/// State of the session, as seen by observers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
	/// Generation of the latest run. Incremented by every start.
	pub generation: u64,
	/// Request of the latest run.
	pub request: Option<DryRunRequest>,
	/// Hops of the latest run.
	pub hops: Vec<Hop>,
	/// Status of the latest run.
	pub status: RunStatus,
}

/// Session that owns at most one running dry-run.
pub struct DryRunSession {
	orchestrator: Arc<HopOrchestrator>,
	state: Arc<watch::Sender<SessionState>>,
	task: Option<JoinHandle<()>>,
}

impl DryRunSession {
	/// Create idle session.
	pub fn new(orchestrator: HopOrchestrator) -> Self {
		DryRunSession {
			orchestrator: Arc::new(orchestrator),
			state: Arc::new(watch::Sender::new(SessionState::default())),
			task: None,
		}
	}

	/// Follow the session state.
	pub fn subscribe(&self) -> watch::Receiver<SessionState> {
		self.state.subscribe()
	}

	/// Current session state.
	pub fn state(&self) -> SessionState {
		self.state.borrow().clone()
	}

	/// Start dry-running the request, superseding the running one. Returns generation of
	/// the new run.
	///
	/// Fails without touching the running dry-run if called outside of the tokio runtime.
	pub fn start(&mut self, request: DryRunRequest) -> Result<u64> {
		let runtime = Handle::try_current()?;
		if let Some(task) = self.task.take() {
			task.abort();
		}

		let mut generation = 0;
		self.state.send_modify(|state| {
			state.generation += 1;
			state.request = Some(request.clone());
			state.hops.clear();
			state.status = RunStatus::Running;
			generation = state.generation;
		});
		tracing::debug!(target: LOG_TARGET, generation, chain = %request.chain, "Started dry-run");

		let orchestrator = self.orchestrator.clone();
		let sender = self.state.clone();
		self.task = Some(runtime.spawn(async move {
			let result = orchestrator
				.dry_run_with(&request, |hop| {
					sender.send_if_modified(|state| {
						if state.generation != generation {
							return false
						}
						state.hops.push(hop.clone());
						true
					});
				})
				.await;

			let status = match result {
				Ok(report) => RunStatus::Finished(report.termination),
				Err(interrupted) => {
					tracing::debug!(
						target: LOG_TARGET,
						generation,
						hops = interrupted.hops.len(),
						error = %interrupted.error,
						"Dry-run has failed",
					);
					RunStatus::Failed(interrupted.error.to_string())
				},
			};
			let updated = sender.send_if_modified(|state| {
				if state.generation != generation {
					return false
				}
				state.status = status;
				true
			});
			if !updated {
				tracing::trace!(target: LOG_TARGET, generation, "Dropping superseded dry-run result");
			}
		}));

		Ok(generation)
	}

	/// Wait until the latest run completes and return the session state.
	pub async fn wait(&mut self) -> SessionState {
		if let Some(task) = self.task.take() {
			if let Err(error) = task.await {
				tracing::debug!(target: LOG_TARGET, %error, "Dry-run task has not completed");
			}
		}
		self.state()
	}
}

impl Drop for DryRunSession {
	fn drop(&mut self) {
		if let Some(task) = self.task.take() {
			task.abort();
		}
	}
}
