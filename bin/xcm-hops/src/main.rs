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

//! XCM multi-hop dry-run entrypoint.

#![warn(missing_docs)]

use clap::Parser;
use relay_xcm_hops::initialize::initialize_logger;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = cli::XcmHops::parse();
	initialize_logger(!args.no_timestamps).map_err(|error| anyhow::anyhow!(error))?;

	if let Err(error) = args.command.run().await {
		tracing::error!(target: relay_xcm_hops::LOG_TARGET, "Dry-run has failed: {:#}", error);
		std::process::exit(cli::exit_code(&error));
	}
	Ok(())
}
