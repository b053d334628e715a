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

//! Logger initialization.

use tracing_subscriber::{
	fmt::{time::OffsetTime, SubscriberBuilder},
	EnvFilter,
};

/// Directives, used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_DIRECTIVES: &str = "warn,xcm::hops=info";

/// Error, returned when the global logger is already set.
pub type InitializeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Initialize logger instance.
pub fn initialize_logger(with_timestamp: bool) -> Result<(), InitializeError> {
	let format = time::macros::format_description!(
		"[year]-[month]-[day] [hour repr:24]:[minute]:[second] [offset_hour sign:mandatory]"
	);
	let local_time = OffsetTime::new(
		time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC),
		format,
	);

	let env_filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVES));

	let builder = SubscriberBuilder::default().with_env_filter(env_filter).with_writer(std::io::stderr);

	if with_timestamp {
		builder.with_timer(local_time).try_init()
	} else {
		builder.without_time().try_init()
	}
}
