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

//! Decoding of the user-supplied call data.

use crate::LOG_TARGET;

use bp_xcm_hops::{Chain, EncodedCall};
use thiserror::Error;

/// Call data decoding error.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum DecodeError {
	/// No call data has been given.
	#[error("Call data is empty")]
	Empty,
	/// The call data is not a hex string.
	#[error("Call data is not a valid hex string: {0}")]
	InvalidHex(#[from] hex::FromHexError),
	/// The call data is too short to hold pallet and call indices.
	#[error("Call data of {len} bytes is too short to be a {chain} call")]
	TooShort {
		/// Selected chain.
		chain: Chain,
		/// Length of the call data.
		len: usize,
	},
}

/// Turns raw call data into a call of the given chain.
pub trait CallDecoder: Send + Sync {
	/// Decode hex-encoded call data.
	fn decode_call(&self, chain: Chain, raw: &str) -> Result<EncodedCall, DecodeError>;
}

/// Decoder that accepts any SCALE-encoded call with pallet and call indices.
///
/// The call arguments are left to the runtime, which rejects malformed calls during the
/// dry-run.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScaleCallDecoder;

impl CallDecoder for ScaleCallDecoder {
	fn decode_call(&self, chain: Chain, raw: &str) -> Result<EncodedCall, DecodeError> {
		let raw = raw.trim();
		let raw = raw.strip_prefix("0x").unwrap_or(raw);
		if raw.is_empty() {
			return Err(DecodeError::Empty)
		}

		let call = EncodedCall(hex::decode(raw)?);
		let (pallet_index, call_index) =
			call.indices().ok_or(DecodeError::TooShort { chain, len: call.0.len() })?;
		tracing::trace!(
			target: LOG_TARGET,
			%chain,
			pallet_index,
			call_index,
			len = call.0.len(),
			"Decoded call",
		);

		Ok(call)
	}
}
