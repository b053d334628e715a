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

//! `0x`-prefixed hex representation of byte containers, for `#[serde(with)]`.

use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

pub fn serialize<S, T>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
	T: AsRef<[u8]>,
{
	serializer.serialize_str(&format!("0x{}", hex::encode(bytes.as_ref())))
}

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: TryFrom<Vec<u8>>,
{
	let encoded = String::deserialize(deserializer)?;
	let bytes = decode(&encoded).map_err(D::Error::custom)?;
	let len = bytes.len();
	T::try_from(bytes).map_err(|_| D::Error::custom(format!("unexpected byte length {len}")))
}

/// Decode hex string, with or without the `0x` prefix.
pub(crate) fn decode(encoded: &str) -> Result<Vec<u8>, hex::FromHexError> {
	hex::decode(encoded.strip_prefix("0x").unwrap_or(encoded))
}
