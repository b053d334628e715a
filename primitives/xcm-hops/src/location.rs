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

//! Relative, versioned XCM locations.
//!
//! A [`Location`] says "go up `parents` levels, then descend along `interior`". It is
//! always relative to the chain that holds it. [`VersionedLocation`] carries the XCM
//! version tag of the message the location was taken from; the tag is kept as-is by
//! every transformation and is ignored by structural comparison.
//!
//! Both types have the XCM SCALE layout and the JSON layout used by `polkadot-api`
//! (`{"type": "V4", "value": {"parents": 1, "interior": {"type": "Here"}}}`).

use codec::{Decode, Encode};
use serde::{
	de::{self, value::MapAccessDeserializer, Error as _, IgnoredAny, MapAccess, SeqAccess, Visitor},
	ser::SerializeStruct,
	Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

/// Parachain identifier.
pub type ParaId = u32;

/// XCM version number.
pub type XcmVersion = u32;

/// Maximal number of junctions in the [`Junctions`] sequence.
pub const MAX_JUNCTIONS: usize = 8;

const JUNCTIONS_VARIANTS: [&str; MAX_JUNCTIONS + 1] =
	["Here", "X1", "X2", "X3", "X4", "X5", "X6", "X7", "X8"];

/// Global consensus system identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NetworkId {
	/// Network specified by the first 32 bytes of its genesis block.
	#[codec(index = 0)]
	ByGenesis(#[serde(with = "crate::hex_serde")] [u8; 32]),
	/// Network defined by the first 32 bytes of the hash and number of some block it contains.
	#[codec(index = 1)]
	ByFork {
		/// Number of the block.
		block_number: u64,
		/// Hash of the block.
		#[serde(with = "crate::hex_serde")]
		block_hash: [u8; 32],
	},
	/// The Polkadot mainnet relay chain.
	#[codec(index = 2)]
	Polkadot,
	/// The Kusama canary-net relay chain.
	#[codec(index = 3)]
	Kusama,
	/// The Westend testnet relay chain.
	#[codec(index = 4)]
	Westend,
	/// The Rococo testnet relay chain.
	#[codec(index = 5)]
	Rococo,
	/// The Wococo testnet relay chain.
	#[codec(index = 6)]
	Wococo,
	/// An Ethereum network specified by its chain ID.
	#[codec(index = 7)]
	Ethereum {
		/// The EIP-155 chain ID.
		#[codec(compact)]
		chain_id: u64,
	},
	/// The Bitcoin network, including hard-forks supported by Bitcoin Core development team.
	#[codec(index = 8)]
	BitcoinCore,
	/// The Bitcoin network, including hard-forks supported by Bitcoin Cash developers.
	#[codec(index = 9)]
	BitcoinCash,
	/// The Polkadot Bulletin chain.
	#[codec(index = 10)]
	PolkadotBulletin,
}

/// An identifier of a pluralistic body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum BodyId {
	/// The only body in its context.
	#[codec(index = 0)]
	Unit,
	/// A named body.
	#[codec(index = 1)]
	Moniker(#[serde(with = "crate::hex_serde")] [u8; 4]),
	/// An indexed body.
	#[codec(index = 2)]
	Index(#[codec(compact)] u32),
	/// The unambiguous executive body.
	#[codec(index = 3)]
	Executive,
	/// The unambiguous technical body.
	#[codec(index = 4)]
	Technical,
	/// The unambiguous legislative body.
	#[codec(index = 5)]
	Legislative,
	/// The unambiguous judicial body.
	#[codec(index = 6)]
	Judicial,
	/// The unambiguous defense body.
	#[codec(index = 7)]
	Defense,
	/// The unambiguous administration body.
	#[codec(index = 8)]
	Administration,
	/// The unambiguous treasury body.
	#[codec(index = 9)]
	Treasury,
}

/// A part of a pluralistic body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum BodyPart {
	/// The body's declaration, under whatever means it decides.
	#[codec(index = 0)]
	Voice,
	/// A given number of members of the body.
	#[codec(index = 1)]
	Members {
		/// Number of members.
		#[codec(compact)]
		count: u32,
	},
	/// A given number of members of the body, out of some larger caucus.
	#[codec(index = 2)]
	Fraction {
		/// Numerator.
		#[codec(compact)]
		nom: u32,
		/// Denominator.
		#[codec(compact)]
		denom: u32,
	},
	/// No less than the given proportion of members of the body.
	#[codec(index = 3)]
	AtLeastProportion {
		/// Numerator.
		#[codec(compact)]
		nom: u32,
		/// Denominator.
		#[codec(compact)]
		denom: u32,
	},
	/// More than the given proportion of members of the body.
	#[codec(index = 4)]
	MoreThanProportion {
		/// Numerator.
		#[codec(compact)]
		nom: u32,
		/// Denominator.
		#[codec(compact)]
		denom: u32,
	},
}

/// A single item in a path to be followed when descending from a location.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Junction {
	/// An indexed parachain belonging to and operated by the context.
	#[codec(index = 0)]
	Parachain(#[codec(compact)] ParaId),
	/// A 32-byte identifier for an account of a specific network.
	#[codec(index = 1)]
	AccountId32 {
		/// Network the account belongs to, `None` for the contextual one.
		network: Option<NetworkId>,
		/// Raw account identifier.
		#[serde(with = "crate::hex_serde")]
		id: [u8; 32],
	},
	/// An 8-byte index for an account of a specific network.
	#[codec(index = 2)]
	AccountIndex64 {
		/// Network the account belongs to, `None` for the contextual one.
		network: Option<NetworkId>,
		/// Account index.
		#[codec(compact)]
		index: u64,
	},
	/// A 20-byte identifier for an account of a specific network.
	#[codec(index = 3)]
	AccountKey20 {
		/// Network the account belongs to, `None` for the contextual one.
		network: Option<NetworkId>,
		/// Raw account key.
		#[serde(with = "crate::hex_serde")]
		key: [u8; 20],
	},
	/// An instanced, indexed pallet that forms a constituent part of the context.
	#[codec(index = 4)]
	PalletInstance(u8),
	/// A non-descript index within the context location.
	#[codec(index = 5)]
	GeneralIndex(#[codec(compact)] #[serde(with = "general_index")] u128),
	/// A non-descript datum of up to 32 bytes, acting as a key within the context location.
	#[codec(index = 6)]
	GeneralKey {
		/// Number of meaningful bytes in `data`.
		length: u8,
		/// Key bytes, zero-padded.
		#[serde(with = "crate::hex_serde")]
		data: [u8; 32],
	},
	/// The unambiguous child.
	#[codec(index = 7)]
	OnlyChild,
	/// A pluralistic body existing within consensus.
	#[codec(index = 8)]
	Plurality {
		/// The body.
		id: BodyId,
		/// Part of the body.
		part: BodyPart,
	},
	/// A global network capable of externalizing its own consensus.
	#[codec(index = 9)]
	GlobalConsensus(NetworkId),
}

impl fmt::Display for Junction {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Junction::Parachain(id) => write!(f, "Parachain({id})"),
			Junction::AccountId32 { id, .. } => write!(f, "AccountId32(0x{})", hex::encode(id)),
			Junction::AccountIndex64 { index, .. } => write!(f, "AccountIndex64({index})"),
			Junction::AccountKey20 { key, .. } => write!(f, "AccountKey20(0x{})", hex::encode(key)),
			Junction::PalletInstance(index) => write!(f, "PalletInstance({index})"),
			Junction::GeneralIndex(index) => write!(f, "GeneralIndex({index})"),
			Junction::GeneralKey { length, data } => {
				let key = data.get(..*length as usize).unwrap_or(data);
				write!(f, "GeneralKey(0x{})", hex::encode(key))
			},
			Junction::OnlyChild => write!(f, "OnlyChild"),
			Junction::Plurality { id, part } => write!(f, "Plurality({id:?}, {part:?})"),
			Junction::GlobalConsensus(network) => write!(f, "GlobalConsensus({network:?})"),
		}
	}
}

/// `GeneralIndex` in JSON: a number, or a decimal string for values that do not fit into
/// a JSON number.
mod general_index {
	use super::*;

	pub fn serialize<S: Serializer>(index: &u128, serializer: S) -> Result<S::Ok, S::Error> {
		match u64::try_from(*index) {
			Ok(index) => serializer.serialize_u64(index),
			Err(_) => serializer.collect_str(index),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
		// `deserialize_any` also works on buffered content, which has no room for `u128`
		deserializer.deserialize_any(GeneralIndexVisitor)
	}

	struct GeneralIndexVisitor;

	impl<'de> Visitor<'de> for GeneralIndexVisitor {
		type Value = u128;

		fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
			f.write_str("an unsigned integer or its decimal string")
		}

		fn visit_u64<E: de::Error>(self, value: u64) -> Result<u128, E> {
			Ok(value.into())
		}

		fn visit_u128<E: de::Error>(self, value: u128) -> Result<u128, E> {
			Ok(value)
		}

		fn visit_i64<E: de::Error>(self, value: i64) -> Result<u128, E> {
			u128::try_from(value).map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
		}

		fn visit_str<E: de::Error>(self, value: &str) -> Result<u128, E> {
			value.parse().map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
		}
	}
}

/// Error returned when building [`Junctions`] from more than [`MAX_JUNCTIONS`] items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("at most {MAX_JUNCTIONS} junctions are allowed, got {0}")]
pub struct TooManyJunctions(pub usize);

/// Ordered path of junctions, descending from some location.
///
/// `Here` is the empty path, `X1`..`X8` hold one to eight junctions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Junctions(Vec<Junction>);

impl Junctions {
	/// The empty path.
	pub const fn here() -> Self {
		Junctions(Vec::new())
	}

	/// Path of a single junction.
	pub fn x1(junction: Junction) -> Self {
		Junctions(vec![junction])
	}

	/// Returns `true` if the path is empty.
	pub fn is_here(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of junctions in the path.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Junctions of the path, in descending order.
	pub fn as_slice(&self) -> &[Junction] {
		&self.0
	}

	/// Iterate over the junctions of the path.
	pub fn iter(&self) -> impl Iterator<Item = &Junction> {
		self.0.iter()
	}

	/// Name of the path variant (`Here`, `X1`, ...).
	pub fn variant_name(&self) -> &'static str {
		JUNCTIONS_VARIANTS[self.0.len()]
	}

	/// Returns the path with `junction` appended.
	pub fn pushed_with(mut self, junction: Junction) -> Result<Self, TooManyJunctions> {
		self.0.push(junction);
		Self::try_from(self.0)
	}
}

impl TryFrom<Vec<Junction>> for Junctions {
	type Error = TooManyJunctions;

	fn try_from(junctions: Vec<Junction>) -> Result<Self, Self::Error> {
		if junctions.len() > MAX_JUNCTIONS {
			return Err(TooManyJunctions(junctions.len()))
		}
		Ok(Junctions(junctions))
	}
}

impl Encode for Junctions {
	fn size_hint(&self) -> usize {
		1 + self.0.iter().map(Encode::size_hint).sum::<usize>()
	}

	fn encode_to<T: codec::Output + ?Sized>(&self, dest: &mut T) {
		// variant index of `Junctions::X<N>` is `N`
		dest.push_byte(self.0.len() as u8);
		for junction in &self.0 {
			junction.encode_to(dest);
		}
	}
}

impl codec::EncodeLike for Junctions {}

impl Decode for Junctions {
	fn decode<I: codec::Input>(input: &mut I) -> Result<Self, codec::Error> {
		let count = input.read_byte()? as usize;
		if count > MAX_JUNCTIONS {
			return Err("Junctions variant index out of range".into())
		}

		let mut junctions = Vec::with_capacity(count);
		for _ in 0..count {
			junctions.push(Junction::decode(input)?);
		}
		Ok(Junctions(junctions))
	}
}

impl Serialize for Junctions {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let fields = if self.is_here() { 1 } else { 2 };
		let mut state = serializer.serialize_struct("Junctions", fields)?;
		state.serialize_field("type", self.variant_name())?;
		match self.0.as_slice() {
			[] => (),
			[junction] => state.serialize_field("value", junction)?,
			junctions => state.serialize_field("value", junctions)?,
		}
		state.end()
	}
}

impl<'de> Deserialize<'de> for Junctions {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_map(JunctionsVisitor)
	}
}

/// Visits `{"type": "X<N>", "value": ...}` without buffering the value, so junctions see
/// the original deserializer.
struct JunctionsVisitor;

impl<'de> Visitor<'de> for JunctionsVisitor {
	type Value = Junctions;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("junctions tagged with `Here` or `X1`..`X8`")
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Junctions, A::Error> {
		let mut variant = None;
		let mut junctions = None;
		while let Some(key) = map.next_key::<String>()? {
			match key.as_str() {
				"type" => variant = Some(map.next_value::<String>()?),
				"value" => junctions = map.next_value::<Option<OneOrMany>>()?.map(|value| value.0),
				_ => {
					map.next_value::<IgnoredAny>()?;
				},
			}
		}

		let variant = variant.ok_or_else(|| A::Error::missing_field("type"))?;
		let expected = JUNCTIONS_VARIANTS
			.iter()
			.position(|name| *name == variant)
			.ok_or_else(|| A::Error::custom(format!("unknown junctions variant `{variant}`")))?;
		let junctions = junctions.unwrap_or_default();
		if junctions.len() != expected {
			return Err(A::Error::custom(format!(
				"`{variant}` requires {expected} junctions, got {}",
				junctions.len(),
			)))
		}

		Ok(Junctions(junctions))
	}
}

/// `X1` holds a single junction, `X2`..`X8` hold an array of them.
struct OneOrMany(Vec<Junction>);

impl<'de> Deserialize<'de> for OneOrMany {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(OneOrManyVisitor)
	}
}

struct OneOrManyVisitor;

impl<'de> Visitor<'de> for OneOrManyVisitor {
	type Value = OneOrMany;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("a junction or an array of junctions")
	}

	fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<OneOrMany, A::Error> {
		Junction::deserialize(MapAccessDeserializer::new(map)).map(|junction| OneOrMany(vec![junction]))
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<OneOrMany, A::Error> {
		let mut junctions = Vec::new();
		while let Some(junction) = seq.next_element()? {
			if junctions.len() == MAX_JUNCTIONS {
				return Err(A::Error::custom(TooManyJunctions(MAX_JUNCTIONS + 1)))
			}
			junctions.push(junction);
		}
		Ok(OneOrMany(junctions))
	}
}

/// A relative path between state-bearing consensus systems.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
pub struct Location {
	/// Number of levels to ascend before descending along `interior`.
	pub parents: u8,
	/// Path to descend along after ascending.
	pub interior: Junctions,
}

impl Location {
	/// Create location from its parts.
	pub fn new(parents: u8, interior: Junctions) -> Self {
		Location { parents, interior }
	}

	/// The location of the context itself.
	pub fn here() -> Self {
		Location::new(0, Junctions::here())
	}

	/// The location of the parent consensus system (e.g. the relay chain of a parachain).
	pub fn parent() -> Self {
		Location::new(1, Junctions::here())
	}

	/// Location of a parachain, as seen from its relay chain.
	pub fn child_parachain(para_id: ParaId) -> Self {
		Location::new(0, Junctions::x1(Junction::Parachain(para_id)))
	}

	/// Location of a sibling parachain, as seen from a parachain of the same relay chain.
	pub fn sibling_parachain(para_id: ParaId) -> Self {
		Location::new(1, Junctions::x1(Junction::Parachain(para_id)))
	}

	/// Structural comparison with the given shape: same number of parents, same number of
	/// junctions and the same junctions in the same order.
	pub fn matches(&self, parents: u8, interior: &[Junction]) -> bool {
		self.parents == parents && self.interior.as_slice() == interior
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		if self.parents == 0 && self.interior.is_here() {
			return write!(f, "Here")
		}

		let mut segments = std::iter::repeat("..".to_string())
			.take(self.parents as usize)
			.chain(self.interior.iter().map(ToString::to_string));
		if let Some(first) = segments.next() {
			write!(f, "{first}")?;
		}
		for segment in segments {
			write!(f, "/{segment}")?;
		}
		Ok(())
	}
}

/// A [`Location`] tagged with the XCM version it was expressed in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum VersionedLocation {
	/// XCM v3 location.
	#[codec(index = 3)]
	V3(Location),
	/// XCM v4 location.
	#[codec(index = 4)]
	V4(Location),
	/// XCM v5 location.
	#[codec(index = 5)]
	V5(Location),
}

impl VersionedLocation {
	/// Wrap location into the given XCM version, if that version is known.
	pub fn from_version(version: XcmVersion, location: Location) -> Option<Self> {
		match version {
			3 => Some(VersionedLocation::V3(location)),
			4 => Some(VersionedLocation::V4(location)),
			5 => Some(VersionedLocation::V5(location)),
			_ => None,
		}
	}

	/// XCM version of this location.
	pub fn version(&self) -> XcmVersion {
		match self {
			VersionedLocation::V3(_) => 3,
			VersionedLocation::V4(_) => 4,
			VersionedLocation::V5(_) => 5,
		}
	}

	/// Reference to the wrapped location.
	pub fn location(&self) -> &Location {
		match self {
			VersionedLocation::V3(location) |
			VersionedLocation::V4(location) |
			VersionedLocation::V5(location) => location,
		}
	}

	/// Return `location`, tagged with the same version as `self`.
	pub fn with_location(&self, location: Location) -> Self {
		match self {
			VersionedLocation::V3(_) => VersionedLocation::V3(location),
			VersionedLocation::V4(_) => VersionedLocation::V4(location),
			VersionedLocation::V5(_) => VersionedLocation::V5(location),
		}
	}

	/// Structural comparison of the wrapped locations. Versions are not compared.
	pub fn structurally_eq(&self, other: &VersionedLocation) -> bool {
		let other = other.location();
		self.matches(other.parents, other.interior.as_slice())
	}

	/// Structural comparison of the wrapped location with the given shape.
	pub fn matches(&self, parents: u8, interior: &[Junction]) -> bool {
		self.location().matches(parents, interior)
	}
}

impl fmt::Display for VersionedLocation {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "V{}:{}", self.version(), self.location())
	}
}
