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

//! Origins a call may be dispatched with on the first hop.

use crate::chain::Chain;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{Display, EnumIter, EnumString, VariantNames};

/// Origin parsing error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OriginParseError {
	/// Signed origin without an account.
	#[error("account address is required for the signed origin")]
	MissingAccount,
	/// Account is given to an origin that is not signed.
	#[error("account address is only accepted by the signed origin, not by `{0}`")]
	UnexpectedAccount(String),
	/// Account address is empty or contains whitespace.
	#[error("account address {0:?} is not valid")]
	InvalidAccount(String),
	/// Origin name is not known.
	#[error("unknown origin `{0}`")]
	UnknownOrigin(String),
}

/// Address of the signed origin account.
///
/// It is kept exactly as it has been entered (SS58 or hex), since the runtime is the one
/// that decodes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountAddress(String);

impl AccountAddress {
	/// Return the address as it has been entered.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl TryFrom<String> for AccountAddress {
	type Error = OriginParseError;

	fn try_from(address: String) -> Result<Self, Self::Error> {
		if address.is_empty() || address.chars().any(char::is_whitespace) {
			return Err(OriginParseError::InvalidAccount(address))
		}
		Ok(AccountAddress(address))
	}
}

impl From<AccountAddress> for String {
	fn from(address: AccountAddress) -> String {
		address.0
	}
}

impl FromStr for AccountAddress {
	type Err = OriginParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		AccountAddress::try_from(s.to_owned())
	}
}

impl fmt::Display for AccountAddress {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// OpenGov custom origins of relay chain runtimes.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	Hash,
	Serialize,
	Deserialize,
	EnumString,
	Display,
	EnumIter,
	VariantNames,
)]
pub enum GovernanceOrigin {
	/// Origin for cancelling slashes and managing election provider.
	StakingAdmin,
	/// Origin for spending (any amount of) funds.
	Treasurer,
	/// Origin for managing the composition of the fellowship.
	FellowshipAdmin,
	/// Origin for managing the registrar.
	GeneralAdmin,
	/// Origin for starting auctions.
	AuctionAdmin,
	/// Origin able to force slot leases.
	LeaseAdmin,
	/// Origin able to cancel referenda.
	ReferendumCanceller,
	/// Origin able to kill referenda.
	ReferendumKiller,
	/// Origin able to spend up to 250 DOT from the treasury at once.
	SmallTipper,
	/// Origin able to spend up to 1,000 DOT from the treasury at once.
	BigTipper,
	/// Origin able to spend up to 10,000 DOT from the treasury at once.
	SmallSpender,
	/// Origin able to spend up to 100,000 DOT from the treasury at once.
	MediumSpender,
	/// Origin able to spend up to 1,000,000 DOT from the treasury at once.
	BigSpender,
	/// Origin able to dispatch a whitelisted call.
	WhitelistedCaller,
	/// Origin for signaling that the network wishes for some change.
	WishForChange,
}

/// Origin of the call, dispatched at the first hop.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Origin {
	/// The root origin.
	Root,
	/// The unsigned origin.
	None,
	/// Origin of the given account.
	Signed(AccountAddress),
	/// One of OpenGov custom origins.
	Governance(GovernanceOrigin),
}

impl Origin {
	/// Origin name, as used in the shareable request links: `root`, `none`, `signed` or
	/// the governance origin name.
	pub fn kind(&self) -> String {
		match self {
			Origin::Root => "root".into(),
			Origin::None => "none".into(),
			Origin::Signed(_) => "signed".into(),
			Origin::Governance(origin) => origin.to_string(),
		}
	}

	/// Account of the signed origin.
	pub fn account(&self) -> Option<&AccountAddress> {
		match self {
			Origin::Signed(account) => Some(account),
			_ => None,
		}
	}

	/// Build origin from its name and optional account.
	pub fn from_parts(kind: &str, account: Option<&str>) -> Result<Self, OriginParseError> {
		let origin = match kind {
			"root" => Origin::Root,
			"none" => Origin::None,
			"signed" => {
				let account = account.ok_or(OriginParseError::MissingAccount)?;
				return Ok(Origin::Signed(account.parse()?))
			},
			_ => GovernanceOrigin::from_str(kind)
				.map(Origin::Governance)
				.map_err(|_| OriginParseError::UnknownOrigin(kind.into()))?,
		};

		match account {
			Some(_) => Err(OriginParseError::UnexpectedAccount(kind.into())),
			None => Ok(origin),
		}
	}

	/// Returns `true` if the origin may be used on the given chain.
	pub fn is_supported_by(&self, chain: Chain) -> bool {
		match self {
			Origin::Governance(_) => chain.accepts_governance_origins(),
			Origin::Root | Origin::None | Origin::Signed(_) => true,
		}
	}
}

impl fmt::Display for Origin {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Origin::Signed(account) => write!(f, "signed({account})"),
			_ => f.write_str(&self.kind()),
		}
	}
}
