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

//! Dry-run request and its shareable form.
//!
//! The request is shared as a URL query: `chain=westend&origin=signed&account=5Grw..&call=0x..`.
//! Chain, origin, account and the call are kept exactly as they have been entered.

use crate::error::{Error, Result};

use bp_xcm_hops::{Chain, Origin};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const CHAIN_KEY: &str = "chain";
const ORIGIN_KEY: &str = "origin";
const ACCOUNT_KEY: &str = "account";
const CALL_KEY: &str = "call";

/// Request to dry-run the call at the chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DryRunRequest {
	/// Chain where the call is dispatched.
	pub chain: Chain,
	/// Origin of the call.
	pub origin: Origin,
	/// Hex-encoded call, as entered by the user.
	pub call: String,
}

impl DryRunRequest {
	/// Encode the request as a URL query.
	pub fn to_query(&self) -> String {
		let mut query = url::form_urlencoded::Serializer::new(String::new());
		query.append_pair(CHAIN_KEY, &self.chain.to_string());
		query.append_pair(ORIGIN_KEY, &self.origin.kind());
		if let Some(account) = self.origin.account() {
			query.append_pair(ACCOUNT_KEY, account.as_str());
		}
		query.append_pair(CALL_KEY, &self.call);
		query.finish()
	}

	/// Decode the request from a URL query or from the whole URL.
	pub fn from_query(query: &str) -> Result<Self> {
		let query = query.split_once('?').map_or(query, |(_, query)| query);
		let query = query.split_once('#').map_or(query, |(query, _)| query);

		let mut chain = None;
		let mut origin = None;
		let mut account = None;
		let mut call = None;
		for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
			let slot = match key.as_ref() {
				CHAIN_KEY => &mut chain,
				ORIGIN_KEY => &mut origin,
				ACCOUNT_KEY => &mut account,
				CALL_KEY => &mut call,
				_ => continue,
			};
			if slot.replace(value.into_owned()).is_some() {
				return Err(Error::InvalidLink(format!("`{key}` is given more than once")))
			}
		}

		let missing = |key: &str| Error::InvalidLink(format!("`{key}` is missing"));
		let chain = chain.ok_or_else(|| missing(CHAIN_KEY))?;
		let chain = Chain::from_str(&chain)
			.map_err(|_| Error::InvalidLink(format!("unknown chain `{chain}`")))?;
		let origin = Origin::from_parts(&origin.ok_or_else(|| missing(ORIGIN_KEY))?, account.as_deref())?;
		let call = call.ok_or_else(|| missing(CALL_KEY))?;

		Ok(DryRunRequest { chain, origin, call })
	}
}
