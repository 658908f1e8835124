// peer-keygen, libp2p identity generator for the SQD Network.
// Copyright (C) 2024 Subsquid Labs GmbH

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

pub mod cli;
mod error;
pub mod keys;
pub mod output;

pub use cli::Cli;
pub use error::KeygenError;
pub use keys::{decode_private_key, GeneratedKey, KeyType};
pub use output::Output;

pub use libp2p::{identity::Keypair, PeerId};
