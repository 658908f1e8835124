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

use std::path::PathBuf;

use libp2p::identity::DecodingError;

use crate::keys::{MAX_RSA_BITS, MIN_RSA_BITS};

#[derive(Debug, thiserror::Error)]
pub enum KeygenError {
    #[error("unrecognized key type: {0}")]
    UnrecognizedKeyType(String),
    #[error(
        "invalid RSA key size {0}: must be between {min} and {max} bits",
        min = MIN_RSA_BITS,
        max = MAX_RSA_BITS
    )]
    InvalidBitSize(i64),
    #[error("RSA key generation failed: {0}")]
    Generation(#[from] rsa::Error),
    #[error("PKCS#1 error: {0}")]
    Pkcs1(#[from] rsa::pkcs1::Error),
    #[error("PKCS#8 error: {0}")]
    Pkcs8(#[from] rsa::pkcs8::Error),
    #[error("Invalid key: {0}")]
    InvalidKey(#[from] DecodingError),
    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Invalid private key message: {0}")]
    Protobuf(#[from] prost::DecodeError),
    #[error("Unsupported private key type: {0}")]
    UnsupportedEncoding(i32),
    #[error("failed to write {what} to {}: {error}", path.display())]
    Io {
        what: &'static str,
        path: PathBuf,
        error: std::io::Error,
    },
}
