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

use std::{
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use base64::{prelude::BASE64_STANDARD, Engine};
use libp2p::{
    identity::{ed25519, Keypair},
    PeerId,
};
use prost::Message;
use rand::{rngs::OsRng, CryptoRng, RngCore};
use rsa::{
    pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey},
    pkcs8::EncodePrivateKey,
    RsaPrivateKey,
};

use crate::KeygenError;

pub const DEFAULT_RSA_BITS: i64 = 2048;
pub const MIN_RSA_BITS: i64 = 2048;
/// Largest modulus libp2p will load back from PKCS#8.
pub const MAX_RSA_BITS: i64 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Rsa,
    Ed25519,
}

impl FromStr for KeyType {
    type Err = KeygenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rsa" => Ok(Self::Rsa),
            "ed25519" => Ok(Self::Ed25519),
            _ => Err(KeygenError::UnrecognizedKeyType(s.to_owned())),
        }
    }
}

impl Display for KeyType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rsa => f.write_str("RSA"),
            Self::Ed25519 => f.write_str("Ed25519"),
        }
    }
}

/// Key type tags of the libp2p `PrivateKey` protobuf message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ProtoKeyType {
    Rsa = 0,
    Ed25519 = 1,
    Secp256k1 = 2,
    Ecdsa = 3,
}

/// libp2p private key envelope. Both fields are proto2 `required`, so the type
/// tag is written even for RSA (`0`).
#[derive(Clone, PartialEq, prost::Message)]
#[prost(skip_debug)]
pub struct PrivateKey {
    #[prost(enumeration = "ProtoKeyType", required, tag = "1")]
    pub key_type: i32,
    #[prost(bytes = "vec", required, tag = "2")]
    pub data: Vec<u8>,
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PrivateKey {{ key_type: {}, data: <{} bytes> }}",
            self.key_type,
            self.data.len()
        )
    }
}

/// A freshly generated key pair together with its serialized private key.
pub struct GeneratedKey {
    key_type: KeyType,
    keypair: Keypair,
    encoded: Vec<u8>,
}

impl GeneratedKey {
    pub fn generate(key_type: KeyType, bits: i64) -> Result<Self, KeygenError> {
        Self::generate_with_rng(&mut OsRng, key_type, bits)
    }

    /// Generates a key pair drawing all randomness from `rng`.
    ///
    /// `bits` is the RSA modulus size and must lie in
    /// `MIN_RSA_BITS..=MAX_RSA_BITS`. It is ignored for Ed25519.
    pub fn generate_with_rng<R: RngCore + CryptoRng>(
        rng: &mut R,
        key_type: KeyType,
        bits: i64,
    ) -> Result<Self, KeygenError> {
        match key_type {
            KeyType::Rsa => Self::generate_rsa(rng, bits),
            KeyType::Ed25519 => {
                log::debug!("Ignoring bit size {bits} for Ed25519 key");
                Self::generate_ed25519(rng)
            }
        }
    }

    fn generate_ed25519<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, KeygenError> {
        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let secret = ed25519::SecretKey::try_from_bytes(&mut seed)?;
        let keypair = ed25519::Keypair::from(secret);
        let encoded = PrivateKey {
            key_type: ProtoKeyType::Ed25519.into(),
            data: keypair.to_bytes().to_vec(),
        }
        .encode_to_vec();
        Ok(Self {
            key_type: KeyType::Ed25519,
            keypair: keypair.into(),
            encoded,
        })
    }

    fn generate_rsa<R: RngCore + CryptoRng>(rng: &mut R, bits: i64) -> Result<Self, KeygenError> {
        if !(MIN_RSA_BITS..=MAX_RSA_BITS).contains(&bits) {
            return Err(KeygenError::InvalidBitSize(bits));
        }
        let size = usize::try_from(bits).map_err(|_| KeygenError::InvalidBitSize(bits))?;
        log::debug!("Generating {size}-bit RSA key");
        let private_key = RsaPrivateKey::new(rng, size)?;
        let keypair = rsa_keypair(&private_key)?;
        let encoded = PrivateKey {
            key_type: ProtoKeyType::Rsa.into(),
            data: private_key.to_pkcs1_der()?.as_bytes().to_vec(),
        }
        .encode_to_vec();
        Ok(Self {
            key_type: KeyType::Rsa,
            keypair,
            encoded,
        })
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }

    pub fn peer_id(&self) -> PeerId {
        self.keypair.public().to_peer_id()
    }

    /// Protobuf-encoded `PrivateKey` message.
    pub fn to_protobuf_encoding(&self) -> &[u8] {
        &self.encoded
    }

    pub fn to_base64(&self) -> String {
        BASE64_STANDARD.encode(&self.encoded)
    }
}

fn rsa_keypair(private_key: &RsaPrivateKey) -> Result<Keypair, KeygenError> {
    let mut der = private_key.to_pkcs8_der()?.to_bytes();
    Ok(Keypair::rsa_from_pkcs8(der.as_mut_slice())?)
}

/// Decodes the base64 text written by the generator back into a key pair.
pub fn decode_private_key(encoded: &str) -> Result<Keypair, KeygenError> {
    let bytes = BASE64_STANDARD.decode(encoded.trim())?;
    decode_protobuf(&bytes)
}

pub fn decode_protobuf(bytes: &[u8]) -> Result<Keypair, KeygenError> {
    let mut message = PrivateKey::decode(bytes)?;
    match ProtoKeyType::try_from(message.key_type) {
        Ok(ProtoKeyType::Ed25519) => {
            Ok(ed25519::Keypair::try_from_bytes(&mut message.data)?.into())
        }
        Ok(ProtoKeyType::Rsa) => rsa_keypair(&RsaPrivateKey::from_pkcs1_der(&message.data)?),
        _ => Err(KeygenError::UnsupportedEncoding(message.key_type)),
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn test_key_type_parsing() {
        assert_eq!("RSA".parse::<KeyType>().unwrap(), KeyType::Rsa);
        assert_eq!("rsa".parse::<KeyType>().unwrap(), KeyType::Rsa);
        assert_eq!("Ed25519".parse::<KeyType>().unwrap(), KeyType::Ed25519);
        assert_eq!("ED25519".parse::<KeyType>().unwrap(), KeyType::Ed25519);
        let err = "secp256k1".parse::<KeyType>().unwrap_err();
        assert!(matches!(err, KeygenError::UnrecognizedKeyType(ref t) if t == "secp256k1"));
        assert_eq!(err.to_string(), "unrecognized key type: secp256k1");
    }

    #[test]
    fn test_seeded_ed25519_is_stable() {
        let first = GeneratedKey::generate_with_rng(
            &mut StdRng::seed_from_u64(7),
            KeyType::Ed25519,
            DEFAULT_RSA_BITS,
        )
        .unwrap();
        let second = GeneratedKey::generate_with_rng(
            &mut StdRng::seed_from_u64(7),
            KeyType::Ed25519,
            DEFAULT_RSA_BITS,
        )
        .unwrap();
        let other = GeneratedKey::generate_with_rng(
            &mut StdRng::seed_from_u64(8),
            KeyType::Ed25519,
            DEFAULT_RSA_BITS,
        )
        .unwrap();

        assert_eq!(first.peer_id(), second.peer_id());
        assert_eq!(first.to_base64(), second.to_base64());
        assert_ne!(first.peer_id(), other.peer_id());

        let rendered = first.peer_id().to_string();
        assert!(rendered.starts_with("12D3KooW"), "{rendered}");
        assert_eq!(rendered.parse::<PeerId>().unwrap(), first.peer_id());
    }

    #[test]
    fn test_ed25519_ignores_bit_size() {
        let key = GeneratedKey::generate(KeyType::Ed25519, -1).unwrap();
        assert_eq!(key.key_type(), KeyType::Ed25519);
    }

    #[test]
    fn test_ed25519_encoding_matches_libp2p() {
        let key = GeneratedKey::generate(KeyType::Ed25519, DEFAULT_RSA_BITS).unwrap();
        let expected = key.keypair().to_protobuf_encoding().unwrap();
        assert_eq!(key.to_protobuf_encoding(), expected.as_slice());
        assert_eq!(key.to_protobuf_encoding().len(), 4 + 64);
    }

    #[test]
    fn test_base64_round_trip() {
        let key = GeneratedKey::generate(KeyType::Ed25519, DEFAULT_RSA_BITS).unwrap();
        let b64 = key.to_base64();
        assert_eq!(
            BASE64_STANDARD.decode(&b64).unwrap(),
            key.to_protobuf_encoding()
        );

        let decoded = decode_private_key(&b64).unwrap();
        assert_eq!(decoded.public().to_peer_id(), key.peer_id());
    }

    #[test]
    fn test_rsa_bit_size_bounds() {
        for bits in [-1, 0, 512, 1024, 2047, 4097, 8192] {
            let err = GeneratedKey::generate(KeyType::Rsa, bits).err().unwrap();
            assert!(matches!(err, KeygenError::InvalidBitSize(b) if b == bits));
        }
    }

    #[test]
    fn test_rsa_key() {
        let key = GeneratedKey::generate_with_rng(
            &mut StdRng::seed_from_u64(42),
            KeyType::Rsa,
            DEFAULT_RSA_BITS,
        )
        .unwrap();
        assert_eq!(key.key_type(), KeyType::Rsa);

        let encoded = key.to_protobuf_encoding();
        assert_eq!(&encoded[..3], &[0x08, 0x00, 0x12]);
        let message = PrivateKey::decode(encoded).unwrap();
        assert_eq!(ProtoKeyType::try_from(message.key_type), Ok(ProtoKeyType::Rsa));
        let private_key = RsaPrivateKey::from_pkcs1_der(&message.data).unwrap();
        assert_eq!(rsa::traits::PublicKeyParts::size(&private_key), 256);

        let rendered = key.peer_id().to_string();
        assert!(rendered.starts_with("Qm"), "{rendered}");

        let decoded = decode_private_key(&key.to_base64()).unwrap();
        assert_eq!(decoded.public().to_peer_id(), key.peer_id());
    }

    #[test]
    fn test_seeded_rsa_is_stable() {
        let first = GeneratedKey::generate_with_rng(
            &mut StdRng::seed_from_u64(42),
            KeyType::Rsa,
            DEFAULT_RSA_BITS,
        )
        .unwrap();
        let second = GeneratedKey::generate_with_rng(
            &mut StdRng::seed_from_u64(42),
            KeyType::Rsa,
            DEFAULT_RSA_BITS,
        )
        .unwrap();
        assert_eq!(first.peer_id(), second.peer_id());
        assert_eq!(first.to_protobuf_encoding(), second.to_protobuf_encoding());
    }

    #[test]
    fn test_rsa_largest_key() {
        let key = GeneratedKey::generate_with_rng(
            &mut StdRng::seed_from_u64(3),
            KeyType::Rsa,
            MAX_RSA_BITS,
        )
        .unwrap();
        let message = PrivateKey::decode(key.to_protobuf_encoding()).unwrap();
        let private_key = RsaPrivateKey::from_pkcs1_der(&message.data).unwrap();
        assert_eq!(rsa::traits::PublicKeyParts::size(&private_key), 512);

        let decoded = decode_private_key(&key.to_base64()).unwrap();
        assert_eq!(decoded.public().to_peer_id(), key.peer_id());
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_private_key("not base64!"),
            Err(KeygenError::Base64(_))
        ));
        assert!(matches!(
            decode_protobuf(&[0xff, 0xff, 0xff]),
            Err(KeygenError::Protobuf(_))
        ));

        let secp = PrivateKey {
            key_type: ProtoKeyType::Secp256k1.into(),
            data: vec![1; 32],
        };
        assert!(matches!(
            decode_protobuf(&secp.encode_to_vec()),
            Err(KeygenError::UnsupportedEncoding(2))
        ));

        let truncated = PrivateKey {
            key_type: ProtoKeyType::Ed25519.into(),
            data: vec![1; 10],
        };
        assert!(matches!(
            decode_protobuf(&truncated.encode_to_vec()),
            Err(KeygenError::InvalidKey(_))
        ));
    }
}
