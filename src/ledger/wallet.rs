//! Key management and transaction signing.
//!
//! # Security
//! - Private keys are loaded ONLY from the environment or generated in-process
//! - Keys are never logged or serialized
//! - `Debug` output shows the public key only

use std::fmt;

use alloy::primitives::{hex, keccak256, Address};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::ledger::proto;
use crate::ledger::types::{LedgerError, LedgerResult};

/// DER prefix of a PKCS#8 secp256k1 private key with a 32-byte raw key appended.
const DER_PRIVATE_PREFIX: &str = "3030020100300706052b8104000a04220420";

/// DER prefix of a SPKI secp256k1 public key with a 33-byte compressed point appended.
const DER_PUBLIC_PREFIX: &str = "302d300706052a8648ce3d020106052b8104000a032200";

/// ECDSA secp256k1 private key.
#[derive(Clone)]
pub struct PrivateKey {
    signer: PrivateKeySigner,
}

impl PrivateKey {
    /// Parse a hex-encoded key: raw 32 bytes (optionally `0x`-prefixed) or
    /// the DER form exported by the ledger portal.
    pub fn from_str_ecdsa(key_hex: &str) -> LedgerResult<Self> {
        let trimmed = key_hex.trim();
        let key_hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let raw = key_hex.strip_prefix(DER_PRIVATE_PREFIX).unwrap_or(key_hex);

        let bytes = hex::decode(raw)
            .map_err(|e| LedgerError::InvalidKey(format!("Invalid private key format: {}", e)))?;
        if bytes.len() != 32 {
            return Err(LedgerError::InvalidKey(format!(
                "Invalid private key length: expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let signer = PrivateKeySigner::from_slice(&bytes)
            .map_err(|e| LedgerError::InvalidKey(format!("Invalid private key: {}", e)))?;
        Ok(Self { signer })
    }

    /// Generate a fresh random key.
    pub fn generate_ecdsa() -> Self {
        Self {
            signer: PrivateKeySigner::random(),
        }
    }

    /// The matching public key.
    pub fn public_key(&self) -> PublicKey {
        let point = self
            .signer
            .credential()
            .verifying_key()
            .to_encoded_point(true);
        PublicKey {
            compressed: point.as_bytes().to_vec(),
            address: self.signer.address(),
        }
    }

    /// Sign `message` the way the network verifies ECDSA keys: keccak-256
    /// digest, 64-byte `r || s` signature with low `s`.
    pub fn sign(&self, message: &[u8]) -> LedgerResult<Vec<u8>> {
        let digest = keccak256(message);
        let signature = self
            .signer
            .sign_hash_sync(&digest)
            .map_err(|e| LedgerError::InvalidKey(format!("Signing failed: {}", e)))?;
        Ok(signature.as_bytes()[..64].to_vec())
    }

    /// Signature pair for a signature map.
    pub(crate) fn signature_pair(&self, message: &[u8]) -> LedgerResult<proto::SignaturePair> {
        Ok(proto::SignaturePair {
            pub_key_prefix: self.public_key().to_bytes(),
            signature: Some(proto::signature_pair::Signature::EcdsaSecp256k1(
                self.sign(message)?,
            )),
        })
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey")
            .field("public_key", &self.public_key().to_string())
            .finish_non_exhaustive()
    }
}

/// Compressed ECDSA secp256k1 public key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    compressed: Vec<u8>,
    address: Address,
}

impl PublicKey {
    /// The 33-byte compressed SEC1 point.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.compressed.clone()
    }

    /// EVM address derived from the key.
    pub fn evm_address(&self) -> Address {
        self.address
    }
}

impl From<&PublicKey> for proto::Key {
    fn from(key: &PublicKey) -> Self {
        proto::Key {
            key: Some(proto::key::Key::EcdsaSecp256k1(key.to_bytes())),
        }
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", DER_PUBLIC_PREFIX, hex::encode(&self.compressed))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}
