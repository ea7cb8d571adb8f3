use ed25519_dalek::SigningKey;
use prost::Message;
use zeroize::{Zeroize, Zeroizing};

use super::{random_key, KEY_VERSION};
use crate::proto::{self, KeyMaterialType};
use crate::{KeyManager, KeysetError, KeysetResult};

pub const ED25519_PRIVATE_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.Ed25519PrivateKey";
pub const ED25519_PUBLIC_TYPE_URL: &str = "type.googleapis.com/google.crypto.tink.Ed25519PublicKey";

/// Length of both the private key seed and the public key
pub const ED25519_KEY_LEN: usize = ed25519_dalek::SECRET_KEY_LENGTH;

/// Ed25519 (RFC 8032) signing keys
///
/// The private key stores the 32 byte seed alongside the public key; public key data is
/// derived from the seed and must agree with the stored public key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519PrivateKeyManager;

fn invalid_key(reason: impl Into<String>) -> KeysetError {
    KeysetError::InvalidKey {
        type_url: ED25519_PRIVATE_TYPE_URL,
        reason: reason.into(),
    }
}

/// The public key belonging to `seed`
pub fn ed25519_public_key(seed: &[u8; ED25519_KEY_LEN]) -> proto::Ed25519PublicKey {
    let signing_key = SigningKey::from_bytes(seed);
    proto::Ed25519PublicKey {
        version: KEY_VERSION,
        key_value: signing_key.verifying_key().to_bytes().to_vec(),
    }
}

/// Serialized private key for `seed`
pub fn ed25519_private_key(seed: &[u8; ED25519_KEY_LEN]) -> Vec<u8> {
    let mut key = proto::Ed25519PrivateKey {
        version: KEY_VERSION,
        key_value: seed.to_vec(),
        public_key: Some(ed25519_public_key(seed)),
    };
    let serialized = key.encode_to_vec();
    key.key_value.zeroize();
    serialized
}

impl KeyManager for Ed25519PrivateKeyManager {
    fn type_url(&self) -> &'static str {
        ED25519_PRIVATE_TYPE_URL
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::AsymmetricPrivate
    }

    fn new_key(&self, serialized_key_format: &[u8]) -> KeysetResult<Vec<u8>> {
        let format = proto::Ed25519KeyFormat::decode(serialized_key_format)
            .map_err(KeysetError::decode("Ed25519KeyFormat"))?;
        if format.version > KEY_VERSION {
            return Err(KeysetError::InvalidKeyFormat {
                type_url: ED25519_PRIVATE_TYPE_URL,
                reason: format!("unsupported version {}", format.version),
            });
        }

        let seed = random_key::<ED25519_KEY_LEN>();
        Ok(ed25519_private_key(&seed))
    }

    fn public_key_data(&self, serialized_private_key: &[u8]) -> KeysetResult<proto::KeyData> {
        let mut key = proto::Ed25519PrivateKey::decode(serialized_private_key)
            .map_err(KeysetError::decode("Ed25519PrivateKey"))?;
        let seed_bytes = Zeroizing::new(std::mem::take(&mut key.key_value));
        let seed: Zeroizing<[u8; ED25519_KEY_LEN]> = Zeroizing::new(
            seed_bytes
                .as_slice()
                .try_into()
                .map_err(|_| invalid_key(format!("seed has {} bytes", seed_bytes.len())))?,
        );

        if key.version > KEY_VERSION {
            return Err(invalid_key(format!("unsupported version {}", key.version)));
        }

        let public = ed25519_public_key(&seed);
        if let Some(stored) = key.public_key.as_ref() {
            if stored.key_value != public.key_value {
                return Err(invalid_key("stored public key does not match the seed"));
            }
        }

        Ok(proto::KeyData {
            type_url: ED25519_PUBLIC_TYPE_URL.to_owned(),
            value: public.encode_to_vec(),
            key_material_type: KeyMaterialType::AsymmetricPublic as i32,
        })
    }
}
