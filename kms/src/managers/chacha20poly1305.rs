use prost::Message;
use zeroize::Zeroize;

use super::{random_key, KEY_VERSION};
use crate::proto::{self, KeyMaterialType};
use crate::{KeyManager, KeysetError, KeysetResult};

pub const CHACHA20_POLY1305_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.ChaCha20Poly1305Key";

pub const CHACHA20_POLY1305_KEY_LEN: usize = 32;

/// Keys for ChaCha20-Poly1305 (RFC 8439); the key format carries no parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaCha20Poly1305KeyManager;

impl KeyManager for ChaCha20Poly1305KeyManager {
    fn type_url(&self) -> &'static str {
        CHACHA20_POLY1305_TYPE_URL
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::Symmetric
    }

    fn new_key(&self, serialized_key_format: &[u8]) -> KeysetResult<Vec<u8>> {
        proto::ChaCha20Poly1305KeyFormat::decode(serialized_key_format)
            .map_err(KeysetError::decode("ChaCha20Poly1305KeyFormat"))?;

        let mut key = proto::ChaCha20Poly1305Key {
            version: KEY_VERSION,
            key_value: random_key::<CHACHA20_POLY1305_KEY_LEN>().to_vec(),
        };
        let serialized = key.encode_to_vec();
        key.key_value.zeroize();
        Ok(serialized)
    }
}
