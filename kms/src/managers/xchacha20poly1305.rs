use prost::Message;
use zeroize::Zeroize;

use super::{random_key, KEY_VERSION};
use crate::proto::{self, KeyMaterialType};
use crate::{KeyManager, KeysetError, KeysetResult};

pub const XCHACHA20_POLY1305_TYPE_URL: &str =
    "type.googleapis.com/google.crypto.tink.XChaCha20Poly1305Key";

pub const XCHACHA20_POLY1305_KEY_LEN: usize = 32;

/// Keys for XChaCha20-Poly1305
#[derive(Debug, Clone, Copy, Default)]
pub struct XChaCha20Poly1305KeyManager;

impl KeyManager for XChaCha20Poly1305KeyManager {
    fn type_url(&self) -> &'static str {
        XCHACHA20_POLY1305_TYPE_URL
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::Symmetric
    }

    fn new_key(&self, serialized_key_format: &[u8]) -> KeysetResult<Vec<u8>> {
        let format = proto::XChaCha20Poly1305KeyFormat::decode(serialized_key_format)
            .map_err(KeysetError::decode("XChaCha20Poly1305KeyFormat"))?;
        if format.version > KEY_VERSION {
            return Err(KeysetError::InvalidKeyFormat {
                type_url: XCHACHA20_POLY1305_TYPE_URL,
                reason: format!("unsupported version {}", format.version),
            });
        }

        let mut key = proto::XChaCha20Poly1305Key {
            version: KEY_VERSION,
            key_value: random_key::<XCHACHA20_POLY1305_KEY_LEN>().to_vec(),
        };
        let serialized = key.encode_to_vec();
        key.key_value.zeroize();
        Ok(serialized)
    }
}
