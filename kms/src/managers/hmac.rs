use prost::Message;
use zeroize::{Zeroize, Zeroizing};

use super::KEY_VERSION;
use crate::proto::{self, HashType, KeyMaterialType};
use crate::{KeyManager, KeysetError, KeysetResult};

pub const HMAC_TYPE_URL: &str = "type.googleapis.com/google.crypto.tink.HmacKey";

/// Shortest key accepted
pub const HMAC_MIN_KEY_LEN: u32 = 16;

/// Shortest tag accepted
pub const HMAC_MIN_TAG_LEN: u32 = 10;

/// Largest key generated; guards against absurd allocations from hostile formats
pub const HMAC_MAX_KEY_LEN: u32 = 1024;

/// Keys for HMAC over the SHA-1 and SHA-2 hash functions
#[derive(Debug, Clone, Copy, Default)]
pub struct HmacKeyManager;

fn invalid_format(reason: impl Into<String>) -> KeysetError {
    KeysetError::InvalidKeyFormat {
        type_url: HMAC_TYPE_URL,
        reason: reason.into(),
    }
}

/// Digest size in bytes; the upper bound for the tag size
fn digest_len(hash: HashType) -> Option<u32> {
    use HashType as H;
    match hash {
        H::Sha1 => Some(20),
        H::Sha224 => Some(28),
        H::Sha256 => Some(32),
        H::Sha384 => Some(48),
        H::Sha512 => Some(64),
        H::UnknownHash => None,
    }
}

fn validate_params(params: Option<&proto::HmacParams>) -> KeysetResult<()> {
    let params = params.ok_or_else(|| invalid_format("missing params"))?;
    let max_tag_len = HashType::try_from(params.hash)
        .ok()
        .and_then(digest_len)
        .ok_or_else(|| invalid_format(format!("unknown hash type {}", params.hash)))?;

    if params.tag_size < HMAC_MIN_TAG_LEN {
        return Err(invalid_format(format!(
            "tag size {} is too small",
            params.tag_size
        )));
    }
    if params.tag_size > max_tag_len {
        return Err(invalid_format(format!(
            "tag size {} exceeds digest size {max_tag_len}",
            params.tag_size
        )));
    }
    Ok(())
}

impl KeyManager for HmacKeyManager {
    fn type_url(&self) -> &'static str {
        HMAC_TYPE_URL
    }

    fn key_material_type(&self) -> KeyMaterialType {
        KeyMaterialType::Symmetric
    }

    fn new_key(&self, serialized_key_format: &[u8]) -> KeysetResult<Vec<u8>> {
        let format = proto::HmacKeyFormat::decode(serialized_key_format)
            .map_err(KeysetError::decode("HmacKeyFormat"))?;

        if format.version > KEY_VERSION {
            return Err(invalid_format(format!(
                "unsupported version {}",
                format.version
            )));
        }
        if !(HMAC_MIN_KEY_LEN..=HMAC_MAX_KEY_LEN).contains(&format.key_size) {
            return Err(invalid_format(format!(
                "key size {} is out of range",
                format.key_size
            )));
        }
        validate_params(format.params.as_ref())?;

        let mut key_value = Zeroizing::new(vec![0u8; format.key_size as usize]);
        rand::RngCore::fill_bytes(&mut rand::rngs::OsRng, &mut key_value[..]);

        let mut key = proto::HmacKey {
            version: KEY_VERSION,
            params: format.params,
            key_value: key_value.to_vec(),
        };
        let serialized = key.encode_to_vec();
        key.key_value.zeroize();
        Ok(serialized)
    }
}
