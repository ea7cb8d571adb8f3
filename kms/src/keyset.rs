//! Keyset construction, validation and the binary keyset codec.

use std::io;

use prost::Message;
use rand::Rng;

use crate::proto::{self, keyset::Key, KeyMaterialType, KeyStatusType};
use crate::{KeysetError, KeysetResult, OutputPrefixType};

fn invalid(reason: impl Into<String>) -> KeysetError {
    KeysetError::InvalidKeyset(reason.into())
}

/// Parse a keyset from its binary encoding
pub fn read_binary(buf: &[u8]) -> KeysetResult<proto::Keyset> {
    proto::Keyset::decode(buf).map_err(KeysetError::decode("keyset"))
}

/// Write the binary encoding of `keyset` to `out`
pub fn write_binary(keyset: &proto::Keyset, out: &mut dyn io::Write) -> io::Result<()> {
    out.write_all(&keyset.encode_to_vec())?;
    out.flush()
}

/// Random key id; non-zero and fits into 31 bits so implementations using signed
/// integers for key ids agree on its value
pub fn new_key_id() -> u32 {
    rand::thread_rng().gen_range(1..=i32::MAX as u32)
}

/// A keyset consisting of `key_data` alone, enabled and primary
pub fn single_key(key_data: proto::KeyData, output_prefix_type: OutputPrefixType) -> proto::Keyset {
    let key_id = new_key_id();
    proto::Keyset {
        primary_key_id: key_id,
        key: vec![Key {
            key_data: Some(key_data),
            status: KeyStatusType::Enabled as i32,
            key_id,
            output_prefix_type: proto::OutputPrefixType::from(output_prefix_type) as i32,
        }],
    }
}

/// Check the structural invariants every keyset must uphold before it can be used
///
/// - there is at least one key
/// - every key has key data, a known status and a known output prefix type
/// - exactly one key carries the primary key id, and that key is enabled
pub fn validate(keyset: &proto::Keyset) -> KeysetResult<()> {
    if keyset.key.is_empty() {
        return Err(invalid("keyset must contain at least one key"));
    }

    let mut primaries = 0usize;
    for key in keyset.key.iter() {
        if key.key_data.is_none() {
            return Err(invalid(format!("key {} has no key data", key.key_id)));
        }

        let status = match KeyStatusType::try_from(key.status) {
            Ok(KeyStatusType::UnknownStatus) | Err(_) => {
                return Err(invalid(format!("key {} has unknown status", key.key_id)))
            }
            Ok(status) => status,
        };

        match proto::OutputPrefixType::try_from(key.output_prefix_type) {
            Ok(proto::OutputPrefixType::UnknownPrefix) | Err(_) => {
                return Err(invalid(format!(
                    "key {} has unknown output prefix type",
                    key.key_id
                )))
            }
            Ok(_) => {}
        }

        if key.key_id == keyset.primary_key_id {
            if status != KeyStatusType::Enabled {
                return Err(invalid(format!(
                    "primary key {} is not enabled",
                    key.key_id
                )));
            }
            primaries += 1;
        }
    }

    match primaries {
        0 => Err(invalid("keyset doesn't contain a valid primary key")),
        1 => Ok(()),
        _ => Err(invalid("keyset contains multiple primary keys")),
    }
}

/// Replace every key of a validated private keyset with its public counterpart
///
/// Key ids, statuses, output prefix types and the primary key id carry over unchanged.
/// Fails if any key is not an asymmetric private key.
pub fn public_keyset<F>(private: &proto::Keyset, mut derive: F) -> KeysetResult<proto::Keyset>
where
    F: FnMut(&proto::KeyData) -> KeysetResult<proto::KeyData>,
{
    validate(private)?;

    let mut key = Vec::with_capacity(private.key.len());
    for k in private.key.iter() {
        // Checked by validate()
        let Some(key_data) = k.key_data.as_ref() else {
            return Err(invalid(format!("key {} has no key data", k.key_id)));
        };
        if key_data.key_material_type != KeyMaterialType::AsymmetricPrivate as i32 {
            return Err(KeysetError::NotPrivateKey {
                key_id: k.key_id,
                type_url: key_data.type_url.clone(),
            });
        }
        key.push(Key {
            key_data: Some(derive(key_data)?),
            ..k.clone()
        });
    }

    Ok(proto::Keyset {
        primary_key_id: private.primary_key_id,
        key,
    })
}
