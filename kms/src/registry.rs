use std::collections::HashMap;
use std::fmt;

use crate::managers;
use crate::proto::{self, KeyMaterialType};
use crate::{keyset, KeyManagementLibrary, KeyTemplate, KeysetError, KeysetResult};

/// Creates keys of a single key type
pub trait KeyManager: Send + Sync {
    /// Type URL of the keys produced by this manager
    fn type_url(&self) -> &'static str;

    fn key_material_type(&self) -> KeyMaterialType;

    /// Generate a fresh serialized key from a serialized key format
    fn new_key(&self, serialized_key_format: &[u8]) -> KeysetResult<Vec<u8>>;

    /// Derive the public key data belonging to a serialized private key
    ///
    /// Only meaningful for managers of [KeyMaterialType::AsymmetricPrivate] keys.
    fn public_key_data(&self, serialized_private_key: &[u8]) -> KeysetResult<proto::KeyData> {
        let _ = serialized_private_key;
        Err(KeysetError::InvalidKey {
            type_url: self.type_url(),
            reason: "key type has no public counterpart".into(),
        })
    }

    fn new_key_data(&self, serialized_key_format: &[u8]) -> KeysetResult<proto::KeyData> {
        Ok(proto::KeyData {
            type_url: self.type_url().to_owned(),
            value: self.new_key(serialized_key_format)?,
            key_material_type: self.key_material_type() as i32,
        })
    }
}

/// Lookup table from type URL to [KeyManager]
///
/// Immutable once built, so a single registry can serve any number of concurrent requests.
pub struct Registry {
    managers: HashMap<&'static str, Box<dyn KeyManager>>,
}

impl Registry {
    /// A registry without any key managers
    pub fn empty() -> Self {
        Self {
            managers: HashMap::new(),
        }
    }

    /// Add a key manager, replacing any earlier manager for the same type URL
    pub fn with_manager<M: KeyManager + 'static>(mut self, manager: M) -> Self {
        self.managers.insert(manager.type_url(), Box::new(manager));
        self
    }

    pub fn manager(&self, type_url: &str) -> KeysetResult<&dyn KeyManager> {
        self.managers
            .get(type_url)
            .map(|m| m.as_ref())
            .ok_or_else(|| KeysetError::UnsupportedKeyType(type_url.to_owned()))
    }

    pub fn type_urls(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.managers.keys().copied()
    }
}

impl Default for Registry {
    /// A registry holding every key manager from [managers]
    fn default() -> Self {
        Self::empty()
            .with_manager(managers::ChaCha20Poly1305KeyManager)
            .with_manager(managers::XChaCha20Poly1305KeyManager)
            .with_manager(managers::HmacKeyManager)
            .with_manager(managers::Ed25519PrivateKeyManager)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut urls: Vec<_> = self.type_urls().collect();
        urls.sort_unstable();
        f.debug_struct("Registry").field("managers", &urls).finish()
    }
}

impl KeyManagementLibrary for Registry {
    fn generate(&self, template: &KeyTemplate) -> KeysetResult<proto::Keyset> {
        let manager = self.manager(template.type_url())?;
        log::trace!(
            "generating {} key with output prefix type {:?}",
            manager.type_url(),
            template.output_prefix_type()
        );
        let key_data = manager.new_key_data(template.value())?;
        Ok(keyset::single_key(key_data, template.output_prefix_type()))
    }

    fn public(&self, private: &proto::Keyset) -> KeysetResult<proto::Keyset> {
        keyset::public_keyset(private, |key_data| {
            log::trace!("deriving public key data for {}", key_data.type_url);
            self.manager(&key_data.type_url)?
                .public_key_data(&key_data.value)
        })
    }
}
