//! Key management for the keyset testing server.
//!
//! The server only ever talks to [KeyManagementLibrary]; [Registry] is the implementation
//! shipped with this crate. It resolves key templates to one of the key managers in
//! [managers] by their type URL.

use std::io;

pub mod keyset;
pub mod managers;
pub mod proto;
pub mod registry;
pub mod template;

pub use registry::{KeyManager, Registry};
pub use template::{KeyTemplate, OutputPrefixType};

/// Failures of the key management library which are caused by the input,
/// never by the environment
///
/// I/O problems while writing keysets are reported as [std::io::Error] instead.
#[derive(thiserror::Error, Debug)]
pub enum KeysetError {
    #[error("failed to parse {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: prost::DecodeError,
    },
    #[error("no key manager for type url {0:?}")]
    UnsupportedKeyType(String),
    #[error("invalid key format for {type_url}: {reason}")]
    InvalidKeyFormat {
        type_url: &'static str,
        reason: String,
    },
    #[error("invalid key for {type_url}: {reason}")]
    InvalidKey {
        type_url: &'static str,
        reason: String,
    },
    #[error("invalid keyset: {0}")]
    InvalidKeyset(String),
    #[error("key {key_id} of type {type_url:?} is not a private key")]
    NotPrivateKey { key_id: u32, type_url: String },
}

impl KeysetError {
    pub(crate) fn decode(what: &'static str) -> impl FnOnce(prost::DecodeError) -> Self {
        move |source| Self::Decode { what, source }
    }
}

pub type KeysetResult<T> = Result<T, KeysetError>;

/// The operations the keyset testing server needs from a key management library
///
/// Implementations must be usable from many requests at once; none of the operations
/// may depend on state written by another call.
pub trait KeyManagementLibrary: Send + Sync {
    /// Generate a new keyset holding a single, primary key described by `template`
    fn generate(&self, template: &KeyTemplate) -> KeysetResult<proto::Keyset>;

    /// Derive the public keyset corresponding to the private keyset `private`
    fn public(&self, private: &proto::Keyset) -> KeysetResult<proto::Keyset>;

    /// Parse a keyset from its binary encoding
    fn read_keyset(&self, buf: &[u8]) -> KeysetResult<proto::Keyset> {
        keyset::read_binary(buf)
    }

    /// Write the binary encoding of `keyset` to `out`
    fn write_keyset(&self, keyset: &proto::Keyset, out: &mut dyn io::Write) -> io::Result<()> {
        keyset::write_binary(keyset, out)
    }
}
