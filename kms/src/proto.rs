//! Protocol buffer messages making up the binary keyset encoding.
//!
//! Field numbers match the schema used by every implementation taking part in the
//! cross-language tests; changing any of them breaks interoperability.

/// Wire form of a key template
#[derive(Clone, PartialEq, prost::Message)]
pub struct KeyTemplate {
    /// Identifies the key manager responsible for the template
    #[prost(string, tag = "1")]
    pub type_url: String,
    /// Serialized key format; opaque outside of the key manager
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
    #[prost(enumeration = "OutputPrefixType", tag = "3")]
    pub output_prefix_type: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum OutputPrefixType {
    UnknownPrefix = 0,
    Tink = 1,
    Legacy = 2,
    Raw = 3,
    Crunchy = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum KeyMaterialType {
    UnknownKeymaterial = 0,
    Symmetric = 1,
    AsymmetricPrivate = 2,
    AsymmetricPublic = 3,
    Remote = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum KeyStatusType {
    UnknownStatus = 0,
    Enabled = 1,
    Disabled = 2,
    Destroyed = 3,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KeyData {
    #[prost(string, tag = "1")]
    pub type_url: String,
    /// Serialized key; opaque outside of the key manager
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
    #[prost(enumeration = "KeyMaterialType", tag = "3")]
    pub key_material_type: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Keyset {
    #[prost(uint32, tag = "1")]
    pub primary_key_id: u32,
    #[prost(message, repeated, tag = "2")]
    pub key: Vec<keyset::Key>,
}

pub mod keyset {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Key {
        #[prost(message, optional, tag = "1")]
        pub key_data: Option<super::KeyData>,
        #[prost(enumeration = "super::KeyStatusType", tag = "2")]
        pub status: i32,
        #[prost(uint32, tag = "3")]
        pub key_id: u32,
        #[prost(enumeration = "super::OutputPrefixType", tag = "4")]
        pub output_prefix_type: i32,
    }
}

// Key formats and keys understood by the bundled key managers

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaCha20Poly1305KeyFormat {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ChaCha20Poly1305Key {
    #[prost(uint32, tag = "1")]
    pub version: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub key_value: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct XChaCha20Poly1305KeyFormat {
    #[prost(uint32, tag = "3")]
    pub version: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct XChaCha20Poly1305Key {
    #[prost(uint32, tag = "1")]
    pub version: u32,
    #[prost(bytes = "vec", tag = "3")]
    pub key_value: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum HashType {
    UnknownHash = 0,
    Sha1 = 1,
    Sha384 = 2,
    Sha256 = 3,
    Sha512 = 4,
    Sha224 = 5,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HmacParams {
    #[prost(enumeration = "HashType", tag = "1")]
    pub hash: i32,
    #[prost(uint32, tag = "2")]
    pub tag_size: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HmacKeyFormat {
    #[prost(message, optional, tag = "1")]
    pub params: Option<HmacParams>,
    #[prost(uint32, tag = "2")]
    pub key_size: u32,
    #[prost(uint32, tag = "3")]
    pub version: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HmacKey {
    #[prost(uint32, tag = "1")]
    pub version: u32,
    #[prost(message, optional, tag = "2")]
    pub params: Option<HmacParams>,
    #[prost(bytes = "vec", tag = "3")]
    pub key_value: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Ed25519KeyFormat {
    #[prost(uint32, tag = "1")]
    pub version: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Ed25519PublicKey {
    #[prost(uint32, tag = "1")]
    pub version: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub key_value: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Ed25519PrivateKey {
    #[prost(uint32, tag = "1")]
    pub version: u32,
    #[prost(bytes = "vec", tag = "2")]
    pub key_value: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub public_key: Option<Ed25519PublicKey>,
}
