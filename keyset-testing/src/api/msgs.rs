//! Request and response messages of the `tink_testing_api.Keyset` service.
//!
//! Every response carries a `oneof`: either the serialized keyset or an error description,
//! never both.

#[derive(Clone, PartialEq, prost::Message)]
pub struct KeysetGenerateRequest {
    /// Serialized key template
    #[prost(bytes = "vec", tag = "1")]
    pub template: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KeysetGenerateResponse {
    #[prost(oneof = "keyset_generate_response::Result", tags = "1, 2")]
    pub result: Option<keyset_generate_response::Result>,
}

pub mod keyset_generate_response {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        /// Serialized keyset
        #[prost(bytes, tag = "1")]
        Keyset(Vec<u8>),
        #[prost(string, tag = "2")]
        Err(String),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KeysetPublicRequest {
    /// Serialized private keyset
    #[prost(bytes = "vec", tag = "1")]
    pub private_keyset: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct KeysetPublicResponse {
    #[prost(oneof = "keyset_public_response::Result", tags = "1, 2")]
    pub result: Option<keyset_public_response::Result>,
}

pub mod keyset_public_response {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Result {
        /// Serialized public keyset
        #[prost(bytes, tag = "1")]
        PublicKeyset(Vec<u8>),
        #[prost(string, tag = "2")]
        Err(String),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn responses_use_the_shared_field_numbers() {
        let res = KeysetGenerateResponse {
            result: Some(keyset_generate_response::Result::Err("nope".into())),
        };
        // field 2, length delimited
        assert_eq!(res.encode_to_vec(), b"\x12\x04nope");

        let res = KeysetPublicResponse {
            result: Some(keyset_public_response::Result::PublicKeyset(vec![7])),
        };
        // field 1, length delimited
        assert_eq!(res.encode_to_vec(), [0x0a, 0x01, 0x07]);
    }
}
