use std::io;
use std::sync::Arc;

use keyset_testing_kms::{proto, KeyManagementLibrary, KeyTemplate, KeysetError};
use prost::Message;
use tonic::{Request, Response, Status};

use crate::api::keyset_server::Keyset;
use crate::api::msgs::{self, keyset_generate_response, keyset_public_response};
use crate::convert::{output_prefix_type_from_proto, UnknownOutputPrefixType};

/// Faults of the server itself; these abort the call with a gRPC status instead of
/// producing a response
#[derive(thiserror::Error, Debug)]
pub enum KeysetServiceFault {
    /// Writing the serialized keyset failed
    #[error("{0}")]
    Serialization(#[source] io::Error),
    #[error(transparent)]
    UnknownOutputPrefixType(#[from] UnknownOutputPrefixType),
}

impl From<KeysetServiceFault> for Status {
    fn from(value: KeysetServiceFault) -> Self {
        use KeysetServiceFault as F;
        match value {
            F::Serialization(e) => Status::unknown(e.to_string()),
            F::UnknownOutputPrefixType(e) => Status::internal(e.to_string()),
        }
    }
}

/// Result of a request that was processed to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The serialized keyset
    Keyset(Vec<u8>),
    /// Why the input was rejected
    Err(String),
}

impl From<Outcome> for msgs::KeysetGenerateResponse {
    fn from(value: Outcome) -> Self {
        use keyset_generate_response::Result as R;
        let result = match value {
            Outcome::Keyset(keyset) => R::Keyset(keyset),
            Outcome::Err(err) => R::Err(err),
        };
        Self {
            result: Some(result),
        }
    }
}

impl From<Outcome> for msgs::KeysetPublicResponse {
    fn from(value: Outcome) -> Self {
        use keyset_public_response::Result as R;
        let result = match value {
            Outcome::Keyset(keyset) => R::PublicKeyset(keyset),
            Outcome::Err(err) => R::Err(err),
        };
        Self {
            result: Some(result),
        }
    }
}

/// Everything that can go wrong inside a handler, before sorting out which failures
/// become an [Outcome::Err] and which become a [KeysetServiceFault]
enum HandlerError {
    Domain(KeysetError),
    Fault(KeysetServiceFault),
}

impl From<KeysetError> for HandlerError {
    fn from(value: KeysetError) -> Self {
        Self::Domain(value)
    }
}

impl From<KeysetServiceFault> for HandlerError {
    fn from(value: KeysetServiceFault) -> Self {
        Self::Fault(value)
    }
}

impl From<UnknownOutputPrefixType> for HandlerError {
    fn from(value: UnknownOutputPrefixType) -> Self {
        Self::Fault(value.into())
    }
}

fn finish(op: &str, r: Result<Vec<u8>, HandlerError>) -> Result<Outcome, KeysetServiceFault> {
    match r {
        Ok(keyset) => {
            log::debug!("{op}: produced keyset of {} bytes", keyset.len());
            Ok(Outcome::Keyset(keyset))
        }
        Err(HandlerError::Domain(e)) => {
            log::debug!("{op}: rejected input: {e}");
            Ok(Outcome::Err(e.to_string()))
        }
        Err(HandlerError::Fault(f)) => {
            log::error!("{op}: aborting call: {f}");
            Err(f)
        }
    }
}

/// Implementation of the `tink_testing_api.Keyset` service on top of a
/// [KeyManagementLibrary]
///
/// Holds no state besides the library itself; clones share the library.
pub struct KeysetService<K> {
    kms: Arc<K>,
}

impl<K> Clone for KeysetService<K> {
    fn clone(&self) -> Self {
        Self {
            kms: self.kms.clone(),
        }
    }
}

impl<K: KeyManagementLibrary> KeysetService<K> {
    pub fn new(kms: K) -> Self {
        Self::from_arc(Arc::new(kms))
    }

    pub fn from_arc(kms: Arc<K>) -> Self {
        Self { kms }
    }

    /// Generate a keyset from a serialized key template
    pub fn handle_generate(&self, template: &[u8]) -> Result<Outcome, KeysetServiceFault> {
        finish("Generate", self.generate_keyset(template))
    }

    /// Derive the public keyset from a serialized private keyset
    pub fn handle_public(&self, private_keyset: &[u8]) -> Result<Outcome, KeysetServiceFault> {
        finish("Public", self.public_keyset(private_keyset))
    }

    fn generate_keyset(&self, template: &[u8]) -> Result<Vec<u8>, HandlerError> {
        let template =
            proto::KeyTemplate::decode(template).map_err(|source| KeysetError::Decode {
                what: "key template",
                source,
            })?;
        let output_prefix_type = output_prefix_type_from_proto(template.output_prefix_type)?;
        log::debug!(
            "Generate: type url {:?}, output prefix type {output_prefix_type:?}",
            template.type_url
        );

        let template =
            KeyTemplate::create(template.type_url, template.value, output_prefix_type);
        let keyset = self.kms.generate(&template)?;
        self.write(&keyset)
    }

    fn public_keyset(&self, private_keyset: &[u8]) -> Result<Vec<u8>, HandlerError> {
        let private = self.kms.read_keyset(private_keyset)?;
        log::debug!(
            "Public: private keyset with {} keys, primary key {}",
            private.key.len(),
            private.primary_key_id
        );

        let public = self.kms.public(&private)?;
        self.write(&public)
    }

    fn write(&self, keyset: &proto::Keyset) -> Result<Vec<u8>, HandlerError> {
        let mut buf = Vec::new();
        self.kms
            .write_keyset(keyset, &mut buf)
            .map_err(KeysetServiceFault::Serialization)?;
        Ok(buf)
    }
}

#[tonic::async_trait]
impl<K: KeyManagementLibrary + 'static> Keyset for KeysetService<K> {
    async fn generate(
        &self,
        request: Request<msgs::KeysetGenerateRequest>,
    ) -> Result<Response<msgs::KeysetGenerateResponse>, Status> {
        let req = request.into_inner();
        let outcome = self.handle_generate(&req.template)?;
        Ok(Response::new(outcome.into()))
    }

    async fn public(
        &self,
        request: Request<msgs::KeysetPublicRequest>,
    ) -> Result<Response<msgs::KeysetPublicResponse>, Status> {
        let req = request.into_inner();
        let outcome = self.handle_public(&req.private_keyset)?;
        Ok(Response::new(outcome.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyset_testing_kms::managers::{
        CHACHA20_POLY1305_TYPE_URL, ED25519_PRIVATE_TYPE_URL, HMAC_TYPE_URL,
    };
    use keyset_testing_kms::proto::KeyMaterialType;
    use keyset_testing_kms::{KeysetResult, Registry};

    fn template(type_url: &str, prefix: proto::OutputPrefixType) -> Vec<u8> {
        proto::KeyTemplate {
            type_url: type_url.into(),
            value: vec![],
            output_prefix_type: prefix as i32,
        }
        .encode_to_vec()
    }

    fn keyset_bytes(outcome: Outcome) -> Vec<u8> {
        match outcome {
            Outcome::Keyset(k) => k,
            Outcome::Err(e) => panic!("unexpected error outcome: {e}"),
        }
    }

    fn err_text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Err(e) => e,
            Outcome::Keyset(_) => panic!("unexpected keyset outcome"),
        }
    }

    #[test]
    fn generate_produces_a_keyset() {
        let srv = KeysetService::new(Registry::default());
        let out = srv
            .handle_generate(&template(
                CHACHA20_POLY1305_TYPE_URL,
                proto::OutputPrefixType::Tink,
            ))
            .unwrap();
        let keyset = proto::Keyset::decode(&keyset_bytes(out)[..]).unwrap();
        assert_eq!(keyset.key.len(), 1);
        assert_eq!(keyset.primary_key_id, keyset.key[0].key_id);
        assert_eq!(
            keyset.key[0].output_prefix_type,
            proto::OutputPrefixType::Tink as i32
        );
    }

    #[test]
    fn malformed_template_is_a_domain_error() {
        let srv = KeysetService::new(Registry::default());
        let out = srv.handle_generate(&[0xff, 0xff]).unwrap();
        assert!(!err_text(out).is_empty());
    }

    #[test]
    fn unsupported_parameters_are_domain_errors() {
        let srv = KeysetService::new(Registry::default());
        let out = srv
            .handle_generate(&template("type.googleapis.com/Nope", proto::OutputPrefixType::Raw))
            .unwrap();
        assert!(err_text(out).contains("type.googleapis.com/Nope"));

        // An empty HMAC key format has a key size of zero
        let out = srv
            .handle_generate(&template(HMAC_TYPE_URL, proto::OutputPrefixType::Raw))
            .unwrap();
        assert!(!err_text(out).is_empty());
    }

    #[test]
    fn unknown_prefix_aborts_the_call() {
        let srv = KeysetService::new(Registry::default());
        let tpl = proto::KeyTemplate {
            type_url: CHACHA20_POLY1305_TYPE_URL.into(),
            value: vec![],
            output_prefix_type: 42,
        }
        .encode_to_vec();
        let fault = srv.handle_generate(&tpl).unwrap_err();
        assert!(matches!(
            fault,
            KeysetServiceFault::UnknownOutputPrefixType(UnknownOutputPrefixType(42))
        ));
        assert_eq!(Status::from(fault).code(), tonic::Code::Internal);

        let fault = srv
            .handle_generate(&template(
                CHACHA20_POLY1305_TYPE_URL,
                proto::OutputPrefixType::UnknownPrefix,
            ))
            .unwrap_err();
        assert!(matches!(
            fault,
            KeysetServiceFault::UnknownOutputPrefixType(_)
        ));
    }

    #[test]
    fn public_of_generated_asymmetric_keyset() {
        let srv = KeysetService::new(Registry::default());
        let private = keyset_bytes(
            srv.handle_generate(&template(
                ED25519_PRIVATE_TYPE_URL,
                proto::OutputPrefixType::Tink,
            ))
            .unwrap(),
        );
        let public = keyset_bytes(srv.handle_public(&private).unwrap());
        let public = proto::Keyset::decode(&public[..]).unwrap();
        let private = proto::Keyset::decode(&private[..]).unwrap();
        assert_eq!(public.primary_key_id, private.primary_key_id);
        assert_eq!(
            public.key[0].key_data.as_ref().unwrap().key_material_type,
            KeyMaterialType::AsymmetricPublic as i32
        );
    }

    #[test]
    fn public_failures_are_domain_errors() {
        let srv = KeysetService::new(Registry::default());
        let symmetric = keyset_bytes(
            srv.handle_generate(&template(
                CHACHA20_POLY1305_TYPE_URL,
                proto::OutputPrefixType::Tink,
            ))
            .unwrap(),
        );
        assert!(!err_text(srv.handle_public(&symmetric).unwrap()).is_empty());
        assert!(!err_text(srv.handle_public(&[0xff, 0xff, 0xff]).unwrap()).is_empty());
        // Decodes fine, but holds no keys
        assert!(!err_text(srv.handle_public(&[]).unwrap()).is_empty());
    }

    /// Delegates to the registry but fails every write
    struct BrokenWriter(Registry);

    impl KeyManagementLibrary for BrokenWriter {
        fn generate(&self, template: &KeyTemplate) -> KeysetResult<proto::Keyset> {
            self.0.generate(template)
        }

        fn public(&self, private: &proto::Keyset) -> KeysetResult<proto::Keyset> {
            self.0.public(private)
        }

        fn write_keyset(&self, _: &proto::Keyset, _: &mut dyn io::Write) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"))
        }
    }

    #[test]
    fn write_failures_abort_the_call() {
        let srv = KeysetService::new(BrokenWriter(Registry::default()));
        let fault = srv
            .handle_generate(&template(
                CHACHA20_POLY1305_TYPE_URL,
                proto::OutputPrefixType::Tink,
            ))
            .unwrap_err();
        assert!(matches!(fault, KeysetServiceFault::Serialization(_)));

        let status = Status::from(fault);
        assert_eq!(status.code(), tonic::Code::Unknown);
        assert_eq!(status.message(), "stream closed");

        // Reading the private keyset goes through the working codec; writing the public one
        // does not
        let private = keyset_bytes(
            KeysetService::new(Registry::default())
                .handle_generate(&template(
                    ED25519_PRIVATE_TYPE_URL,
                    proto::OutputPrefixType::Tink,
                ))
                .unwrap(),
        );
        let fault = srv.handle_public(&private).unwrap_err();
        assert!(matches!(fault, KeysetServiceFault::Serialization(_)));
        assert_eq!(Status::from(fault).code(), tonic::Code::Unknown);
    }

    #[test]
    fn public_without_usable_primary_key_is_a_domain_error() {
        let srv = KeysetService::new(Registry::default());
        let private = keyset_bytes(
            srv.handle_generate(&template(
                ED25519_PRIVATE_TYPE_URL,
                proto::OutputPrefixType::Tink,
            ))
            .unwrap(),
        );
        let private = proto::Keyset::decode(&private[..]).unwrap();

        let mut disabled = private.clone();
        disabled.key[0].status = proto::KeyStatusType::Disabled as i32;
        let err = err_text(srv.handle_public(&disabled.encode_to_vec()).unwrap());
        assert!(err.contains("not enabled"), "{err}");

        let mut missing = private;
        missing.primary_key_id = missing.key[0].key_id.wrapping_add(1);
        let err = err_text(srv.handle_public(&missing.encode_to_vec()).unwrap());
        assert!(err.contains("primary key"), "{err}");
    }

    #[test]
    fn outcomes_fill_exactly_one_response_field() {
        let res = msgs::KeysetGenerateResponse::from(Outcome::Err("bad".into()));
        assert_eq!(
            res.result,
            Some(keyset_generate_response::Result::Err("bad".into()))
        );
        let res = msgs::KeysetPublicResponse::from(Outcome::Keyset(vec![1]));
        assert_eq!(
            res.result,
            Some(keyset_public_response::Result::PublicKeyset(vec![1]))
        );
    }
}
