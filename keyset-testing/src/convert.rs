//! Conversion from wire enumerations to the types of the key management library

use keyset_testing_kms::{proto, OutputPrefixType};

/// The output prefix type in a key template is not one of TINK, LEGACY, RAW or CRUNCHY
///
/// A conforming client never sends this; seeing it means client and server disagree on the
/// schema.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Unknown output prefix type {0}")]
pub struct UnknownOutputPrefixType(pub i32);

pub fn output_prefix_type_from_proto(raw: i32) -> Result<OutputPrefixType, UnknownOutputPrefixType> {
    use proto::OutputPrefixType as P;
    use OutputPrefixType as O;
    match P::try_from(raw) {
        Ok(P::Tink) => Ok(O::Tink),
        Ok(P::Legacy) => Ok(O::Legacy),
        Ok(P::Raw) => Ok(O::Raw),
        Ok(P::Crunchy) => Ok(O::Crunchy),
        Ok(P::UnknownPrefix) | Err(_) => Err(UnknownOutputPrefixType(raw)),
    }
}
