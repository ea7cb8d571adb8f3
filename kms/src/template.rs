use crate::proto;

/// Policy controlling the prefix a primitive attaches to its output
///
/// Unlike [proto::OutputPrefixType], there is no unknown member; every value of this type
/// names a legal prefix policy.
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub enum OutputPrefixType {
    Tink,
    Legacy,
    Raw,
    Crunchy,
}

impl From<OutputPrefixType> for proto::OutputPrefixType {
    fn from(value: OutputPrefixType) -> Self {
        use proto::OutputPrefixType as P;
        use OutputPrefixType as O;
        match value {
            O::Tink => P::Tink,
            O::Legacy => P::Legacy,
            O::Raw => P::Raw,
            O::Crunchy => P::Crunchy,
        }
    }
}

/// Description of a keyset to generate
///
/// The type URL and the key format are passed through to the key manager verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTemplate {
    type_url: String,
    value: Vec<u8>,
    output_prefix_type: OutputPrefixType,
}

impl KeyTemplate {
    pub fn create(
        type_url: impl Into<String>,
        value: impl Into<Vec<u8>>,
        output_prefix_type: OutputPrefixType,
    ) -> Self {
        Self {
            type_url: type_url.into(),
            value: value.into(),
            output_prefix_type,
        }
    }

    pub fn type_url(&self) -> &str {
        &self.type_url
    }

    /// The serialized key format
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn output_prefix_type(&self) -> OutputPrefixType {
        self.output_prefix_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_types_map_to_wire_values_by_name() {
        use proto::OutputPrefixType as P;
        assert_eq!(P::from(OutputPrefixType::Tink), P::Tink);
        assert_eq!(P::from(OutputPrefixType::Legacy), P::Legacy);
        assert_eq!(P::from(OutputPrefixType::Raw), P::Raw);
        assert_eq!(P::from(OutputPrefixType::Crunchy), P::Crunchy);
    }

    #[test]
    fn template_keeps_type_url_and_value_verbatim() {
        let t = KeyTemplate::create("some/type", vec![0xff, 0x00, 0x17], OutputPrefixType::Raw);
        assert_eq!(t.type_url(), "some/type");
        assert_eq!(t.value(), &[0xff, 0x00, 0x17]);
        assert_eq!(t.output_prefix_type(), OutputPrefixType::Raw);
    }
}
