//! PKI message and its protected part

use crate::body::PkiBody;
use crate::header::PkiHeader;
use der::asn1::{Any, BitString};
use der::{Encode, EncodeValue, FixedTag, Length, Sequence, Tag, Writer};

/// PKI message
///
/// ```text
/// PKIMessage ::= SEQUENCE {
///     header           PKIHeader,
///     body             PKIBody,
///     protection   [0] PKIProtection OPTIONAL,
///     extraCerts   [1] SEQUENCE SIZE (1..MAX) OF CMPCertificate OPTIONAL }
/// ```
///
/// Embedded certificates are kept undecoded; they are only parsed on request
/// so that a malformed certificate does not prevent reading the message.
#[derive(Clone, Debug, Eq, PartialEq, Sequence)]
pub struct PkiMessage {
    pub header: PkiHeader,
    pub body: PkiBody,

    #[asn1(context_specific = "0", tag_mode = "EXPLICIT", optional = "true")]
    pub protection: Option<BitString>,

    #[asn1(context_specific = "1", tag_mode = "EXPLICIT", optional = "true")]
    pub extra_certs: Option<Vec<Any>>,
}

impl PkiMessage {
    /// Create an unprotected message without embedded certificates
    pub fn new(header: PkiHeader, body: PkiBody) -> Self {
        Self {
            header,
            body,
            protection: None,
            extra_certs: None,
        }
    }

    /// The `(header, body)` pair covered by the protection value
    pub fn protected_part(&self) -> ProtectedPart<'_> {
        ProtectedPart::new(&self.header, &self.body)
    }

    /// Raw bytes of the protection value, empty when absent
    pub fn protection_bytes(&self) -> &[u8] {
        self.protection
            .as_ref()
            .map(BitString::raw_bytes)
            .unwrap_or(&[])
    }

    /// Embedded certificates in their encoded form
    pub fn extra_certs(&self) -> &[Any] {
        self.extra_certs.as_deref().unwrap_or(&[])
    }
}

/// Canonical protected content: `SEQUENCE { header, body }`
///
/// Borrowing view used to compute and check protection values. Its DER
/// encoding must be byte-identical to what the protecting party produced.
#[derive(Clone, Copy, Debug)]
pub struct ProtectedPart<'a> {
    header: &'a PkiHeader,
    body: &'a PkiBody,
}

impl<'a> ProtectedPart<'a> {
    pub fn new(header: &'a PkiHeader, body: &'a PkiBody) -> Self {
        Self { header, body }
    }

    pub fn header(&self) -> &'a PkiHeader {
        self.header
    }

    pub fn body(&self) -> &'a PkiBody {
        self.body
    }
}

impl EncodeValue for ProtectedPart<'_> {
    fn value_len(&self) -> der::Result<Length> {
        self.header.encoded_len()? + self.body.encoded_len()?
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.header.encode(writer)?;
        self.body.encode(writer)
    }
}

impl FixedTag for ProtectedPart<'_> {
    const TAG: Tag = Tag::Sequence;
}

#[cfg(test)]
mod tests {
    use super::*;
    use der::asn1::Ia5String;
    use der::Decode;
    use x509_cert::ext::pkix::name::GeneralName;

    fn sample_message() -> PkiMessage {
        let header = PkiHeader::new(
            GeneralName::DnsName(Ia5String::new("client.example").unwrap()),
            GeneralName::DnsName(Ia5String::new("ca.example").unwrap()),
        );
        PkiMessage::new(header, PkiBody::pki_confirm().unwrap())
    }

    #[test]
    fn test_protected_part_is_sequence_of_header_and_body() {
        let message = sample_message();
        let header_der = message.header.to_der().unwrap();
        let body_der = message.body.to_der().unwrap();

        let mut expected = vec![0x30, (header_der.len() + body_der.len()) as u8];
        expected.extend_from_slice(&header_der);
        expected.extend_from_slice(&body_der);

        assert_eq!(message.protected_part().to_der().unwrap(), expected);
    }

    #[test]
    fn test_protected_part_long_form_length() {
        let mut message = sample_message();
        message.body = PkiBody::new(crate::body::body_type::GENM, {
            // SEQUENCE of 200 zero bytes
            let mut content = vec![0x30, 0x81, 200];
            content.extend_from_slice(&[0u8; 200]);
            content
        })
        .unwrap();

        let encoded = message.protected_part().to_der().unwrap();
        assert_eq!(encoded[0], 0x30);
        assert_eq!(encoded[1], 0x81);
        assert_eq!(encoded.len(), 3 + encoded[2] as usize);
    }

    #[test]
    fn test_unprotected_message_has_empty_protection() {
        let message = sample_message();
        assert!(message.protection_bytes().is_empty());
        assert!(message.extra_certs().is_empty());
    }

    #[test]
    fn test_decode_protected_message() {
        let mut message = sample_message();
        message.protection = Some(BitString::from_bytes(&[0xde, 0xad, 0xbe, 0xef]).unwrap());
        message.extra_certs = Some(vec![Any::from_der(&[0x30, 0x00]).unwrap()]);

        let decoded = PkiMessage::from_der(&message.to_der().unwrap()).unwrap();
        assert_eq!(decoded.protection_bytes(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(decoded.extra_certs().len(), 1);
        assert_eq!(decoded, message);
    }
}
