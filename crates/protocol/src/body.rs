//! PKI body
//!
//! The body is a CHOICE of 27 context-tagged alternatives (RFC 4210 §5.1.2).
//! Verification never looks inside it: the body is carried as an opaque
//! `[n] EXPLICIT` element and re-encoded byte for byte.

use der::asn1::{Any, Null};
use der::{Decode, Encode, EncodeValue, ErrorKind, Length, Reader, Tag, TagNumber, Tagged, Writer};

/// Highest tag number encodable in a single identifier octet
const MAX_LOW_TAG_NUMBER: u8 = 30;

/// Body type numbers (the context tag of each `PKIBody` alternative)
pub mod body_type {
    pub const IR: u8 = 0;
    pub const IP: u8 = 1;
    pub const CR: u8 = 2;
    pub const CP: u8 = 3;
    pub const P10CR: u8 = 4;
    pub const POPDECC: u8 = 5;
    pub const POPDECR: u8 = 6;
    pub const KUR: u8 = 7;
    pub const KUP: u8 = 8;
    pub const KRR: u8 = 9;
    pub const KRP: u8 = 10;
    pub const RR: u8 = 11;
    pub const RP: u8 = 12;
    pub const CCR: u8 = 13;
    pub const CCP: u8 = 14;
    pub const CKUANN: u8 = 15;
    pub const CANN: u8 = 16;
    pub const RANN: u8 = 17;
    pub const CRLANN: u8 = 18;
    pub const PKICONF: u8 = 19;
    pub const NESTED: u8 = 20;
    pub const GENM: u8 = 21;
    pub const GENP: u8 = 22;
    pub const ERROR: u8 = 23;
    pub const CERTCONF: u8 = 24;
    pub const POLLREQ: u8 = 25;
    pub const POLLREP: u8 = 26;
}

/// Opaque PKI body: `[body_type] EXPLICIT content`
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PkiBody {
    body_type: u8,
    inner: Any,
}

impl PkiBody {
    /// Wrap an already DER-encoded body content under the given body type
    pub fn new(body_type: u8, content: impl Into<Box<[u8]>>) -> der::Result<Self> {
        if body_type > MAX_LOW_TAG_NUMBER {
            return Err(ErrorKind::TagNumberInvalid.into());
        }
        let tag = Tag::ContextSpecific {
            constructed: true,
            number: TagNumber::new(body_type),
        };
        Ok(Self {
            body_type,
            inner: Any::new(tag, content)?,
        })
    }

    /// PKI confirmation (`pkiconf [19] NULL`)
    pub fn pki_confirm() -> der::Result<Self> {
        Self::new(body_type::PKICONF, Null.to_der()?)
    }

    /// Context tag number identifying the body alternative
    pub fn body_type(&self) -> u8 {
        self.body_type
    }

    /// DER encoding of the inner content (the explicitly tagged value)
    pub fn content(&self) -> &[u8] {
        self.inner.value()
    }
}

impl EncodeValue for PkiBody {
    fn value_len(&self) -> der::Result<Length> {
        self.inner.value_len()
    }

    fn encode_value(&self, writer: &mut impl Writer) -> der::Result<()> {
        self.inner.encode_value(writer)
    }
}

impl Tagged for PkiBody {
    fn tag(&self) -> Tag {
        self.inner.tag()
    }
}

impl<'a> Decode<'a> for PkiBody {
    fn decode<R: Reader<'a>>(reader: &mut R) -> der::Result<Self> {
        let inner = Any::decode(reader)?;
        match inner.tag() {
            Tag::ContextSpecific {
                constructed: true,
                number,
            } => Ok(Self {
                body_type: number.value(),
                inner,
            }),
            actual => Err(ErrorKind::TagUnexpected {
                expected: None,
                actual,
            }
            .into()),
        }
    }
}
