mod builder;
mod certs;
mod error;
mod general;
mod protected;

pub mod prelude;

pub use builder::ProtectedPkiMessageBuilder;
pub use certs::{CertificateDecoder, X509CertificateDecoder};
pub use error::CmpError;
pub use general::GeneralPkiMessage;
pub use protected::ProtectedPkiMessage;

pub use pkicmp_crypto as crypto;
pub use pkicmp_protocol as protocol;
pub use pkicmp_protocol::der;
pub use x509_cert;
