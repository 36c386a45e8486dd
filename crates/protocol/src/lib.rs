//! CMP Protocol Types
//!
//! This crate contains the message structures of the Certificate Management
//! Protocol (RFC 4210) that are needed to verify message protection:
//! - PKI header, opaque PKI body and the enclosing PKI message
//! - The protected part, i.e. the canonical `SEQUENCE { header, body }`
//! - Password-based MAC parameters (RFC 4211)
//!
//! This crate contains NO cryptographic operations and NO I/O.
//! It is purely focused on data structures and DER serialization.

pub mod body;
pub mod header;
pub mod message;
pub mod oid;
pub mod pbm;

// Re-export commonly used types
pub use body::PkiBody;
pub use header::PkiHeader;
pub use message::{PkiMessage, ProtectedPart};
pub use pbm::PbmParameter;

pub use der;
pub use spki::AlgorithmIdentifierOwned;
