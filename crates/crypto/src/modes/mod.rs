//! Block cipher modes of operation

pub mod sic;

pub use sic::SicBlockCipher;
