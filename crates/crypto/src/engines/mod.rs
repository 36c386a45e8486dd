//! Block cipher engines

pub mod aes;

pub use self::aes::AesEngine;
