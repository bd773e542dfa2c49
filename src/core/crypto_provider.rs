//! # Crypto provider module
//!
//! This module contains the [`CryptoProvider`] trait, which is used to plug
//! an externally supplied symmetric cipher into the history decryption pass
//! or for manual data encryption and decryption.

use crate::core::StreamHubError;
use std::fmt::Debug;

/// Crypto provider trait.
///
/// The history decryption pass treats implementations as stateless and
/// immutable: a single provider instance may be shared by concurrent decode
/// passes without locking.
///
/// An AES-CBC implementation ships behind the `crypto` feature; any other
/// cipher can be supplied by implementing this trait.
pub trait CryptoProvider: Debug + Send + Sync {
    /// Encrypt provided data.
    ///
    /// # Errors
    /// Should return a [`StreamHubError::Encryption`] if provided data can't
    /// be _encrypted_ or underlying cryptor misconfigured.
    fn encrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, StreamHubError>;

    /// Decrypt provided data.
    ///
    /// # Errors
    /// Should return a [`StreamHubError::Decryption`] if provided data can't
    /// be _decrypted_ or underlying cryptor misconfigured.
    fn decrypt(&self, data: Vec<u8>) -> Result<Vec<u8>, StreamHubError>;
}
