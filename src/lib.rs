//! Rabin public-key cryptosystem.
//!
//! Encryption squares a padded block modulo `N = p*q`; decryption extracts
//! the four square roots with the factorization and keeps the one whose
//! embedded SHA-256 digest matches.
//!
//! ```rust,no_run
//! use rabin_crypto::rabin::{decrypt, encrypt, generate_keys};
//!
//! let (public_key, secret_key) = generate_keys(1024).expect("key generation failed");
//! let blocks = encrypt(&public_key, "hello world").expect("encryption failed");
//! assert_eq!(decrypt(&secret_key, &blocks).expect("decryption failed"), "hello world");
//! ```

pub mod rabin;
pub mod util;
