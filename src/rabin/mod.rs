// Rabin Module - Main module file
// Exports the Rabin cryptosystem and its number theory engine

pub mod bigint;
pub mod config;
pub mod decrypt;
pub mod encrypt;
pub mod error;
pub mod jacobi;
pub mod keygen;
pub mod padding;
pub mod primality;
pub mod sqrt;

pub use bigint::{extended_gcd, mod_inverse, mod_pow, pow_mod, RabinBigInt};
pub use config::{RabinConfig, HASH_LEN};
pub use decrypt::{decrypt, decrypt_to_bytes, RabinDecryptor};
pub use encrypt::{encrypt, encrypt_bytes, encrypt_with, CipherBlock};
pub use error::{RabinError, Result};
pub use jacobi::jacobi_symbol;
pub use keygen::{generate_keys, generate_keys_with, PublicKey, SecretKey};
pub use padding::{pad_block, unpad_block, PaddedData};
pub use primality::{generate_prime, is_probable_prime};
pub use sqrt::square_roots;
