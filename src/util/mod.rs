// Utility Module
// Persistence helpers for keys and ciphertext

pub mod file_ops;

pub use file_ops::{
    decode_blocks_hex, encode_blocks_hex, load_public_key, load_secret_key, read_ciphertext,
    save_keys, write_ciphertext,
};
