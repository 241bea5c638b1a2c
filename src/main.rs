// Rabin Demo
// Generates a key pair, encrypts two sample texts and decrypts them again

use std::env;
use std::path::Path;
use std::process;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rabin_crypto::rabin::generate_keys;
use rabin_crypto::util::{encode_blocks_hex, save_keys};

const MESSAGE_EN: &str = "If I don’t like a thing, I don’t like it, that’s all; and there is no reason under the sun why I should ape a liking for it just because the majority of my fellow-creatures like it, or make believe they like it. I can’t follow the fashions in the things I like or dislike.";
const MESSAGE_RU: &str = "Если мне что-то не нравится, значит, не нравится, и все тут; так с какой стати, спрашивается, я стану делать вид, будто мне это нравится, только потому, что большинству моих соплеменников это нравится или они воображают, что нравится. Не могу я что-то любить или не любить по велению моды.";

const DEFAULT_BITS: u64 = 1024;

fn run() -> Result<()> {
    let mut args = env::args().skip(1);
    let bits = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .with_context(|| format!("invalid modulus size: {}", arg))?,
        None => DEFAULT_BITS,
    };
    let key_dir = args.next();

    info!(bits, "generating Rabin key pair");
    let (public_key, secret_key) = generate_keys(bits).context("key generation failed")?;

    if let Some(dir) = key_dir {
        let (public_path, secret_path) = save_keys(Path::new(&dir), &public_key, &secret_key)
            .with_context(|| format!("could not save keys to {}", dir))?;
        info!(public = %public_path.display(), secret = %secret_path.display(), "keys saved");
    }

    for message in [MESSAGE_EN, MESSAGE_RU] {
        let blocks = public_key.encrypt(message).context("encryption failed")?;
        println!("{}", encode_blocks_hex(&blocks));

        let decrypted = secret_key.decrypt(&blocks).context("decryption failed")?;
        println!("{}", decrypted);
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
