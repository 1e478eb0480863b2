mod rsa;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::rsa::config::{
    DEFAULT_CIPHERTEXT_FILE, DEFAULT_MODULUS_BITS, DEFAULT_ROUNDS, DEFAULT_TIME_MAX_MS,
};
use crate::rsa::{decrypt, encrypt, Ciphertext, KeyGenerator, PrivateKey, PublicKey};

#[derive(Debug, Parser)]
#[clap(name = "rsa-cli", version, about = "Textbook RSA key generation / encryption / decryption tool")]
struct Cli {
    #[clap(subcommand)]
    command: Command,
    #[clap(short, long, global = true, help = "Disable status output")]
    silent: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a key pair and write public.key / private.key under KEY_PATH
    Generate {
        #[clap(short, long, value_parser, help = "Directory that receives the key files")]
        key_path: PathBuf,
        #[clap(short, long, value_parser, default_value_t = DEFAULT_MODULUS_BITS, help = "Modulus size in bits (even, at least 512)")]
        bits: u64,
        #[clap(short, long, value_parser, default_value_t = DEFAULT_ROUNDS, help = "Miller-Rabin rounds per candidate")]
        rounds: u32,
        #[clap(short, long, value_parser, default_value_t = num_cpus::get(), help = "Worker threads for the prime search")]
        threads: usize,
        #[clap(long, value_parser, default_value_t = DEFAULT_TIME_MAX_MS, help = "Max milliseconds per prime draw")]
        time_max: i64,
        #[clap(short, long, value_parser, default_value = "", help = "Comment stored in the key files")]
        comment: String,
    },
    /// Encrypt a message under a public key
    Encrypt {
        #[clap(short, long, value_parser, help = "Path to the public key")]
        public_key: PathBuf,
        #[clap(short, long, value_parser, help = "Message text to encrypt")]
        message: String,
        #[clap(short, long, value_parser, default_value = DEFAULT_CIPHERTEXT_FILE, help = "Ciphertext output path")]
        output: PathBuf,
    },
    /// Decrypt a ciphertext under a private key and print the message
    Decrypt {
        #[clap(short, long, value_parser, help = "Path to the private key")]
        private_key: PathBuf,
        #[clap(short, long, value_parser, help = "Path to the armored ciphertext")]
        ciphertext: PathBuf,
        #[clap(short, long, value_parser, help = "Write the message here instead of printing it")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Generate {
            key_path,
            bits,
            rounds,
            threads,
            time_max,
            comment,
        } => {
            let mut generator = KeyGenerator::new(bits);
            generator.rounds = rounds;
            generator.threads = threads;
            generator.time_max_ms = time_max;
            let progress = match cli.silent {
                true => None,
                false => Some(ProgressBar::new_spinner()),
            };
            if let Some(pb) = &progress {
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} [{elapsed_precise}] {msg}")
                        .unwrap(),
                );
                pb.enable_steady_tick(Duration::from_millis(120));
                pb.set_message(format!("generating {}-bit key pair", bits));
            }
            let pair = generator.generate();
            if let Some(pb) = &progress {
                pb.finish_and_clear();
            }
            let pair = pair?;
            let (public_path, private_path) = pair
                .save(&key_path, &comment)
                .with_context(|| format!("failed to write key files under {}", key_path.display()))?;
            if !cli.silent {
                println!(
                    "Generated key files: {}, {}",
                    public_path.display(),
                    private_path.display()
                );
            }
        }
        Command::Encrypt {
            public_key,
            message,
            output,
        } => {
            if message.is_empty() {
                bail!("message must not be empty");
            }
            let key = PublicKey::load(&public_key)
                .with_context(|| format!("failed to load public key from {}", public_key.display()))?;
            let ciphertext = encrypt(&key, &message)?;
            ciphertext
                .save(&output)
                .with_context(|| format!("failed to write ciphertext to {}", output.display()))?;
            if !cli.silent {
                println!("Encrypted message written to {}", output.display());
            }
        }
        Command::Decrypt {
            private_key,
            ciphertext,
            output,
        } => {
            let key = PrivateKey::load(&private_key).with_context(|| {
                format!("failed to load private key from {}", private_key.display())
            })?;
            let ciphertext = Ciphertext::load(&ciphertext)
                .with_context(|| format!("failed to load ciphertext from {}", ciphertext.display()))?;
            let message = decrypt(&key, &ciphertext)?;
            match output {
                Some(path) => {
                    fs::write(&path, &message)
                        .with_context(|| format!("failed to write message to {}", path.display()))?;
                    if !cli.silent {
                        println!("Decrypted message written to {}", path.display());
                    }
                }
                None => println!("Decrypted message: {}", message),
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crate::rsa::{decrypt, encrypt, Ciphertext, KeyGenerator, PrivateKey, PublicKey};

    #[test]
    fn full_flow_through_the_filesystem() {
        let generator = KeyGenerator {
            min_modulus_bits: 16,
            ..KeyGenerator::new(128)
        };
        let pair = generator.generate().unwrap();
        let dir = std::env::temp_dir().join(format!("rsa-cli-flow-{}", std::process::id()));
        let (public_path, private_path) = pair.save(&dir, "integration").unwrap();

        let public = PublicKey::load(&public_path).unwrap();
        let ciphertext = encrypt(&public, "Attack at dawn").unwrap();
        let ciphertext_path = dir.join("message.asc");
        ciphertext.save(&ciphertext_path).unwrap();

        let private = PrivateKey::load(&private_path).unwrap();
        let loaded = Ciphertext::load(&ciphertext_path).unwrap();
        assert_eq!(decrypt(&private, &loaded).unwrap(), "Attack at dawn");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn mismatched_pairs_do_not_round_trip() {
        let generator = KeyGenerator {
            min_modulus_bits: 16,
            ..KeyGenerator::new(64)
        };
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        let ciphertext = encrypt(&first.public, "secret").unwrap();
        // Decrypting under an unrelated key must not recover the message;
        // depending on the garbage it may fail outright instead.
        match decrypt(
            &PrivateKey {
                modulus: second.private.modulus.clone(),
                exponent: second.private.exponent.clone(),
            },
            &Ciphertext {
                value: ciphertext.value.clone() % &second.private.modulus,
            },
        ) {
            Ok(recovered) => assert_ne!(recovered, "secret"),
            Err(_) => {}
        }
    }
}
