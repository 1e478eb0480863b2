pub mod cipher;
pub mod codec;
pub mod config;
pub mod error;
pub mod keygen;
pub mod keys;
pub mod math;
pub mod prime_gen;

pub use cipher::{decrypt, encrypt, Ciphertext};
pub use error::Error;
pub use keygen::KeyGenerator;
pub use keys::{KeyError, KeyPair, PrivateKey, PublicKey};
pub use prime_gen::PrimeGenerator;
