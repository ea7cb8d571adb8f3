//! The key managers bundled with this crate
//!
//! Each manager parses its key format, generates fresh key material and serializes the
//! resulting key. Managers for asymmetric keys also derive public key data.

mod chacha20poly1305;
mod ed25519;
mod hmac;
mod xchacha20poly1305;

pub use self::chacha20poly1305::*;
pub use self::ed25519::*;
pub use self::hmac::*;
pub use self::xchacha20poly1305::*;

use rand::RngCore;
use zeroize::Zeroizing;

/// Version of every key and key format produced or accepted by the bundled managers
pub const KEY_VERSION: u32 = 0;

/// Fresh key material from the operating system's random number generator
fn random_key<const N: usize>() -> Zeroizing<[u8; N]> {
    let mut key = Zeroizing::new([0u8; N]);
    rand::rngs::OsRng.fill_bytes(&mut key[..]);
    key
}
