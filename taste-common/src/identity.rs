//! User identity generation
//!
//! Opaque short ids for quiz participants. The `tm_` prefix keeps the
//! space distinguishable from other identifier spaces in the system.

use rand::Rng;

/// Prefix on every generated user id
pub const USER_ID_PREFIX: &str = "tm_";

/// Number of random characters following the prefix
pub const USER_ID_RANDOM_LEN: usize = 9;

/// Total length of a generated user id
pub const USER_ID_LEN: usize = USER_ID_PREFIX.len() + USER_ID_RANDOM_LEN;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a new opaque user id, e.g. `tm_k7x2m9qp4`
///
/// Not cryptographically secure. The 36^9 keyspace keeps collisions
/// acceptably rare for the expected population; handling an "already
/// exists" insert is the caller's responsibility.
pub fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();

    let mut id = String::with_capacity(USER_ID_LEN);
    id.push_str(USER_ID_PREFIX);
    for _ in 0..USER_ID_RANDOM_LEN {
        let idx = rng.gen_range(0..ALPHABET.len());
        id.push(ALPHABET[idx] as char);
    }
    id
}
