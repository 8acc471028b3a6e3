// SPDX-License-Identifier: AGPL-3.0-or-later

//! Password hashing for account credentials.
//!
//! Passwords are stored as salted, iterated PBKDF2-HMAC-SHA256 digests in
//! the form:
//!
//! ```text
//! pbkdf2-sha256$<iterations>$<salt-base64>$<digest-base64>
//! ```
//!
//! Earlier deployments wrote unsalted SHA-256 hex digests into
//! `accounts.json`; those still verify so existing data files keep working,
//! but new hashes are always written in the salted form.

use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::config::KDF_ITERATIONS;

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "pbkdf2-sha256";
const DIGEST_LEN: usize = 32;

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = uuid::Uuid::new_v4().into_bytes();
    encode(password, &salt, KDF_ITERATIONS)
}

/// Verify a password against a stored hash.
///
/// Accepts both the current salted format and legacy unsalted SHA-256 hex
/// digests. Malformed stored values never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match parse(stored) {
        Some((iterations, salt, digest)) => {
            let candidate = derive(password, &salt, iterations);
            constant_time_eq(&candidate, &digest)
        }
        None => verify_legacy(password, stored),
    }
}

fn encode(password: &str, salt: &[u8], iterations: u32) -> String {
    let digest = derive(password, salt, iterations);
    format!(
        "{SCHEME}${iterations}${}${}",
        Base64::encode_string(salt),
        Base64::encode_string(&digest)
    )
}

fn parse(stored: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = stored.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = Base64::decode_vec(parts.next()?).ok()?;
    let digest = Base64::decode_vec(parts.next()?).ok()?;
    if parts.next().is_some() || iterations == 0 || digest.len() != DIGEST_LEN {
        return None;
    }
    Some((iterations, salt, digest))
}

/// PBKDF2-HMAC-SHA256, single 32-byte block.
fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; DIGEST_LEN] {
    let mut mac = hmac_keyed(password);
    mac.update(salt);
    mac.update(&1u32.to_be_bytes());
    let mut block: [u8; DIGEST_LEN] = mac.finalize().into_bytes().into();

    let mut output = block;
    for _ in 1..iterations {
        let mut mac = hmac_keyed(password);
        mac.update(&block);
        block = mac.finalize().into_bytes().into();
        for (out, byte) in output.iter_mut().zip(block.iter()) {
            *out ^= byte;
        }
    }
    output
}

fn hmac_keyed(password: &str) -> HmacSha256 {
    // HMAC accepts keys of any length; this cannot fail.
    HmacSha256::new_from_slice(password.as_bytes()).expect("HMAC key of any length")
}

/// Legacy format: unsalted hex-encoded SHA-256 of the password bytes.
fn verify_legacy(password: &str, stored: &str) -> bool {
    if stored.len() != 64 || !stored.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    let digest = Sha256::digest(password.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    constant_time_eq(hex.as_bytes(), stored.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
