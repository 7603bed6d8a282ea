//! Schema fingerprints: SHA-256 and CRC-64-AVRO digests of canonical form.
//!
//! Fingerprints are computed lazily from a schema's canonical form and
//! cached in compute-once cells. A named schema and every reference to it
//! share one set of cells, which is how reference fingerprints delegate to
//! their target without a pointer to it.

use std::sync::{Arc, OnceLock};

use sha2::{Digest, Sha256};

/// CRC-64-AVRO empty value, from the Avro specification.
const CRC64_EMPTY: u64 = 0xc15d_213a_a4d7_a795;

/// Canonical names of the eight primitive types, in tag order.
const PRIMITIVE_NAMES: [&str; 8] = [
    "null", "boolean", "int", "long", "float", "double", "bytes", "string",
];

/// Compute-once fingerprint cells for one schema identity.
///
/// Cloning shares the cells, so a reference node cloned from its target's
/// cache always serves the target's digests. Caches never participate in
/// schema equality.
#[derive(Debug, Clone, Default)]
pub(crate) struct FingerprintCache {
    cells: Arc<CacheCells>,
}

#[derive(Debug, Default)]
struct CacheCells {
    sha256: OnceLock<[u8; 32]>,
    rabin: OnceLock<u64>,
}

impl FingerprintCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// SHA-256 digest, computing it from `canonical` at most once.
    pub(crate) fn sha256_with(&self, canonical: impl FnOnce() -> String) -> [u8; 32] {
        *self
            .cells
            .sha256
            .get_or_init(|| sha256_digest(canonical().as_bytes()))
    }

    /// CRC-64-AVRO digest, computing it from `canonical` at most once.
    pub(crate) fn rabin_with(&self, canonical: impl FnOnce() -> String) -> u64 {
        *self
            .cells
            .rabin
            .get_or_init(|| crc64_avro(canonical().as_bytes()))
    }
}

impl PartialEq for FingerprintCache {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for FingerprintCache {}

/// SHA-256 digest of a byte string.
pub(crate) fn sha256_digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// CRC-64-AVRO (Rabin) fingerprint, using the table algorithm from the
/// Avro specification.
pub(crate) fn crc64_avro(bytes: &[u8]) -> u64 {
    let table = crc64_table();
    let mut fp = CRC64_EMPTY;
    for &b in bytes {
        fp = (fp >> 8) ^ table[((fp ^ u64::from(b)) & 0xff) as usize];
    }
    fp
}

fn crc64_table() -> &'static [u64; 256] {
    static TABLE: OnceLock<[u64; 256]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0u64; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            let mut fp = i as u64;
            for _ in 0..8 {
                fp = (fp >> 1) ^ (CRC64_EMPTY & (fp & 1).wrapping_neg());
            }
            *entry = fp;
        }
        table
    })
}

/// Digests of the eight primitive schemas, served from a read-only table
/// built on first use. The fallback arm never runs for a valid primitive
/// name but keeps the lookup total.
pub(crate) fn primitive_digests(name: &str) -> ([u8; 32], u64) {
    static TABLE: OnceLock<[([u8; 32], u64); 8]> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        PRIMITIVE_NAMES.map(|primitive| {
            let canonical = format!("\"{}\"", primitive);
            (
                sha256_digest(canonical.as_bytes()),
                crc64_avro(canonical.as_bytes()),
            )
        })
    });
    match PRIMITIVE_NAMES.iter().position(|n| *n == name) {
        Some(index) => table[index],
        None => {
            let canonical = format!("\"{}\"", name);
            (
                sha256_digest(canonical.as_bytes()),
                crc64_avro(canonical.as_bytes()),
            )
        }
    }
}
