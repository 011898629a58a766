//! MurmurHash3-32 over an opaque byte span.
//!
//! Every probe origin in the map is derived from this function, so it must be
//! deterministic across processes and across rehashes: no per-instance seed,
//! no dependency on allocation state. Not cryptographic.

/// Fixed seed; keeps hashes reproducible in tests and across rehash.
const SEED: u32 = 0x9747_b28c;

const C1: u32 = 0xcc9e_2d51;
const C2: u32 = 0x1b87_3593;

/// Hash an arbitrary-length byte span to 32 bits.
///
/// Processes little-endian 4-byte blocks, mixes any 1-3 tail bytes, and folds
/// the input length into the finalizer so different-length spans sharing a
/// prefix do not collide trivially.
pub(crate) fn murmur3_32(data: &[u8]) -> u32 {
    let mut h = SEED;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let mut k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
        h = h.rotate_left(13).wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut k = 0u32;
        for (i, &byte) in tail.iter().enumerate() {
            k ^= (byte as u32) << (8 * i);
        }
        k = k.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2);
        h ^= k;
    }

    h ^= data.len() as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}
