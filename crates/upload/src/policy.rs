//! Chunk-size policy.

const MIB: u64 = 1024 * 1024;

/// Chunk size for content below [`LARGE_CONTENT_THRESHOLD`]: 128 MiB.
pub const SMALL_CHUNK_SIZE: u64 = 128 * MIB;

/// Chunk size for content at or above the threshold: 256 MiB.
pub const LARGE_CHUNK_SIZE: u64 = 256 * MIB;

/// Content of 1 GiB or more uses [`LARGE_CHUNK_SIZE`].
pub const LARGE_CONTENT_THRESHOLD: u64 = 1024 * MIB;

/// Picks a chunk size from the total content length.
///
/// Evaluated once per upload and held constant for its lifetime. The
/// boundary is inclusive: content of exactly 1 GiB gets the large size.
pub fn chunk_size_for(total_len: u64) -> u64 {
    if total_len < LARGE_CONTENT_THRESHOLD {
        SMALL_CHUNK_SIZE
    } else {
        LARGE_CHUNK_SIZE
    }
}
