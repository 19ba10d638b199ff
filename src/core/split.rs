//! Train/test split assignment.
//!
//! The split a file lands in is a pure function of its name, so re-running
//! the organizer (or reimplementing it elsewhere) partitions an identical
//! source set identically.

/// The two partitions of the output dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSplit {
    Train,
    Test,
}

impl DatasetSplit {
    pub fn as_str(&self) -> &str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Test => "test",
        }
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a digest of the UTF-8 bytes of `name`.
///
/// Written out in full rather than going through `DefaultHasher`, whose
/// output is only guaranteed stable within one process.
pub fn stable_digest(name: &str) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in name.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Assign a file to a split from its name alone.
///
/// Digest modulo 10: residues 0-7 map to train, 8-9 to test, giving the
/// nominal 80/20 ratio. Changing either constant repartitions every dataset
/// produced so far, so both are fixed.
pub fn assign(file_name: &str) -> DatasetSplit {
    if stable_digest(file_name) % 10 < 8 {
        DatasetSplit::Train
    } else {
        DatasetSplit::Test
    }
}
