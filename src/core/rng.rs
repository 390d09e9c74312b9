//! Keystream Generator
//!
//! MT19937 seeded with the reference array initialisation, so that
//! existing track assets decode bit-exactly.
//! Every decode call builds its own generator; nothing is process-wide.

use flate2::Crc;

/// Obfuscation constant mixed into every track key.
pub const TRACK_KEY_A: u32 = 0x51B;

/// Second obfuscation constant mixed into every track key.
pub const TRACK_KEY_B: u32 = 0x103B5;

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_B0DF;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7FFF_FFFF;

/// Mersenne Twister (MT19937) producing 32-bit words.
///
/// # Determinism Guarantee
///
/// Given the same key, this generator produces the exact same sequence
/// of words on any platform.
///
/// # Example
///
/// ```
/// use roadbyte::core::rng::Mt19937;
///
/// let mut rng = Mt19937::from_key(5489);
/// assert_eq!(rng.next_u32(), 3382763572);
/// ```
#[derive(Clone)]
pub struct Mt19937 {
    state: Box<[u32; N]>,
    index: usize,
}

impl std::fmt::Debug for Mt19937 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mt19937")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl Mt19937 {
    /// Seed from a single 32-bit key using array initialisation.
    ///
    /// Equivalent to `init_by_array(&[key])`.
    pub fn from_key(key: u32) -> Self {
        Self::from_key_array(&[key])
    }

    /// Seed from an arbitrary key array.
    ///
    /// An empty slice is treated as `[0]`.
    pub fn from_key_array(key: &[u32]) -> Self {
        let key: &[u32] = if key.is_empty() { &[0] } else { key };

        let mut mt = Self::from_genrand(19_650_218);
        let state = &mut mt.state;

        let mut i = 1usize;
        let mut j = 0usize;
        for _ in 0..N.max(key.len()) {
            let prev = state[i - 1] ^ (state[i - 1] >> 30);
            state[i] = (state[i] ^ prev.wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                state[0] = state[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }

        for _ in 0..N - 1 {
            let prev = state[i - 1] ^ (state[i - 1] >> 30);
            state[i] = (state[i] ^ prev.wrapping_mul(1_566_083_941)).wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                state[0] = state[N - 1];
                i = 1;
            }
        }

        // MSB is 1, guaranteeing a non-zero initial state
        state[0] = UPPER_MASK;
        mt.index = N;
        mt
    }

    /// Linear-congruential state fill used as the base of array seeding.
    fn from_genrand(seed: u32) -> Self {
        let mut state = Box::new([0u32; N]);
        state[0] = seed;
        for i in 1..N {
            let prev = state[i - 1] ^ (state[i - 1] >> 30);
            state[i] = prev.wrapping_mul(1_812_433_253).wrapping_add(i as u32);
        }
        Self { state, index: N }
    }

    /// Generate the next tempered 32-bit word.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }

        let mut y = self.state[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9D2C_5680;
        y ^= (y << 15) & 0xEFC6_0000;
        y ^= y >> 18;
        y
    }

    /// Regenerate the full block of 624 words.
    fn twist(&mut self) {
        for kk in 0..N {
            let y = (self.state[kk] & UPPER_MASK) | (self.state[(kk + 1) % N] & LOWER_MASK);
            let mag = if y & 1 != 0 { MATRIX_A } else { 0 };
            self.state[kk] = self.state[(kk + M) % N] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }
}

/// Byte keystream: each generated word contributes its 4 little-endian bytes.
#[derive(Clone, Debug)]
pub struct Keystream {
    rng: Mt19937,
    word: [u8; 4],
    offset: usize,
}

impl Keystream {
    /// Create a fresh keystream for a derived track key.
    pub fn new(key: u32) -> Self {
        Self {
            rng: Mt19937::from_key(key),
            word: [0; 4],
            offset: 4,
        }
    }

    /// Next keystream byte.
    #[inline]
    pub fn next_byte(&mut self) -> u8 {
        if self.offset == 4 {
            self.word = self.rng.next_u32().to_le_bytes();
            self.offset = 0;
        }
        let byte = self.word[self.offset];
        self.offset += 1;
        byte
    }

    /// XOR `data` in place against the continuing keystream.
    pub fn apply(&mut self, data: &mut [u8]) {
        for byte in data {
            *byte ^= self.next_byte();
        }
    }
}

impl Iterator for Keystream {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        Some(self.next_byte())
    }
}

/// CRC32 (IEEE, zlib polynomial) of a byte slice.
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}

/// Derive the keystream key for a track.
///
/// `K = (seed ^ A ^ crc32(filename) ^ B) mod 2^32`. Only the low 32 bits
/// of the seed participate. `filename` is the bare file name, without any
/// directory component.
pub fn derive_track_key(seed: u64, filename: &str) -> u32 {
    let seed = seed as u32;
    seed ^ TRACK_KEY_A ^ crc32(filename.as_bytes()) ^ TRACK_KEY_B
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_constants() {
        assert_eq!(TRACK_KEY_A, 0x51B);
        assert_eq!(TRACK_KEY_B, 0x103B5);
    }

    #[test]
    fn test_mt_known_values() {
        // These values must never change!
        // If they do, every existing track asset stops decoding.
        let mut rng = Mt19937::from_key(0);
        assert_eq!(rng.next_u32(), 3626764237);
        assert_eq!(rng.next_u32(), 1654615998);

        let mut rng = Mt19937::from_key(123456789);
        assert_eq!(rng.next_u32(), 2754794679);
        assert_eq!(rng.next_u32(), 1899526012);
    }

    #[test]
    fn test_mt_across_twist_boundary() {
        let mut rng = Mt19937::from_key(5489);
        let words: Vec<u32> = (0..1300).map(|_| rng.next_u32()).collect();

        assert_eq!(words[0], 3382763572);
        assert_eq!(words[624], 3103970926);
        assert_eq!(words[1299], 877886483);
    }

    #[test]
    fn test_mt_determinism() {
        let mut rng1 = Mt19937::from_key(41017);
        let mut rng2 = Mt19937::from_key(41017);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_empty_key_array_matches_zero() {
        let mut a = Mt19937::from_key_array(&[]);
        let mut b = Mt19937::from_key(0);
        assert_eq!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_crc32_reference() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(b"TRK_41017.trk.enc"), 0x0A39_5E00);
    }

    #[test]
    fn test_derive_track_key() {
        assert_eq!(derive_track_key(41017, "TRK_41017.trk.enc"), 171505815);

        // Only the low 32 bits of the seed matter
        assert_eq!(
            derive_track_key(41017 | (7 << 32), "TRK_41017.trk.enc"),
            derive_track_key(41017, "TRK_41017.trk.enc"),
        );

        // The filename participates
        assert_ne!(
            derive_track_key(41017, "TRK_41017.trk.enc"),
            derive_track_key(41017, "TRK_58321.trk.enc"),
        );
    }

    #[test]
    fn test_keystream_little_endian_words() {
        let key = derive_track_key(41017, "TRK_41017.trk.enc");
        let bytes: Vec<u8> = Keystream::new(key).take(12).collect();
        assert_eq!(hex::encode(bytes), "ba00dcb68c98a6c7183a6a0a");
    }

    #[test]
    fn test_keystream_apply_is_involution() {
        let original = b"....#..#..FFFF".to_vec();
        let mut data = original.clone();

        Keystream::new(99).apply(&mut data);
        assert_ne!(data, original);

        Keystream::new(99).apply(&mut data);
        assert_eq!(data, original);
    }
}
