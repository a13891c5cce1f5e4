use std::hash::Hasher;

/// A deterministic FNV-1a 64-bit hasher.
///
/// `DefaultHasher` is randomised per process, so run seeds derived from it
/// would differ between a server and the client replaying the same request.
#[derive(Debug)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }

    /// Feed a float by its bit pattern; `-0.0` is folded onto `0.0`.
    pub fn write_f64(&mut self, value: f64) {
        let value = if value == 0.0 { 0.0 } else { value };
        self.write_u64(value.to_bits());
    }

    /// Feed a string followed by a terminator so adjacent fields cannot alias.
    pub fn write_str(&mut self, value: &str) {
        self.write(value.as_bytes());
        self.write_u8(0xff);
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= byte as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}
