//! Stable node identity for the hit-test tree.

/// Id of a scene node. Stable across frames as long as the node is built
/// from the same path segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Id(pub u64);

impl Id {
    pub const fn raw(v: u64) -> Self {
        Self(v)
    }
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Builds an `Id` by folding path segments through 64-bit FNV-1a. A fixed
/// algorithm (rather than `DefaultHasher`) keeps ids reproducible across
/// builds and platforms.
#[derive(Clone, Copy, Debug)]
pub struct IdPath {
    h: u64,
}

impl IdPath {
    pub fn root(ns: &'static str) -> Self {
        let mut path = Self {
            h: FNV_OFFSET_BASIS,
        };
        path.absorb(ns.as_bytes());
        path
    }

    pub fn push_str(mut self, s: &str) -> Self {
        self.absorb(s.as_bytes());
        // Segment terminator, so ("ab","c") and ("a","bc") hash apart.
        self.absorb(&[0xff]);
        self
    }

    pub fn push_u64(mut self, v: u64) -> Self {
        self.absorb(&v.to_le_bytes());
        self.absorb(&[0xff]);
        self
    }

    pub fn finish(self) -> Id {
        Id(self.h)
    }

    fn absorb(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.h = (self.h ^ b as u64).wrapping_mul(FNV_PRIME);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/ui/id.rs"]
mod tests;
