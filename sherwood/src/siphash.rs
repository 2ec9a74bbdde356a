//! Keyed SipHash with compile-time round counts
//!
//! The built-in contexts need hash values that are stable across runs,
//! which rules out `std::collections::hash_map::RandomState`. This module
//! keeps a small SipHash implementation of its own: [`SipState`] holds the
//! four state words and performs the `SipRound` function, and [`SipHasher`]
//! layers classic keyed initialization, 8-byte little-endian message
//! blocks, and the length-tagged final block on top of it, exposed through
//! [`core::hash::Hasher`]. Round counts are const generics so the
//! SipHash-1-3 used by the contexts and the SipHash-2-4 checked against the
//! published test vectors share one core.
//!
//! SipHash is defined by Jean-Philippe Aumasson and Daniel J. Bernstein in
//! their paper "SipHash: a fast short-input PRF" (2012).

use std::fmt;
use std::fmt::Debug;
use std::hash::Hasher;

/// Internal state of one SipHash instance
#[derive(Clone, Copy, Eq, PartialEq)]
struct SipState {
    /// State word `v0`
    v0: u64,
    /// State word `v1`
    v1: u64,
    /// State word `v2`
    v2: u64,
    /// State word `v3`
    v3: u64,
}

impl Debug for SipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SipState {{ {:#018x}, {:#018x}, {:#018x}, {:#018x} }}",
            self.v0, self.v1, self.v2, self.v3
        )
    }
}

impl SipState {
    /// Initialize state from a 128-bit key, split into two words
    ///
    /// This is the keyed initialization from the SipHash paper, XORing
    /// the key against the "somepseudorandomlygeneratedbytes" constants.
    fn new_keyed(k0: u64, k1: u64) -> Self {
        Self {
            v0: k0 ^ 0x736f6d6570736575,
            v1: k1 ^ 0x646f72616e646f6d,
            v2: k0 ^ 0x6c7967656e657261,
            v3: k1 ^ 0x7465646279746573,
        }
    }

    /// One `SipRound` as defined in the SipHash paper
    #[inline(always)]
    fn sip_round(&mut self) {
        self.v0 = self.v0.wrapping_add(self.v1);
        self.v2 = self.v2.wrapping_add(self.v3);

        self.v1 = self.v1.rotate_left(13);
        self.v3 = self.v3.rotate_left(16);

        self.v1 ^= self.v0;
        self.v3 ^= self.v2;
        self.v0 = self.v0.rotate_left(32);

        self.v2 = self.v2.wrapping_add(self.v1);
        self.v0 = self.v0.wrapping_add(self.v3);

        self.v1 = self.v1.rotate_left(17);
        self.v3 = self.v3.rotate_left(21);

        self.v1 ^= self.v2;
        self.v3 ^= self.v0;
        self.v2 = self.v2.rotate_left(32);
    }
}

/// Streaming SipHash over a byte message
///
/// `C` is the number of compression rounds per message block and `D` the
/// number of finalization rounds. The hasher buffers bytes until a full
/// 8-byte block is available, so split [`Hasher::write`] calls produce
/// the same result as one call over the concatenated message.
#[derive(Clone, Debug)]
pub struct SipHasher<const C: usize, const D: usize> {
    /// Running state, updated once per complete message block
    state: SipState,
    /// Tail bytes of an incomplete message block
    buf: [u8; 8],
    /// Number of valid bytes in `buf`, always less than 8
    buf_len: usize,
    /// Total message length so far, reduced mod 256 at finalization
    len: u64,
}

/// The SipHash-1-3 variant used by this crate's built-in contexts
///
/// One compression round and three finalization rounds, the same
/// trade-off the standard library makes for its hash maps.
pub type SipHasher13 = SipHasher<1, 3>;

impl<const C: usize, const D: usize> SipHasher<C, D> {
    /// Construct a hasher from a 128-bit key, split into two words
    pub fn new_with_keys(k0: u64, k1: u64) -> Self {
        Self {
            state: SipState::new_keyed(k0, k1),
            buf: [0_u8; 8],
            buf_len: 0,
            len: 0,
        }
    }

    /// Mix one 64-bit message block into `state`
    #[inline(always)]
    fn compress(state: &mut SipState, m: u64) {
        state.v3 ^= m;
        for _ in 0..C {
            state.sip_round();
        }
        state.v0 ^= m;
    }
}

impl<const C: usize, const D: usize> Hasher for SipHasher<C, D> {
    /// Feed message bytes, compressing each completed 8-byte block
    fn write(&mut self, mut bytes: &[u8]) {
        self.len = self.len.wrapping_add(bytes.len() as u64);

        if self.buf_len > 0 {
            let take = bytes.len().min(8 - self.buf_len);
            self.buf[self.buf_len..self.buf_len + take].copy_from_slice(&bytes[..take]);
            self.buf_len += take;
            bytes = &bytes[take..];
            if self.buf_len < 8 {
                return;
            }
            Self::compress(&mut self.state, u64::from_le_bytes(self.buf));
            self.buf_len = 0;
        }

        let mut blocks = bytes.chunks_exact(8);
        for block in &mut blocks {
            let m = u64::from_le_bytes(block.try_into().expect("block is 8 bytes"));
            Self::compress(&mut self.state, m);
        }

        let tail = blocks.remainder();
        self.buf[..tail.len()].copy_from_slice(tail);
        self.buf_len = tail.len();
    }

    /// Finish the hash without consuming the hasher
    ///
    /// The final block holds the buffered tail bytes plus the message
    /// length mod 256 in the most significant byte, per the paper.
    fn finish(&self) -> u64 {
        let mut state = self.state;

        let mut last = [0_u8; 8];
        last[..self.buf_len].copy_from_slice(&self.buf[..self.buf_len]);
        last[7] = self.len as u8;
        Self::compress(&mut state, u64::from_le_bytes(last));

        state.v2 ^= 0xff;
        for _ in 0..D {
            state.sip_round();
        }
        state.v0 ^ state.v1 ^ state.v2 ^ state.v3
    }
}
