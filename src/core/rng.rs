//! Random Number Generator
//!
//! A small PCG32 generator. Every image tile selects its own stream
//! via **set_sequence()**, so worker threads never share generator
//! state and a render is reproducible for a given seed.

use hexf::*;

// rs_bsp
use crate::core::base::Float;

pub const FLOAT_ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");
pub const PCG32_DEFAULT_STATE: u64 = 0x853c_49e6_748f_ea9b;
pub const PCG32_DEFAULT_STREAM: u64 = 0xda3e_39cb_94b9_5bdb;
pub const PCG32_MULT: u64 = 0x5851_f42d_4c95_7f2d;

#[derive(Debug, Copy, Clone)]
pub struct Rng {
    state: u64,
    inc: u64,
}

impl Default for Rng {
    fn default() -> Self {
        Rng {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl Rng {
    pub fn new(sequence: u64) -> Self {
        let mut rng = Rng::default();
        rng.set_sequence(sequence);
        rng
    }
    pub fn set_sequence(&mut self, initseq: u64) {
        self.state = 0_u64;
        self.inc = initseq.wrapping_shl(1) | 1;
        self.uniform_uint32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        self.uniform_uint32();
    }
    pub fn uniform_uint32(&mut self) -> u32 {
        let oldstate: u64 = self.state;
        self.state = oldstate.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);
        let xorshifted: u32 = ((oldstate.wrapping_shr(18) ^ oldstate).wrapping_shr(27)) as u32;
        let rot: u32 = oldstate.wrapping_shr(59) as u32;
        xorshifted.rotate_right(rot)
    }
    /// Uniform value in `[0, 1)`.
    pub fn uniform_float(&mut self) -> Float {
        (self.uniform_uint32() as Float * hexf32!("0x1.0p-32") as Float)
            .min(FLOAT_ONE_MINUS_EPSILON)
    }
    /// Uniform value in `[low, high)`.
    pub fn uniform_range(&mut self, low: Float, high: Float) -> Float {
        low + (high - low) * self.uniform_float()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn floats_stay_in_unit_interval() {
        let mut rng = Rng::new(7);
        for _ in 0..10_000 {
            let f = rng.uniform_float();
            assert!(f >= 0.0 && f < 1.0);
            let r = rng.uniform_range(-2.0, 3.0);
            assert!(r >= -2.0 && r < 3.0);
        }
    }

    #[test]
    fn sequences_are_reproducible_and_distinct() {
        let mut a = Rng::new(1);
        let mut b = Rng::new(1);
        let mut c = Rng::new(2);
        let xs: Vec<u32> = (0..16).map(|_| a.uniform_uint32()).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.uniform_uint32()).collect();
        let zs: Vec<u32> = (0..16).map(|_| c.uniform_uint32()).collect();
        assert_eq!(xs, ys);
        assert_ne!(xs, zs);
    }
}
