//! Provides a queue of image tiles for the worker threads. The queue
//! itself is not changed after creation, we simply work through it
//! with an atomic counter to track the index of the next tile to work
//! on.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// others
use log::warn;

/// The queue of tiles to be worked on, shared immutably between worker
/// threads.
pub struct BlockQueue {
    /// tile coordinates, ordered along a Morton curve
    blocks: Vec<(u32, u32)>,
    /// size of an individual tile in pixels
    dimensions: (u32, u32),
    /// index of the next tile to be worked on
    next: AtomicUsize,
}

impl BlockQueue {
    /// Create a block queue for an image of *img* pixels cut into tiles
    /// of *dim* pixels. Tiles at the right and top border may reach
    /// past the image.
    pub fn new(img: (u32, u32), dim: (u32, u32)) -> BlockQueue {
        let dim: (u32, u32) = (dim.0.max(1), dim.1.max(1));
        let num_blocks: (u32, u32) = (
            (img.0 + dim.0 - 1) / dim.0,
            (img.1 + dim.1 - 1) / dim.1,
        );
        let mut blocks: Vec<(u32, u32)> = (0..num_blocks.0 * num_blocks.1)
            .map(|i| (i % num_blocks.0, i / num_blocks.0))
            .collect();
        blocks.sort_by_key(|b| morton2(*b));
        if blocks.is_empty() {
            warn!("Block queue for image {:?} is empty", img);
        }
        BlockQueue {
            blocks,
            dimensions: dim,
            next: AtomicUsize::new(0),
        }
    }
    pub fn block_dim(&self) -> (u32, u32) {
        self.dimensions
    }
    /// Get the next tile and its index in the queue, or None if the
    /// queue is finished.
    pub fn next(&self) -> Option<(usize, (u32, u32))> {
        let i = self.next.fetch_add(1, Ordering::AcqRel);
        self.blocks.get(i).map(|b| (i, *b))
    }
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.next.load(Ordering::Acquire) >= self.blocks.len()
    }
}

/// Insert a 0 bit between each of the low 16 bits of x
fn part1_by1(mut x: u32) -> u32 {
    x &= 0x0000_ffff;
    x = (x ^ (x << 8)) & 0x00ff_00ff;
    x = (x ^ (x << 4)) & 0x0f0f_0f0f;
    x = (x ^ (x << 2)) & 0x3333_3333;
    (x ^ (x << 1)) & 0x5555_5555
}

/// Compute the Morton code for the `(x, y)` position.
fn morton2(p: (u32, u32)) -> u32 {
    (part1_by1(p.1) << 1) + part1_by1(p.0)
}
