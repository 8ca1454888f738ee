//! Reusable datagram buffers.
//!
//! Ownership moves exactly once per hop: the reader owns a buffer until it is
//! enqueued, the processor owns it until the reply is written, and the pool
//! owns it between uses. Dropping a [`PooledBuffer`] is the only way back
//! into the pool.

use crossbeam_queue::ArrayQueue;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

pub struct BufferPool {
    buffers: Arc<ArrayQueue<Vec<u8>>>,
    buffer_size: usize,
}

impl BufferPool {
    /// Pre-allocates `pool_size` buffers of `buffer_size` bytes each.
    pub fn new(pool_size: usize, buffer_size: usize) -> Self {
        let buffers = Arc::new(ArrayQueue::new(pool_size.max(1)));
        for _ in 0..pool_size {
            let _ = buffers.push(vec![0u8; buffer_size]);
        }

        Self {
            buffers,
            buffer_size,
        }
    }

    /// Borrows a buffer, allocating a fresh one when the pool is drained.
    pub fn acquire(&self) -> PooledBuffer {
        let data = self
            .buffers
            .pop()
            .unwrap_or_else(|| vec![0u8; self.buffer_size]);

        PooledBuffer {
            data,
            len: 0,
            pool: Arc::clone(&self.buffers),
        }
    }

    pub fn available(&self) -> usize {
        self.buffers.len()
    }
}

/// A full-size buffer plus the number of bytes of it that hold data.
pub struct PooledBuffer {
    data: Vec<u8>,
    len: usize,
    pool: Arc<ArrayQueue<Vec<u8>>>,
}

impl PooledBuffer {
    /// The valid bytes.
    pub fn filled(&self) -> &[u8] {
        &self.data[..self.len]
    }

    pub fn set_len(&mut self, len: usize) {
        self.len = len.min(self.data.len());
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let buffer = std::mem::take(&mut self.data);
        // A full pool just lets the buffer go.
        let _ = self.pool.push(buffer);
    }
}
