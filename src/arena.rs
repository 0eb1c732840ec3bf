//! Arena-based element storage with page-aligned growth
//!
//! Elements are fixed-width byte records laid out back to back in a single
//! buffer. Growth doubles the slot count, rounding every request up to a
//! whole number of pages. When a request is refused the increment is halved
//! and retried until it reaches zero, at which point the arena gives up.

use tracing::trace;

use crate::error::{Result, TransposeError};

/// Allocation granularity for growth requests
pub const PAGE_SIZE: usize = 4096;

/// Decides whether a growth request may be satisfied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReservePolicy {
    /// Ask the global allocator, reporting refusal instead of aborting
    #[default]
    System,
    /// Refuse any request whose total size exceeds the given byte count
    Capped(usize),
}

impl ReservePolicy {
    /// Try to make room for `total_bytes` bytes in `buf`
    fn reserve(self, buf: &mut Vec<u8>, total_bytes: usize) -> bool {
        if let ReservePolicy::Capped(limit) = self {
            if total_bytes > limit {
                return false;
            }
        }
        let additional = total_bytes.saturating_sub(buf.len());
        buf.try_reserve_exact(additional).is_ok()
    }
}

/// Round a slot count up to a page-aligned byte size
fn request_bytes(width: usize, slots: usize) -> Option<usize> {
    let bytes = width.checked_mul(slots)?;
    bytes.div_ceil(PAGE_SIZE).checked_mul(PAGE_SIZE)
}

/// Stores fixed-width elements with memory tracking
#[derive(Debug)]
pub struct Arena {
    /// Raw element data, `len * width` bytes
    data: Vec<u8>,
    /// Bytes per element
    width: usize,
    /// Number of element slots granted so far
    capacity: usize,
    /// Number of elements stored
    len: usize,
    /// Size of the last successful growth request
    bytes_allocated: usize,
    policy: ReservePolicy,
}

impl Arena {
    pub fn new(width: usize, policy: ReservePolicy) -> Self {
        debug_assert!(width > 0, "element width must be positive");
        Self {
            data: Vec::new(),
            width,
            capacity: 0,
            len: 0,
            bytes_allocated: 0,
            policy,
        }
    }

    /// Append an element, zero-padding or cutting it to the element width
    pub fn push(&mut self, element: &[u8]) -> Result<()> {
        if self.len >= self.capacity {
            self.grow()?;
        }
        let n = element.len().min(self.width);
        self.data.extend_from_slice(&element[..n]);
        self.data.resize(self.data.len() + self.width - n, 0);
        self.len += 1;
        Ok(())
    }

    /// Get the element at a flat index
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn get(&self, index: usize) -> &[u8] {
        assert!(index < self.len, "element index {index} out of bounds ({})", self.len);
        let start = index * self.width;
        &self.data[start..start + self.width]
    }

    /// Iterate over stored elements in insertion order
    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(self.width)
    }

    /// Extend capacity by one increment, backing off on refusal
    fn grow(&mut self) -> Result<()> {
        let mut increment = if self.capacity == 0 {
            (PAGE_SIZE / self.width).max(1)
        } else {
            self.capacity
        };

        loop {
            let requested = request_bytes(self.width, self.capacity.saturating_add(increment));
            if let Some(bytes) = requested {
                trace!("attempting realloc({}) for {} slots", bytes, self.capacity + increment);
                if self.policy.reserve(&mut self.data, bytes) {
                    trace!("realloc({}) passed", bytes);
                    self.bytes_allocated = bytes;
                    self.capacity += increment;
                    return Ok(());
                }
                trace!("realloc({}) failed", bytes);
            }

            increment >>= 1;
            if increment == 0 {
                return Err(TransposeError::AllocationExhausted {
                    requested_bytes: requested.unwrap_or(usize::MAX),
                });
            }
        }
    }

    /// Re-lay rows of uneven length into a `row_lengths.len() x cols` grid
    ///
    /// `row_lengths` must sum to `self.len()` and no entry may exceed `cols`.
    /// Rows are moved back to front so each move only overwrites data that
    /// has already been relocated; the gaps are zero-filled.
    ///
    /// # Panics
    ///
    /// Panics if `row_lengths` does not sum to `self.len()` or an entry
    /// exceeds `cols`.
    pub fn pad_rows(&mut self, row_lengths: &[usize], cols: usize) -> Result<()> {
        let total: usize = row_lengths.iter().sum();
        assert_eq!(total, self.len, "row lengths sum to {total}, arena holds {}", self.len);
        assert!(row_lengths.iter().all(|&n| n <= cols), "row longer than {cols} columns");
        let target = row_lengths.len() * cols;
        if target == self.len {
            return Ok(());
        }

        while self.capacity < target {
            self.grow()?;
        }

        let w = self.width;
        let mut src_end = self.len;
        self.data.resize(target * w, 0);
        for (row, &n) in row_lengths.iter().enumerate().rev() {
            let src_start = src_end - n;
            let dst_start = row * cols;
            if dst_start != src_start {
                self.data.copy_within(src_start * w..src_end * w, dst_start * w);
            }
            self.data[(dst_start + n) * w..(dst_start + cols) * w].fill(0);
            src_end = src_start;
        }
        self.len = target;
        Ok(())
    }

    /// Get number of element slots granted
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get total bytes requested by the last growth
    pub fn bytes_allocated(&self) -> usize {
        self.bytes_allocated
    }

    /// Get number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if arena is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
