use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::{Condvar, Mutex};
use silt_base::{bad_range, unsupported, Result};
use tracing::debug;

use crate::index::{Payload, RowIndex};

// Rows are fed to the predicate in fixed chunks; 64k rows keeps each
// worker's scratch buffer at 256kb.
pub(crate) const FILTER_CHUNK_ROWS: i64 = 65536;

// Slot reservation for stitching chunk results into the shared output
// buffer. Workers commit in strict ascending chunk order: the predicate
// emits ascending rows within a chunk and chunks cover ascending row
// ranges, so ordered commits keep the whole output ascending.
struct OrderedCommit {
    turn: Mutex<CommitTurn>,
    advanced: Condvar,
}

struct CommitTurn {
    next_chunk: i64,
    out_len: usize,
}

impl OrderedCommit {
    fn new() -> Self {
        OrderedCommit {
            turn: Mutex::new(CommitTurn {
                next_chunk: 0,
                out_len: 0,
            }),
            advanced: Condvar::new(),
        }
    }

    // Block until it is chunk's turn, reserve nout output slots, pass
    // the turn on. Returns the reserved offset.
    fn reserve(&self, chunk: i64, nout: usize) -> usize {
        let mut turn = self.turn.lock();
        while turn.next_chunk != chunk {
            self.advanced.wait(&mut turn);
        }
        let off = turn.out_len;
        turn.out_len += nout;
        turn.next_chunk += 1;
        drop(turn);
        self.advanced.notify_all();
        off
    }

    fn out_len(&self) -> usize {
        self.turn.lock().out_len
    }
}

// The workers write disjoint reserved ranges of the output buffer.
struct OutSlots(*mut i32);
unsafe impl Send for OutSlots {}
unsafe impl Sync for OutSlots {}

impl RowIndex {
    // Build a rowindex by running a filter predicate over [0, nrows) in
    // chunks on the worker pool. For each chunk the predicate receives
    // a row range [row0, row1) and a scratch slice, writes the selected
    // row numbers into the scratch in ascending order, and returns how
    // many it wrote. Chunks are handed out dynamically; each worker
    // reserves its output range in the ordered commit and copies the
    // scratch into place outside it, so the critical section stays two
    // counter updates long.
    pub fn from_filter32<F>(filter: F, nrows: i64) -> Result<RowIndex>
    where
        F: Fn(i64, i64, &mut [i32]) -> i32 + Sync,
    {
        if nrows < 0 || nrows > i32::MAX as i64 {
            return Err(bad_range("filter row count exceeds 32-bit range"));
        }
        // Worst case the predicate selects every row. Reserving that up
        // front keeps reallocation out of the commit path entirely.
        let mut out = vec![0i32; nrows as usize];
        let num_chunks = (nrows + FILTER_CHUNK_ROWS - 1) / FILTER_CHUNK_ROWS;
        let commit = OrderedCommit::new();
        let cursor = AtomicI64::new(0);
        let slots = OutSlots(out.as_mut_ptr());

        if num_chunks > 0 {
            rayon::broadcast(|_| {
                let slots = &slots;
                let mut scratch = vec![0i32; FILTER_CHUNK_ROWS as usize];
                loop {
                    let chunk = cursor.fetch_add(1, Ordering::Relaxed);
                    if chunk >= num_chunks {
                        break;
                    }
                    let row0 = chunk * FILTER_CHUNK_ROWS;
                    let row1 = (row0 + FILTER_CHUNK_ROWS).min(nrows);
                    let nout = filter(row0, row1, &mut scratch);
                    debug_assert!(nout >= 0 && (nout as i64) <= row1 - row0);
                    let nout = nout as usize;
                    let off = commit.reserve(chunk, nout);
                    if nout > 0 {
                        // Into the disjoint range reserved just above.
                        unsafe {
                            std::ptr::copy_nonoverlapping(
                                scratch.as_ptr(),
                                slots.0.add(off),
                                nout,
                            );
                        }
                    }
                }
            });
        }

        let out_len = commit.out_len();
        debug!(nrows, num_chunks, out_len, "filter assembly done");
        out.truncate(out_len);
        out.shrink_to_fit();
        let (lo, hi) = match out_len {
            0 => (0, 0),
            n => (out[0] as i64, out[n - 1] as i64),
        };
        Ok(RowIndex {
            len: out_len as i64,
            lo,
            hi,
            payload: Payload::Arr32(out),
        })
    }

    // 64-bit variant, reserved until a caller actually needs one.
    pub fn from_filter64<F>(_filter: F, _nrows: i64) -> Result<RowIndex>
    where
        F: Fn(i64, i64, &mut [i64]) -> i64 + Sync,
    {
        Err(unsupported("64-bit filter construction not implemented"))
    }
}
