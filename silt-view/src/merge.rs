use crate::index::{scan_lo_hi, IdxWord, Payload, RowIndex};
use crate::range::slice_bounds;

// Gather ab[start + step*k] for k in 0..n, keeping ab's width.
fn gather_slice<T: IdxWord>(ab: &[T], start: i64, step: i64, n: i64) -> Vec<T> {
    let mut buf = Vec::with_capacity(n as usize);
    let mut ic = start;
    for _ in 0..n {
        buf.push(ab[ic as usize]);
        // The position past the final element is never read.
        ic = ic.wrapping_add(step);
    }
    buf
}

impl RowIndex {
    // Compose two rowindices. If ab maps rows of A onto B and bc maps
    // rows of B onto C, the merge maps rows of A onto C, with
    // result(i) = ab(bc(i)) and length bc.len. None for ab means the
    // identity. The result is re-encoded in the smallest sufficient
    // form. The caller guarantees bc.hi < ab.len; the gathers only
    // range-check as far as slice indexing does.
    pub fn merge(ri_ab: Option<&RowIndex>, ri_bc: &RowIndex) -> RowIndex {
        let n = ri_bc.len;
        if n == 0 {
            // Canonical empty selection.
            return RowIndex {
                len: 0,
                lo: 0,
                hi: 0,
                payload: Payload::Slice { start: 0, step: 1 },
            };
        }
        let ab = match ri_ab {
            None => return ri_bc.clone(),
            Some(ab) => ab,
        };

        match (&ri_bc.payload, &ab.payload) {
            // Slice of a slice is again a slice.
            (
                Payload::Slice {
                    start: start_bc,
                    step: step_bc,
                },
                Payload::Slice {
                    start: start_ab,
                    step: step_ab,
                },
            ) => {
                let start = start_ab + step_ab * start_bc;
                let step = step_ab * step_bc;
                let (lo, hi) = slice_bounds(start, n, step);
                RowIndex {
                    len: n,
                    lo,
                    hi,
                    payload: Payload::Slice { start, step },
                }
            }

            // A zero-step slice repeats a single gathered value, so the
            // result stays a slice no matter how ab is encoded.
            (Payload::Slice { start, step: 0 }, _) => {
                let v = ab.get(*start);
                RowIndex {
                    len: n,
                    lo: v,
                    hi: v,
                    payload: Payload::Slice { start: v, step: 0 },
                }
            }

            // A stepped slice over an Arr32 stays 32-bit: every index in
            // ab already fits.
            (Payload::Slice { start, step }, Payload::Arr32(ab_buf)) => {
                let buf = gather_slice(ab_buf, *start, *step, n);
                let (lo, hi) = scan_lo_hi(&buf);
                RowIndex {
                    len: n,
                    lo,
                    hi,
                    payload: Payload::Arr32(buf),
                }
            }

            // Over an Arr64 the gather may still fit in 32 bits, so
            // build wide and narrow after.
            (Payload::Slice { start, step }, Payload::Arr64(ab_buf)) => {
                let buf = gather_slice(ab_buf, *start, *step, n);
                let (lo, hi) = scan_lo_hi(&buf);
                let mut out = RowIndex {
                    len: n,
                    lo,
                    hi,
                    payload: Payload::Arr64(buf),
                };
                out.compactify();
                out
            }

            // Array of a slice: the affine map applied to each gathered
            // index. Results can widen, so build wide and narrow after.
            // The bounds come straight from bc's bounds and step's sign.
            (Payload::Arr32(_) | Payload::Arr64(_), Payload::Slice { start, step }) => {
                let buf: Vec<i64> = ri_bc.iter().map(|b| start + step * b).collect();
                let (lo, hi) = if *step >= 0 {
                    (start + step * ri_bc.lo, start + step * ri_bc.hi)
                } else {
                    (start + step * ri_bc.hi, start + step * ri_bc.lo)
                };
                let mut out = RowIndex {
                    len: n,
                    lo,
                    hi,
                    payload: Payload::Arr64(buf),
                };
                out.compactify();
                out
            }

            // Both 32-bit: the gathered values are ab's own, so the
            // result is 32-bit with no narrowing pass.
            (Payload::Arr32(bc_buf), Payload::Arr32(ab_buf)) => {
                let buf: Vec<i32> = bc_buf.iter().map(|&b| ab_buf[b as usize]).collect();
                let (lo, hi) = scan_lo_hi(&buf);
                RowIndex {
                    len: n,
                    lo,
                    hi,
                    payload: Payload::Arr32(buf),
                }
            }

            // Any wider array pairing gathers into 64-bit, then narrows
            // if the values allow.
            (Payload::Arr32(_) | Payload::Arr64(_), Payload::Arr32(_) | Payload::Arr64(_)) => {
                let buf: Vec<i64> = ri_bc.iter().map(|b| ab.get(b)).collect();
                let (lo, hi) = scan_lo_hi(&buf);
                let mut out = RowIndex {
                    len: n,
                    lo,
                    hi,
                    payload: Payload::Arr64(buf),
                };
                out.compactify();
                out
            }
        }
    }
}
