use funty::Integral;
use silt_base::{bad_range, Result};

use crate::range::{check_slice, slice_bounds};

// Encoding tag. The discriminants are stable; anything that ever writes
// a rowindex out keeps these numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RowIndexKind {
    Slice = 0,
    Arr32 = 1,
    Arr64 = 2,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Payload {
    Slice { start: i64, step: i64 },
    Arr32(Vec<i32>),
    Arr64(Vec<i64>),
}

// An immutable mapping from destination position i in [0, len) to a
// source row. Not mutated after construction, except by compactify,
// which only narrows an Arr64 payload to Arr32.
//
// Invariants: len >= 0; array payloads hold exactly len entries; every
// produced row j satisfies 0 <= lo <= j <= hi; an empty rowindex has
// lo == hi == 0; an Arr32 has len <= i32::MAX and hi <= i32::MAX.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIndex {
    pub(crate) len: i64,
    pub(crate) lo: i64,
    pub(crate) hi: i64,
    pub(crate) payload: Payload,
}

// One loop body serving both index widths. Source rows travel as i64
// across every interface; the payloads store whichever width their
// bounds allow.
pub(crate) trait IdxWord: Integral {
    fn from_row(row: i64) -> Self;
    fn to_row(self) -> i64;
}

impl IdxWord for i32 {
    fn from_row(row: i64) -> Self {
        row as i32
    }
    fn to_row(self) -> i64 {
        self as i64
    }
}

impl IdxWord for i64 {
    fn from_row(row: i64) -> Self {
        row
    }
    fn to_row(self) -> i64 {
        self
    }
}

// lo/hi scan of an index buffer, (0, 0) when empty.
pub(crate) fn scan_lo_hi<T: IdxWord>(vals: &[T]) -> (i64, i64) {
    let mut lo = match vals.first() {
        None => return (0, 0),
        Some(&v) => v,
    };
    let mut hi = lo;
    for &v in &vals[1..] {
        if v < lo {
            lo = v;
        }
        if v > hi {
            hi = v;
        }
    }
    (lo.to_row(), hi.to_row())
}

// Concatenation of each triple's arithmetic progression.
fn fill_slice_runs<T: IdxWord>(triples: &[(i64, i64, i64)], count: i64) -> Vec<T> {
    let mut buf = Vec::with_capacity(count as usize);
    for &(start, len, step) in triples {
        let mut j = start;
        for _ in 0..len {
            buf.push(T::from_row(j));
            // The value past the final element is never read.
            j = j.wrapping_add(step);
        }
    }
    debug_assert_eq!(buf.len() as i64, count);
    buf
}

impl RowIndex {
    // Slice rowindex from a (start, count, step) triple. Unlike the
    // (start, end, step) convention, an explicit count makes step 0
    // legal and positive/negative steps symmetric.
    pub fn from_slice(start: i64, count: i64, step: i64) -> Result<RowIndex> {
        check_slice(start, count, step)?;
        let (lo, hi) = slice_bounds(start, count, step);
        Ok(RowIndex {
            len: count,
            lo,
            hi,
            payload: Payload::Slice { start, step },
        })
    }

    // The identity selection over count rows.
    pub fn identity(count: i64) -> Result<RowIndex> {
        RowIndex::from_slice(0, count, 1)
    }

    // Array rowindex from a list of (start, count, step) triples,
    // emitted in the narrowest width that holds the total length and
    // the highest index. Triples with count 0 are skipped.
    pub fn from_slicelist(triples: &[(i64, i64, i64)]) -> Result<RowIndex> {
        let mut count: i64 = 0;
        let mut loidx = i64::MAX;
        let mut hiidx: i64 = 0;
        for &(start, len, step) in triples {
            if len == 0 {
                continue;
            }
            check_slice(start, len, step)?;
            count = count
                .checked_add(len)
                .ok_or_else(|| bad_range("slicelist length overflow"))?;
            let (lo, hi) = slice_bounds(start, len, step);
            loidx = loidx.min(lo);
            hiidx = hiidx.max(hi);
        }
        if hiidx == 0 {
            loidx = 0;
        }
        assert!(loidx >= 0 && loidx <= hiidx);

        let ri = if count <= i32::MAX as i64 && hiidx <= i32::MAX as i64 {
            RowIndex {
                len: count,
                lo: loidx,
                hi: hiidx,
                payload: Payload::Arr32(fill_slice_runs(triples, count)),
            }
        } else {
            RowIndex {
                len: count,
                lo: loidx,
                hi: hiidx,
                payload: Payload::Arr64(fill_slice_runs(triples, count)),
            }
        };
        Ok(ri)
    }

    // Takes ownership of a prebuilt i32 index buffer. The caller
    // promises the contents are non-negative.
    pub fn from_i32_arr(arr: Vec<i32>) -> Result<RowIndex> {
        if arr.len() > i32::MAX as usize {
            return Err(bad_range("index array longer than 32-bit range"));
        }
        let (lo, hi) = scan_lo_hi(&arr);
        Ok(RowIndex {
            len: arr.len() as i64,
            lo,
            hi,
            payload: Payload::Arr32(arr),
        })
    }

    // Takes ownership of a prebuilt i64 index buffer. The 64-bit width
    // is kept verbatim even when every value would fit in 32 bits: a
    // caller that chose the wide storage keeps it.
    pub fn from_i64_arr(arr: Vec<i64>) -> RowIndex {
        let (lo, hi) = scan_lo_hi(&arr);
        RowIndex {
            len: arr.len() as i64,
            lo,
            hi,
            payload: Payload::Arr64(arr),
        }
    }

    pub fn kind(&self) -> RowIndexKind {
        match self.payload {
            Payload::Slice { .. } => RowIndexKind::Slice,
            Payload::Arr32(_) => RowIndexKind::Arr32,
            Payload::Arr64(_) => RowIndexKind::Arr64,
        }
    }

    pub fn len(&self) -> i64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // Lowest source row this rowindex produces, 0 when empty.
    pub fn lo(&self) -> i64 {
        self.lo
    }

    // Highest source row this rowindex produces, 0 when empty.
    pub fn hi(&self) -> i64 {
        self.hi
    }

    pub fn slice_parts(&self) -> Option<(i64, i64)> {
        match self.payload {
            Payload::Slice { start, step } => Some((start, step)),
            _ => None,
        }
    }

    pub fn arr32(&self) -> Option<&[i32]> {
        match &self.payload {
            Payload::Arr32(buf) => Some(buf),
            _ => None,
        }
    }

    pub fn arr64(&self) -> Option<&[i64]> {
        match &self.payload {
            Payload::Arr64(buf) => Some(buf),
            _ => None,
        }
    }

    // Source row at destination position i. The caller keeps i within
    // [0, len); array payloads range-check only as far as slice
    // indexing does.
    pub(crate) fn get(&self, i: i64) -> i64 {
        match &self.payload {
            Payload::Slice { start, step } => start + step * i,
            Payload::Arr32(buf) => buf[i as usize] as i64,
            Payload::Arr64(buf) => buf[i as usize],
        }
    }

    // Try to narrow an Arr64 payload to Arr32 within its own storage.
    // A no-op returning false unless the payload is Arr64 and both the
    // length and the hi bound fit in 32 bits. lo/hi are unchanged.
    pub fn compactify(&mut self) -> bool {
        if self.hi > i32::MAX as i64 || self.len > i32::MAX as i64 {
            return false;
        }
        let buf = match &mut self.payload {
            Payload::Arr64(buf) => std::mem::take(buf),
            _ => return false,
        };
        self.payload = Payload::Arr32(narrow(buf));
        true
    }

    pub fn iter(&self) -> Iter<'_> {
        let inner = match &self.payload {
            Payload::Slice { start, step } => IterInner::Slice {
                next: *start,
                step: *step,
                left: self.len,
            },
            Payload::Arr32(buf) => IterInner::Arr32(buf.iter()),
            Payload::Arr64(buf) => IterInner::Arr64(buf.iter()),
        };
        Iter { inner }
    }

    // The mapped source rows, collected. Mostly useful in tests and
    // small one-shot consumers.
    pub fn to_vec(&self) -> Vec<i64> {
        self.iter().collect()
    }
}

// Rewrite an i64 index buffer as i32 within the same storage, then
// shrink to the narrow footprint. Slot k of the i32 view overlaps the
// low half of slot k of the i64 view, and k ascends, so the write never
// overtakes the read.
fn narrow(mut buf: Vec<i64>) -> Vec<i32> {
    let len = buf.len();
    let src = buf.as_mut_ptr();
    let dst = src as *mut i32;
    unsafe {
        for k in 0..len {
            let v = *src.add(k) as i32;
            *dst.add(k) = v;
        }
        // The first len i32 slots were written just above; buf keeps
        // the storage alive until they are copied out.
        std::slice::from_raw_parts(dst, len).to_vec()
    }
}

// Yields the mapped source row for each destination position in
// ascending order; (i, j) pairs are one .enumerate() away. This is the
// only traversal the encodings expose, so nothing downstream branches
// on the payload kind.
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Slice { next: i64, step: i64, left: i64 },
    Arr32(std::slice::Iter<'a, i32>),
    Arr64(std::slice::Iter<'a, i64>),
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        match &mut self.inner {
            IterInner::Slice { next, step, left } => {
                if *left == 0 {
                    return None;
                }
                *left -= 1;
                let j = *next;
                // The position past the final element is never mapped.
                *next = next.wrapping_add(*step);
                Some(j)
            }
            IterInner::Arr32(it) => it.next().map(|&x| x as i64),
            IterInner::Arr64(it) => it.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = match &self.inner {
            IterInner::Slice { left, .. } => *left as usize,
            IterInner::Arr32(it) => it.len(),
            IterInner::Arr64(it) => it.len(),
        };
        (left, Some(left))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a RowIndex {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
