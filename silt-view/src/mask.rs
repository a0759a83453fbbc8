use memchr::{memchr_iter, memrchr};
use silt_base::{unsupported, Result};

use crate::index::{IdxWord, Payload, RowIndex};

// Storage-type tag of a column's backing bytes, as the storage layer
// exposes it. Row selection consumes only Bool1 (one byte per row, each
// 0 or 1); the other tags are here so columns can be labelled honestly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColTy {
    Bool1,
    Int64,
    Flo64,
    Bin,
}

// The slice of the storage contract this layer consumes: a tag plus
// contiguous backing bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub ty: ColTy,
    pub data: Vec<u8>,
}

// Selected row positions of a mask, ascending.
fn collect_mask_rows<T: IdxWord>(mask: &[u8], nout: usize) -> Vec<T> {
    let mut buf = Vec::with_capacity(nout);
    for i in memchr_iter(1, mask) {
        buf.push(T::from_row(i as i64));
    }
    debug_assert_eq!(buf.len(), nout);
    buf
}

// Destination positions of ri whose mapped source byte is 1, ascending.
fn collect_selected_positions<T: IdxWord>(data: &[u8], ri: &RowIndex, nout: usize) -> Vec<T> {
    let mut buf = Vec::with_capacity(nout);
    for (i, j) in ri.iter().enumerate() {
        if data[j as usize] == 1 {
            buf.push(T::from_row(i as i64));
        }
    }
    debug_assert_eq!(buf.len(), nout);
    buf
}

fn empty_selection() -> RowIndex {
    RowIndex {
        len: 0,
        lo: 0,
        hi: 0,
        payload: Payload::Arr32(Vec::new()),
    }
}

impl RowIndex {
    // Select the rows of a 1-byte boolean column that hold 1, over the
    // first nrows bytes. Emits an array rowindex in the narrowest width
    // that fits, an Arr32 with an empty buffer when nothing is selected.
    pub fn from_mask_column(col: &Column, nrows: i64) -> Result<RowIndex> {
        if col.ty != ColTy::Bool1 {
            return Err(unsupported("column is not a 1-byte boolean"));
        }
        let mask = &col.data[..nrows.max(0) as usize];
        let nout = memchr_iter(1, mask).count() as i64;
        if nout == 0 {
            return Ok(empty_selection());
        }
        let hirow = memrchr(1, mask).map_or(0, |i| i as i64);
        let ri = if nout <= i32::MAX as i64 && hirow <= i32::MAX as i64 {
            let buf = collect_mask_rows::<i32>(mask, nout as usize);
            let lo = buf[0] as i64;
            RowIndex {
                len: nout,
                lo,
                hi: hirow,
                payload: Payload::Arr32(buf),
            }
        } else {
            let buf = collect_mask_rows::<i64>(mask, nout as usize);
            let lo = buf[0];
            RowIndex {
                len: nout,
                lo,
                hi: hirow,
                payload: Payload::Arr64(buf),
            }
        };
        Ok(ri)
    }

    // Same selection, driven through an existing rowindex: for each
    // (i, j) pair of ri, test data[j] and record the destination
    // position i. Masking a view composes with the view's own rowindex
    // and lands back in the view's positions. Width choice follows the
    // selected count and the highest recorded position.
    pub fn from_mask_column_with_index(col: &Column, ri: &RowIndex) -> Result<RowIndex> {
        if col.ty != ColTy::Bool1 {
            return Err(unsupported("column is not a 1-byte boolean"));
        }
        let data = col.data.as_slice();
        let mut nout: i64 = 0;
        let mut lopos: i64 = 0;
        let mut hipos: i64 = 0;
        for (i, j) in ri.iter().enumerate() {
            if data[j as usize] == 1 {
                if nout == 0 {
                    lopos = i as i64;
                }
                nout += 1;
                hipos = i as i64;
            }
        }
        if nout == 0 {
            return Ok(empty_selection());
        }
        let out = if nout <= i32::MAX as i64 && hipos <= i32::MAX as i64 {
            RowIndex {
                len: nout,
                lo: lopos,
                hi: hipos,
                payload: Payload::Arr32(collect_selected_positions(data, ri, nout as usize)),
            }
        } else {
            RowIndex {
                len: nout,
                lo: lopos,
                hi: hipos,
                payload: Payload::Arr64(collect_selected_positions(data, ri, nout as usize)),
            }
        };
        Ok(out)
    }
}
