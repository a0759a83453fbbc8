use silt_base::{bad_range, Result};

// A (start, count, step) triple is a valid slice iff start >= 0,
// count >= 0, and the far endpoint start + step*(count-1) stays within
// [0, i64::MAX]. The endpoint bounds are tested in divided form,
//
//     step >= -start / (count-1)
//     step <= (i64::MAX - start) / (count-1)
//
// with truncated division, so the product is never formed before it is
// known to fit.
pub(crate) fn check_slice(start: i64, count: i64, step: i64) -> Result<()> {
    if start < 0
        || count < 0
        || (count > 1 && step < -(start / (count - 1)))
        || (count > 1 && step > (i64::MAX - start) / (count - 1))
    {
        return Err(bad_range("slice out of range"));
    }
    Ok(())
}

// lo/hi bounds of a validated slice, both 0 when it is empty.
pub(crate) fn slice_bounds(start: i64, count: i64, step: i64) -> (i64, i64) {
    if count == 0 {
        return (0, 0);
    }
    let end = start + step * (count - 1);
    if step >= 0 {
        (start, end)
    } else {
        (end, start)
    }
}
