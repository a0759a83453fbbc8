// A rowindex is a compact description of a mapping from a dense
// destination position i in [0, n) to a source row j in column storage.
// Views over stored columns are built out of rowindices so the columns
// themselves are never copied. Three encodings:
//
// - Slice: j = start + step * i. Owns no buffer. step may be 0 (the
//   same row repeated) or negative (reversal).
// - Arr32: explicit i32 index buffer, used whenever both the length
//   and the highest index fit in 32 bits.
// - Arr64: explicit i64 index buffer for anything wider. A buffer the
//   caller handed in as i64 keeps that width verbatim; everything
//   produced internally narrows to Arr32 when its bounds permit.
//
// Every rowindex carries its length and the lo/hi bounds of the source
// rows it produces (both 0 when empty). Iteration yields i64 source
// rows in ascending destination order regardless of encoding, the same
// yielded-type convention as the column chunk iterators.
//
// Composition: merge(ab, bc) produces ac with ac(i) = ab(bc(i)), length
// bc.len, re-encoded in the smallest sufficient form. Selection comes
// from 1-byte boolean mask columns or from a chunked parallel filter
// predicate; both emit array rowindices with ascending buffers.


mod filter;
mod index;
mod mask;
mod merge;
mod range;

pub use index::{Iter, RowIndex, RowIndexKind};
pub use mask::{ColTy, Column};
