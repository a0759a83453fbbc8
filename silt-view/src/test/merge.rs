use super::arr32;
use crate::{RowIndex, RowIndexKind};
use test_log::test;

#[test]
fn test_merge_slice_slice() {
    let ab = RowIndex::from_slice(5, 3, 2).unwrap();
    let bc = RowIndex::from_slice(0, 3, 1).unwrap();
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.kind(), RowIndexKind::Slice);
    assert_eq!(ac.slice_parts(), Some((5, 2)));
    assert_eq!(ac.to_vec(), vec![5, 7, 9]);
}

#[test]
fn test_merge_slice_slice_negative() {
    // ab reverses 0..10, bc picks every other row of the reversal.
    let ab = RowIndex::from_slice(9, 10, -1).unwrap();
    let bc = RowIndex::from_slice(0, 5, 2).unwrap();
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.slice_parts(), Some((9, -2)));
    assert_eq!(ac.to_vec(), vec![9, 7, 5, 3, 1]);
    assert_eq!((ac.lo(), ac.hi()), (1, 9));
}

#[test]
fn test_merge_arr_arr() {
    let ab = arr32(&[10, 20, 30, 40]);
    let bc = arr32(&[3, 1, 0]);
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.kind(), RowIndexKind::Arr32);
    assert_eq!(ac.arr32().unwrap(), &[40, 20, 10]);
    assert_eq!((ac.lo(), ac.hi()), (10, 40));
}

#[test]
fn test_merge_identity_left() {
    for bc in [
        RowIndex::from_slice(2, 4, 3).unwrap(),
        arr32(&[4, 0, 2]),
        RowIndex::from_i64_arr(vec![7, 7, 1]),
    ] {
        let ac = RowIndex::merge(None, &bc);
        assert_eq!(ac.kind(), bc.kind());
        assert_eq!(ac.to_vec(), bc.to_vec());
        assert_eq!((ac.lo(), ac.hi()), (bc.lo(), bc.hi()));
    }
}

#[test]
fn test_merge_identity_right() {
    for ab in [
        RowIndex::from_slice(3, 6, 2).unwrap(),
        arr32(&[5, 3, 1, 8, 0, 2]),
    ] {
        let bc = RowIndex::identity(ab.len()).unwrap();
        let ac = RowIndex::merge(Some(&ab), &bc);
        assert_eq!(ac.to_vec(), ab.to_vec());
    }
}

#[test]
fn test_merge_empty_bc() {
    let ab = arr32(&[1, 2, 3]);
    let bc = RowIndex::from_slice(0, 0, 1).unwrap();
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.kind(), RowIndexKind::Slice);
    assert_eq!(ac.len(), 0);
    assert_eq!(ac.slice_parts(), Some((0, 1)));
    assert_eq!((ac.lo(), ac.hi()), (0, 0));
}

#[test]
fn test_merge_zero_step_bc_over_arr() {
    // A zero-step bc repeats one gathered value, so even an array ab
    // collapses to a slice.
    let bc = RowIndex::from_slice(2, 4, 0).unwrap();

    let ab = arr32(&[9, 8, 7, 6]);
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.kind(), RowIndexKind::Slice);
    assert_eq!(ac.slice_parts(), Some((7, 0)));
    assert_eq!(ac.to_vec(), vec![7, 7, 7, 7]);
    assert_eq!((ac.lo(), ac.hi()), (7, 7));

    let ab64 = RowIndex::from_i64_arr(vec![9, 8, i32::MAX as i64 + 5, 6]);
    let ac64 = RowIndex::merge(Some(&ab64), &bc);
    assert_eq!(ac64.kind(), RowIndexKind::Slice);
    assert_eq!(ac64.slice_parts(), Some((i32::MAX as i64 + 5, 0)));
}

#[test]
fn test_merge_slice_bc_over_arr32() {
    let ab = arr32(&[10, 20, 30, 40]);
    let bc = RowIndex::from_slice(3, 3, -1).unwrap();
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.kind(), RowIndexKind::Arr32);
    assert_eq!(ac.arr32().unwrap(), &[40, 30, 20]);
    assert_eq!((ac.lo(), ac.hi()), (20, 40));
}

#[test]
fn test_merge_slice_bc_over_arr64_compactifies() {
    let ab = RowIndex::from_i64_arr(vec![100, 200, 300]);
    let bc = RowIndex::from_slice(0, 3, 1).unwrap();
    let ac = RowIndex::merge(Some(&ab), &bc);
    // Values fit, so the gather narrowed.
    assert_eq!(ac.kind(), RowIndexKind::Arr32);
    assert_eq!(ac.arr32().unwrap(), &[100, 200, 300]);
}

#[test]
fn test_merge_slice_bc_over_arr64_stays_wide() {
    let big = i32::MAX as i64 + 1;
    let ab = RowIndex::from_i64_arr(vec![0, big]);
    let bc = RowIndex::from_slice(0, 2, 1).unwrap();
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.kind(), RowIndexKind::Arr64);
    assert_eq!(ac.to_vec(), vec![0, big]);
}

#[test]
fn test_merge_arr_bc_over_slice() {
    let ab = RowIndex::from_slice(100, 3, 10).unwrap();
    let bc = arr32(&[2, 0, 1]);
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.kind(), RowIndexKind::Arr32);
    assert_eq!(ac.to_vec(), vec![120, 100, 110]);
    assert_eq!((ac.lo(), ac.hi()), (100, 120));
}

#[test]
fn test_merge_arr_bc_over_negative_slice() {
    let ab = RowIndex::from_slice(100, 3, -10).unwrap();
    let bc = arr32(&[0, 2]);
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.to_vec(), vec![100, 80]);
    assert_eq!((ac.lo(), ac.hi()), (80, 100));
}

#[test]
fn test_merge_arr64_bc_over_slice_stays_wide() {
    let ab = RowIndex::from_slice(i32::MAX as i64, 3, 1).unwrap();
    let bc = RowIndex::from_i64_arr(vec![0, 2, 1]);
    let ac = RowIndex::merge(Some(&ab), &bc);
    assert_eq!(ac.kind(), RowIndexKind::Arr64);
    assert_eq!(
        ac.to_vec(),
        vec![i32::MAX as i64, i32::MAX as i64 + 2, i32::MAX as i64 + 1]
    );
}

#[test]
fn test_merge_mixed_arr_widths() {
    let ab32 = arr32(&[10, 20, 30, 40]);
    let ab64 = RowIndex::from_i64_arr(vec![10, 20, 30, 40]);
    let bc32 = arr32(&[3, 1, 0]);
    let bc64 = RowIndex::from_i64_arr(vec![3, 1, 0]);

    // Every widening combination gathers the same rows, and the result
    // narrows back down because the values fit.
    for (ab, bc) in [(&ab32, &bc64), (&ab64, &bc32), (&ab64, &bc64)] {
        let ac = RowIndex::merge(Some(ab), bc);
        assert_eq!(ac.kind(), RowIndexKind::Arr32);
        assert_eq!(ac.to_vec(), vec![40, 20, 10]);
    }

    // Unless they don't.
    let ab_wide = RowIndex::from_i64_arr(vec![0, i32::MAX as i64 + 1]);
    let ac = RowIndex::merge(Some(&ab_wide), &arr32(&[1, 0]));
    assert_eq!(ac.kind(), RowIndexKind::Arr64);
    assert_eq!(ac.to_vec(), vec![i32::MAX as i64 + 1, 0]);
}

#[test]
fn test_merge_composition_law() {
    // merge(A, B) must iterate exactly as i -> A(B(i)).
    let abs = vec![
        RowIndex::from_slice(5, 10, 2).unwrap(),
        RowIndex::from_slice(9, 10, -1).unwrap(),
        RowIndex::from_slicelist(&[(0, 5, 1), (20, 5, 2)]).unwrap(),
        RowIndex::from_i64_arr(vec![4, 2, 0, 6, 8, 1, 3, 5, 7, 9]),
    ];
    let bcs = vec![
        RowIndex::from_slice(0, 10, 1).unwrap(),
        RowIndex::from_slice(9, 5, -2).unwrap(),
        RowIndex::from_slice(4, 6, 0).unwrap(),
        arr32(&[3, 0, 9, 2]),
        RowIndex::from_i64_arr(vec![1, 1, 8]),
        RowIndex::from_slice(0, 0, 1).unwrap(),
    ];
    for ab in &abs {
        let ab_rows = ab.to_vec();
        for bc in &bcs {
            let ac = RowIndex::merge(Some(ab), bc);
            let expect: Vec<i64> = bc.iter().map(|j| ab_rows[j as usize]).collect();
            assert_eq!(ac.to_vec(), expect, "ab={ab:?} bc={bc:?}");
            assert_eq!(ac.len(), bc.len());
        }
    }
}
