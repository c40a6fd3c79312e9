// Index arithmetic for implicit d-ary heaps.
//
// A d-ary heap keeps its tree in a flat array. With arity `A`, node `i` has
// its children packed right after each other,
//
// ```text
// A = 4                          0
//          1             2             3             4
//     5 6 7 8      9 10 11 12   13 14 15 16   17 18 19 20
// ```
//
//   - Up:          `(i-1) / A`
//   - First child: `A*i + 1`
//   - Last child:  `A*(i+1)`
//
// The last level is usually incomplete, so children indices must be clamped
// to the length of the array.

/// The parent node
///
/// ```
/// use statesearch::heap_primitives::index_parent;
/// assert_eq!(index_parent::<2>(1), 0);
/// assert_eq!(index_parent::<2>(2), 0);
/// assert_eq!(index_parent::<2>(6), 2);
/// assert_eq!(index_parent::<4>(4), 0);
/// assert_eq!(index_parent::<4>(5), 1);
/// assert_eq!(index_parent::<4>(20), 4);
/// ```
#[inline(always)]
#[must_use]
pub fn index_parent<const A: usize>(i: usize) -> usize {
    debug_assert!(i != 0, "The root has no parent");
    (i - 1) / A
}

/// The first (left-most) child
///
/// ```
/// use statesearch::heap_primitives::index_first_child;
/// assert_eq!(index_first_child::<2>(0), 1);
/// assert_eq!(index_first_child::<2>(3), 7);
/// assert_eq!(index_first_child::<4>(0), 1);
/// assert_eq!(index_first_child::<4>(1), 5);
/// assert_eq!(index_first_child::<4>(3), 13);
/// ```
#[inline(always)]
#[must_use]
pub fn index_first_child<const A: usize>(i: usize) -> usize {
    (A * i) + 1
}

/// The last (right-most) child
///
/// ```
/// use statesearch::heap_primitives::index_last_child;
/// assert_eq!(index_last_child::<2>(0), 2);
/// assert_eq!(index_last_child::<2>(6), 14);
/// assert_eq!(index_last_child::<4>(0), 4);
/// assert_eq!(index_last_child::<4>(4), 20);
/// ```
#[inline(always)]
#[must_use]
pub fn index_last_child<const A: usize>(i: usize) -> usize {
    A * (i + 1)
}
