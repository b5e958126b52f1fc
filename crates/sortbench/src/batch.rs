/// A single array of integers.
///
/// While a sort is in progress an array is owned by exactly one worker; no
/// other task reads or writes it.
pub type Array = Vec<i64>;

/// An ordered sequence of [`Array`]s, the unit of a single request.
///
/// Both the batch and its arrays may be empty.
pub type Batch = Vec<Array>;

/// Returns `true` if every element is `<=` the one after it.
///
/// Empty and single-element arrays are trivially sorted.
pub fn is_sorted(array: &[i64]) -> bool {
    array.windows(2).all(|pair| pair[0] <= pair[1])
}
