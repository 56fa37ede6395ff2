//! Uncached reference implementation

/// Sum of `array[left..=right]`
///
/// `None` for a reversed or out-of-bounds range, or a sum that overflows `i64`.
pub fn range_sum(array: &[i64], left: usize, right: usize) -> Option<i64> {
    if left > right {
        return None;
    }
    array
        .get(left..=right)?
        .iter()
        .try_fold(0i64, |acc, &v| acc.checked_add(v))
}

/// Set `array[index] = value`; out-of-bounds indices are ignored
pub fn update(array: &mut [i64], index: usize, value: i64) {
    if let Some(slot) = array.get_mut(index) {
        *slot = value;
    }
}
