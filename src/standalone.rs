/// Add two numbers.
///
/// The sum is widened to `i128`, so it is exact for every pair of inputs.
pub fn standalone_function(a: i64, b: i64) -> i128 {
    i128::from(a) + i128::from(b)
}
