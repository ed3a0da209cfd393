/// Reads a `time` attribute (decimal seconds) as whole milliseconds.
///
/// Missing, unparsable, negative or non-finite values yield `default_value`.
pub fn read_millis<T: AsRef<str>>(time: Option<T>, default_value: u64) -> u64 {
    time.and_then(|value| value.as_ref().trim().parse::<f64>().ok())
        .map(|seconds| seconds * 1000.0)
        .filter(|millis| millis.is_finite() && *millis >= 0.0)
        .map(|millis| millis.round() as u64)
        .unwrap_or(default_value)
}
