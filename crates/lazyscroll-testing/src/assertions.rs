use lazyscroll_geometry::MainAxisSpan;

/// Asserts that two floats are within `tolerance` of each other.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_span_approx_eq(actual: MainAxisSpan, expected: MainAxisSpan, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.start, expected.start, tolerance, &format!("{} - start", msg));
    assert_approx_eq(actual.extent, expected.extent, tolerance, &format!("{} - extent", msg));
}

/// Asserts the recorded events equal `expected`, in order.
pub fn assert_events(actual: &[String], expected: &[&str]) {
    let actual: Vec<&str> = actual.iter().map(String::as_str).collect();
    assert_eq!(actual, expected, "callback events differ");
}
