/// Renders `value` in fixed-point notation with exactly `precision`
/// fractional digits and `.` as the decimal separator.
///
/// `value` must be finite. A result that rounds to zero never carries a sign,
/// so `-0.0` and tiny negative residues both render as `0.000...`.
pub fn to_xml_decimal(value: f64, precision: usize) -> String {
    debug_assert!(value.is_finite(), "cannot render non-finite value {}", value);

    let rendered = format!("{:.*}", precision, value);
    match rendered.strip_prefix('-') {
        Some(unsigned) if unsigned.bytes().all(|b| b == b'0' || b == b'.') => unsigned.to_string(),
        _ => rendered,
    }
}
