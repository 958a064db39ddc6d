//! Allocation-free numeric scanners over a line's bytes.
//!
//! Both scanners take a cursor and return the value together with the
//! advanced cursor, so callers thread position explicitly instead of
//! sharing a mutable index. Malformed input never fails: an empty
//! digit run yields `0` and the cursor stays where the digits were
//! expected (only leading spaces are consumed). Permissive OBJ
//! producers rely on that silent-zero behavior.

/// Skip ASCII space characters (only `' '`, not tabs).
fn skip_spaces(line: &[u8], mut cursor: usize) -> usize {
    while cursor < line.len() && line[cursor] == b' ' {
        cursor += 1;
    }
    cursor
}

/// Scan a signed decimal float: optional `-`, integer digits, optional
/// `.` fraction. No exponents and no leading `+` — the OBJ grammar this
/// parser targets never emits them.
pub fn scan_float(line: &[u8], cursor: usize) -> (f32, usize) {
    let mut cursor = skip_spaces(line, cursor);

    let mut negative = false;
    if cursor < line.len() && line[cursor] == b'-' {
        negative = true;
        cursor += 1;
    }

    // Integer part accumulates in a float so arbitrarily long digit
    // runs lose precision instead of overflowing.
    let mut value = 0.0f32;
    while cursor < line.len() && line[cursor].is_ascii_digit() {
        value = value * 10.0 + f32::from(line[cursor] - b'0');
        cursor += 1;
    }

    if cursor < line.len() && line[cursor] == b'.' {
        cursor += 1;
        let mut multiplier = 0.1f32;
        while cursor < line.len() && line[cursor].is_ascii_digit() {
            value += f32::from(line[cursor] - b'0') * multiplier;
            multiplier *= 0.1;
            cursor += 1;
        }
    }

    (if negative { -value } else { value }, cursor)
}

/// Scan an unsigned decimal integer. No sign handling: face-index
/// callers decide what a leading `-` means (currently it stalls the
/// scan and the index resolves to absent). Saturates on overflow so a
/// pathological digit run cannot panic.
pub fn scan_uint(line: &[u8], cursor: usize) -> (u64, usize) {
    let mut cursor = skip_spaces(line, cursor);

    let mut value = 0u64;
    while cursor < line.len() && line[cursor].is_ascii_digit() {
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(line[cursor] - b'0'));
        cursor += 1;
    }

    (value, cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_plain_integer_part() {
        let (v, c) = scan_float(b"42 next", 0);
        assert_eq!(v, 42.0);
        assert_eq!(c, 2);
    }

    #[test]
    fn scans_fraction_and_sign() {
        let (v, c) = scan_float(b"-1.25", 0);
        assert!((v - -1.25).abs() < 1e-6);
        assert_eq!(c, 5);
    }

    #[test]
    fn skips_leading_spaces_only() {
        let (v, c) = scan_float(b"   3.5", 0);
        assert!((v - 3.5).abs() < 1e-6);
        assert_eq!(c, 6);
    }

    #[test]
    fn malformed_token_yields_zero_and_stalls() {
        let (v, c) = scan_float(b"abc", 0);
        assert_eq!(v, 0.0);
        assert_eq!(c, 0);
        // Re-scanning from the same spot stays put.
        let (v2, c2) = scan_float(b"abc", c);
        assert_eq!(v2, 0.0);
        assert_eq!(c2, 0);
    }

    #[test]
    fn bare_minus_yields_negative_zero_run() {
        let (v, c) = scan_float(b"-x", 0);
        assert_eq!(v, 0.0);
        assert_eq!(c, 1);
    }

    #[test]
    fn trailing_dot_is_accepted() {
        let (v, c) = scan_float(b"7.", 0);
        assert_eq!(v, 7.0);
        assert_eq!(c, 2);
    }

    #[test]
    fn successive_scans_advance_through_triple() {
        let line = b"1.0 -2.5 0.125";
        let (x, c) = scan_float(line, 0);
        let (y, c) = scan_float(line, c);
        let (z, c) = scan_float(line, c);
        assert_eq!((x, y, z), (1.0, -2.5, 0.125));
        assert_eq!(c, line.len());
    }

    #[test]
    fn uint_ignores_sign() {
        let (v, c) = scan_uint(b"-3", 0);
        assert_eq!(v, 0);
        assert_eq!(c, 0);
    }

    #[test]
    fn uint_scans_magnitude() {
        let (v, c) = scan_uint(b" 123/45", 0);
        assert_eq!(v, 123);
        assert_eq!(c, 4);
    }

    #[test]
    fn uint_saturates_instead_of_overflowing() {
        let (v, _) = scan_uint(b"99999999999999999999999999", 0);
        assert_eq!(v, u64::MAX);
    }
}
