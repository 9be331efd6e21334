// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Parses a leading signed integer, ignoring anything after the digits.
///
/// Accepts optional surrounding whitespace, a `+`/`-` sign, and a `0x`
/// prefix for hexadecimal. Returns `None` when no digits are consumed.
pub fn parse_number(text: &str) -> Option<i64> {
    let mut rest = text.trim_start();
    let negative = match rest.as_bytes().first() {
        Some(b'-') => {
            rest = &rest[1..];
            true
        }
        Some(b'+') => {
            rest = &rest[1..];
            false
        }
        _ => false,
    };

    let (radix, digits) = match rest.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("0x") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let mut value: i64 = 0;
    let mut consumed = 0;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            break;
        };
        value = value.wrapping_mul(i64::from(radix)).wrapping_add(i64::from(digit));
        consumed += 1;
    }

    if consumed == 0 {
        // "0x" with nothing after it still consumed the zero.
        return (radix == 16).then_some(0);
    }
    Some(if negative { value.wrapping_neg() } else { value })
}
