//! Duration strings of the form used throughout the platform's configuration:
//! an optional sign followed by one or more `<number><unit>` pairs, e.g.
//! `100ms`, `24h`, `1h30m`, `-1.5h`. A bare `0` is also accepted.

const UNITS: [(&str, u128); 8] = [
    ("ns", 1),
    ("us", 1_000),
    ("µs", 1_000),
    ("μs", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60 * 1_000_000_000),
    ("h", 60 * 60 * 1_000_000_000),
];

// Digits beyond this in a fraction cannot change the nanosecond result
const MAX_FRACTION_DIGITS: u32 = 19;

/// Parse a duration string into signed nanoseconds, `None` if malformed or
/// outside the range of an `i64`
pub fn parse_duration(text: &str) -> Option<i64> {
    let (negative, mut rest) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    if rest == "0" {
        return Some(0);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = leading_digits(rest);
        let (int_part, after_int) = rest.split_at(int_len);
        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => after_dot.split_at(leading_digits(after_dot)),
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }

        let (unit_len, unit_ns) = UNITS
            .iter()
            .filter(|(suffix, _)| after_number.starts_with(suffix))
            .map(|(suffix, ns)| (suffix.len(), *ns))
            .max_by_key(|(len, _)| *len)?;
        rest = &after_number[unit_len..];

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse::<u64>().ok()?.into()
        };
        total = total.checked_add(whole.checked_mul(unit_ns)?)?;
        total = total.checked_add(fraction_ns(frac_part, unit_ns))?;
    }

    if negative {
        let limit = i64::MAX as u128 + 1;
        (total <= limit).then(|| (total as i128).wrapping_neg() as i64)
    } else {
        i64::try_from(total).ok()
    }
}

fn leading_digits(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

fn fraction_ns(digits: &str, unit_ns: u128) -> u128 {
    let kept = &digits[..digits.len().min(MAX_FRACTION_DIGITS as usize)];
    if kept.is_empty() {
        return 0;
    }
    let numerator: u128 = kept.parse().unwrap_or(0);
    let scale = 10u128.pow(kept.len() as u32);
    numerator * unit_ns / scale
}
