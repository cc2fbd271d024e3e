// Duration codec - turns chat-style durations like "10m" or "1h30m" into
// milliseconds and back.
//
// Used by the mute and slowmode commands. No Discord types in here.

pub const SECOND_MS: u64 = 1_000;
pub const MINUTE_MS: u64 = 60 * SECOND_MS;
pub const HOUR_MS: u64 = 60 * MINUTE_MS;
pub const DAY_MS: u64 = 24 * HOUR_MS;

/// Largest unit first; `format_duration` walks this in order.
const UNITS: [(char, u64); 4] = [('d', DAY_MS), ('h', HOUR_MS), ('m', MINUTE_MS), ('s', SECOND_MS)];

fn unit_ms(unit: char) -> Option<u64> {
    UNITS
        .iter()
        .find(|(label, _)| *label == unit)
        .map(|(_, size)| *size)
}

/// Parse a duration made of `<digits><unit>` tokens into milliseconds.
///
/// Units are `s`, `m`, `h` and `d`, case-insensitive. Tokens are summed, so
/// `"1h30m"` is 5,400,000. Whitespace may separate whole tokens (`"1m 30s"`,
/// which is what `format_duration` emits) but never splits one. Returns `None`
/// when there is no token at all, when any part of the input is not a
/// `<digits><unit>` token, or on overflow.
///
/// `"0s"` parses to `Some(0)`, which slowmode treats as "disable".
pub fn parse_duration(input: &str) -> Option<u64> {
    let normalized = input.trim().to_lowercase();

    let mut total: u64 = 0;
    let mut digits = String::new();
    let mut saw_token = false;

    for c in normalized.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        if c.is_whitespace() {
            if !digits.is_empty() {
                return None;
            }
            continue;
        }

        let multiplier = unit_ms(c)?;
        if digits.is_empty() {
            return None;
        }

        let amount: u64 = digits.parse().ok()?;
        total = total.checked_add(amount.checked_mul(multiplier)?)?;
        digits.clear();
        saw_token = true;
    }

    // Trailing digits without a unit ("90") are not a token.
    if !digits.is_empty() || !saw_token {
        return None;
    }

    Some(total)
}

/// Format milliseconds as a compact string like `"1d 2h"` or `"1m 30s"`.
///
/// Only non-zero components are emitted. Anything under a second is `"0s"`.
pub fn format_duration(milliseconds: u64) -> String {
    let mut remaining = milliseconds / SECOND_MS;
    let mut parts = Vec::new();

    for (label, size_ms) in UNITS {
        let size = size_ms / SECOND_MS;
        let value = remaining / size;
        if value > 0 {
            parts.push(format!("{}{}", value, label));
            remaining %= size;
        }
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
