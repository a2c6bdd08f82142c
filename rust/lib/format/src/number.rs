//! Thousands separators for counters (likes, replies, followers).

/// Format an optional count with `,` thousands separators.
///
/// `None` renders as an empty string so callers can pass a possibly-missing
/// counter straight through.
pub fn format_number(n: Option<i64>) -> String {
    let Some(n) = n else {
        return String::new();
    };

    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
