//! Centralized display formatting utilities.
//!
//! All tier and remaining-time text goes through this module so that item
//! lore, expiry warnings and the flight status line render identically.

const ROMAN_NUMERALS: &[(u32, &str)] = &[
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Format a positive integer as a standard Roman numeral.
///
/// Returns an empty string for zero (there is no Roman zero).
///
/// # Examples
/// ```
/// use brewmaster_types::formatting::to_roman;
/// assert_eq!(to_roman(1), "I");
/// assert_eq!(to_roman(4), "IV");
/// assert_eq!(to_roman(14), "XIV");
/// assert_eq!(to_roman(39), "XXXIX");
/// assert_eq!(to_roman(0), "");
/// ```
pub fn to_roman(mut n: u32) -> String {
    let mut result = String::new();
    for &(value, numeral) in ROMAN_NUMERALS {
        while n >= value {
            result.push_str(numeral);
            n -= value;
        }
    }
    result
}

/// Format a zero-based amplifier as its 1-based ordinal display.
///
/// # Examples
/// ```
/// use brewmaster_types::formatting::format_amplifier;
/// assert_eq!(format_amplifier(0), "I");
/// assert_eq!(format_amplifier(2), "III");
/// ```
pub fn format_amplifier(amplifier: u32) -> String {
    to_roman(amplifier.saturating_add(1))
}

/// Format a remaining duration in whole seconds.
///
/// - Under a minute: `<n>s`
/// - Under an hour: `<m>m` or `<m>m <s>s` (seconds omitted when zero)
/// - Otherwise: `<h>h` or `<h>h <m>m` (minutes omitted when zero)
///
/// # Examples
/// ```
/// use brewmaster_types::formatting::format_remaining;
/// assert_eq!(format_remaining(45), "45s");
/// assert_eq!(format_remaining(60), "1m");
/// assert_eq!(format_remaining(125), "2m 5s");
/// assert_eq!(format_remaining(3600), "1h");
/// assert_eq!(format_remaining(5430), "1h 30m");
/// ```
pub fn format_remaining(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        let mins = secs / 60;
        let rem = secs % 60;
        if rem == 0 {
            format!("{}m", mins)
        } else {
            format!("{}m {}s", mins, rem)
        }
    } else {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// Format a remaining duration given in milliseconds.
///
/// Negative values clamp to zero; partial seconds are truncated.
///
/// # Examples
/// ```
/// use brewmaster_types::formatting::format_remaining_millis;
/// assert_eq!(format_remaining_millis(90_999), "1m 30s");
/// assert_eq!(format_remaining_millis(-5), "0s");
/// ```
pub fn format_remaining_millis(millis: i64) -> String {
    format_remaining((millis.max(0) / 1000) as u64)
}

/// Turn a snake_case identifier into a title-cased display name.
///
/// # Examples
/// ```
/// use brewmaster_types::formatting::title_case;
/// assert_eq!(title_case("jump_boost"), "Jump Boost");
/// assert_eq!(title_case("speed"), "Speed");
/// ```
pub fn title_case(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
