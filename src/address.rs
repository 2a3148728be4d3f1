// Address normalization for geocode lookups.
//
// Trip exports prefix most pickup addresses with a business name, either as
// a leading comma-separated segment ("Tasty Diner, 123 Main St, ...") or as
// a name with a parenthetical street ("Tasty Diner (123 Main St), ...").
// The geocoding table was keyed on the street-level text, so matching has to
// strip those prefixes before comparing.

/// Canonical comparison form of an address: leading business-name segment
/// removed, lower-cased, whitespace collapsed. Missing input maps to the
/// empty string. Idempotent.
pub fn normalize(address: Option<&str>) -> String {
    let Some(addr) = address else {
        return String::new();
    };
    let addr = match addr.find(',') {
        Some(idx) if idx > 0 => addr[idx + 1..].trim_start(),
        _ => addr,
    };
    addr.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip a parenthetical or comma-delimited business-name prefix, keeping
/// only the street-level text. Returns the input unchanged (trimmed) when no
/// prefix pattern applies.
pub fn extract_street_portion(address: Option<&str>) -> String {
    let Some(addr) = address else {
        return String::new();
    };
    if let Some((_, rest)) = addr.split_once("), ") {
        return rest.trim().to_string();
    }
    if addr.contains(", ") {
        let parts: Vec<&str> = addr.split(", ").collect();
        if parts.len() > 2 && !leading_chars_have_digit(parts[0]) {
            return parts[1..].join(", ").trim().to_string();
        }
    }
    addr.trim().to_string()
}

/// Derive a display name for the pickup location. Empty or missing input
/// yields `"Unknown"`.
pub fn restaurant_name(address: Option<&str>) -> String {
    let Some(addr) = address else {
        return "Unknown".to_string();
    };
    if addr.trim().is_empty() {
        return "Unknown".to_string();
    }
    if addr.contains('(') && addr.contains(')') {
        let name = addr.split('(').next().unwrap_or("").trim();
        if !name.is_empty() {
            return name.to_string();
        }
    } else if addr.contains(", ") {
        let parts: Vec<&str> = addr.split(", ").collect();
        if parts.len() > 2 && !leading_chars_have_digit(parts[0]) {
            return parts[0].to_string();
        }
    }
    addr.split(',')
        .next()
        .unwrap_or("")
        .chars()
        .take(30)
        .collect()
}

/// A segment whose first three characters contain a digit is treated as a
/// street number, not a business name.
fn leading_chars_have_digit(segment: &str) -> bool {
    segment.chars().take(3).any(|c| c.is_ascii_digit())
}
