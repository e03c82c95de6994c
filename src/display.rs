use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// `m:ss.cc` for a positive millisecond count.
pub fn ms_to_clock(ms: f64) -> Option<String> {
    if !ms.is_finite() || ms <= 0.0 {
        return None;
    }
    let total = ms.floor() as u64;
    let m = total / 60_000;
    let s = (total % 60_000) / 1000;
    let c = (total % 1000) / 10;
    Some(format!("{m}:{s:02}.{c:02}"))
}

/// `J. PEREZ` style label; a single word is just upper-cased.
pub fn format_driver_display_name(full: &str) -> String {
    let parts: Vec<&str> = full.split_whitespace().collect();
    match parts.as_slice() {
        [] => "—".to_string(),
        [only] => only.to_uppercase(),
        [first, .., last] => {
            let initial = first
                .chars()
                .next()
                .map(|c| c.to_uppercase().collect::<String>())
                .unwrap_or_default();
            format!("{initial}. {}", last.to_uppercase())
        }
    }
}

/// Lower-case ASCII slug. Accents are stripped through NFD decomposition;
/// anything else that is not alphanumeric becomes a single `-`.
pub fn team_slug(team: &str) -> String {
    let mut out = String::new();
    let mut pending_dash = false;
    let folded = team
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase);
    for ch in folded {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Stable hue (0..360) derived from a team slug.
pub fn team_hue(slug: &str) -> u32 {
    let h = slug
        .encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as u32));
    h % 360
}

/// Integral values print without decimals.
pub fn format_points(points: f64) -> String {
    if points.fract() == 0.0 && points.abs() < 1e15 {
        format!("{}", points as i64)
    } else {
        format!("{points}")
    }
}
