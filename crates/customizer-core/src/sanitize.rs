//! # Sanitization & Clamping Primitives
//!
//! Pure helpers that bound numeric geometry and cap/strip free text before
//! anything client-supplied is interpreted.
//!
//! ## Sanitization Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Untrusted Input Handling                            │
//! │                                                                         │
//! │  Text:    trim → strip '<' and '>' → collapse whitespace → cap chars   │
//! │           ("<script>" can never survive into canonical output)         │
//! │                                                                         │
//! │  Numbers: NaN / ±Infinity → clamp floor, then clamp into [min, max]    │
//! │           (non-finite input is treated as "smallest legal value",      │
//! │            never propagated)                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Text Sanitization
// =============================================================================

/// Sanitizes a free-text value: trims, strips `<`/`>`, collapses whitespace
/// runs to a single space, and truncates to `max_chars` characters.
///
/// ## Example
/// ```rust
/// use customizer_core::sanitize::sanitize_text;
///
/// assert_eq!(sanitize_text("  Hello   world  ", 80), "Hello world");
/// assert_eq!(sanitize_text("<script>x</script>", 80), "scriptx/script");
/// assert_eq!(sanitize_text("abcdef", 3), "abc");
/// ```
pub fn sanitize_text(input: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(input.len().min(max_chars));
    let mut pending_space = false;

    for ch in input.trim().chars() {
        if ch == '<' || ch == '>' {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(ch);
        if out.chars().count() >= max_chars {
            break;
        }
    }

    // The cap can land right after a collapsed space ("a b" capped at 2
    // would otherwise keep "a "); trimming after truncation keeps capped
    // output stable under re-sanitization.
    let capped = truncate_chars(out, max_chars);
    capped.trim_end().to_string()
}

/// Truncates a string to at most `max_chars` characters (not bytes).
fn truncate_chars(mut s: String, max_chars: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(idx);
    }
    s
}

/// Sanitizes a layer type tag: sanitized, uppercased, capped. Empty input
/// falls back to `TEXT`.
pub fn sanitize_layer_type(input: Option<&str>, max_chars: usize) -> String {
    let cleaned = sanitize_text(input.unwrap_or(""), max_chars).to_uppercase();
    if cleaned.is_empty() {
        "TEXT".to_string()
    } else {
        cleaned
    }
}

// =============================================================================
// Numeric Clamping
// =============================================================================

/// Clamps a value into `[min, max]`, treating non-finite input (`NaN`,
/// `±Infinity`) as the clamp floor.
///
/// When a degenerate range arrives (`max < min`, e.g. a decoration area
/// narrower than the minimum layer size), the floor wins: a layer is always
/// at least the minimum dimension.
///
/// ## Example
/// ```rust
/// use customizer_core::sanitize::clamp_finite;
///
/// assert_eq!(clamp_finite(2000.0, 10.0, 900.0), 900.0);
/// assert_eq!(clamp_finite(-50.0, 0.0, 800.0), 0.0);
/// assert_eq!(clamp_finite(f64::NAN, 10.0, 900.0), 10.0);
/// assert_eq!(clamp_finite(f64::INFINITY, 10.0, 900.0), 10.0);
/// ```
pub fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    let value = if value.is_finite() { value } else { min };
    if value < min {
        min
    } else if value > max {
        max.max(min)
    } else {
        value
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_text_basic() {
        assert_eq!(sanitize_text("hello", 80), "hello");
        assert_eq!(sanitize_text("  hello  ", 80), "hello");
        assert_eq!(sanitize_text("", 80), "");
        assert_eq!(sanitize_text("   ", 80), "");
    }

    #[test]
    fn test_sanitize_text_strips_angle_brackets() {
        assert_eq!(sanitize_text("<script>alert(1)</script>", 80), "scriptalert(1)/script");
        assert_eq!(sanitize_text("a<b>c", 80), "abc");
        assert!(!sanitize_text("<<<>>>", 80).contains('<'));
    }

    #[test]
    fn test_sanitize_text_collapses_whitespace() {
        assert_eq!(sanitize_text("a   b\t\nc", 80), "a b c");
        assert_eq!(sanitize_text("a < > b", 80), "a b");
    }

    #[test]
    fn test_sanitize_text_caps_length() {
        assert_eq!(sanitize_text(&"x".repeat(200), 64).chars().count(), 64);
        // Multi-byte characters count as one character each
        assert_eq!(sanitize_text("ééééé", 3), "ééé");
    }

    #[test]
    fn test_sanitize_text_cap_at_space_is_idempotent() {
        // Truncation landing on a collapsed space must not leave it behind
        let once = sanitize_text("a b", 2);
        assert_eq!(once, "a");
        assert_eq!(sanitize_text(&once, 2), once);

        let once = sanitize_text("ab cd ef", 6);
        assert_eq!(once, "ab cd");
        assert_eq!(sanitize_text(&once, 6), once);
    }

    #[test]
    fn test_sanitize_layer_type() {
        assert_eq!(sanitize_layer_type(Some("text"), 24), "TEXT");
        assert_eq!(sanitize_layer_type(Some(" Artwork "), 24), "ARTWORK");
        assert_eq!(sanitize_layer_type(None, 24), "TEXT");
        assert_eq!(sanitize_layer_type(Some(""), 24), "TEXT");
        assert_eq!(sanitize_layer_type(Some("<upload>"), 24), "UPLOAD");
    }

    #[test]
    fn test_clamp_finite_ranges() {
        assert_eq!(clamp_finite(50.0, 10.0, 900.0), 50.0);
        assert_eq!(clamp_finite(5.0, 10.0, 900.0), 10.0);
        assert_eq!(clamp_finite(2000.0, 10.0, 900.0), 900.0);
    }

    #[test]
    fn test_clamp_finite_non_finite_is_floor() {
        assert_eq!(clamp_finite(f64::NAN, 10.0, 900.0), 10.0);
        assert_eq!(clamp_finite(f64::INFINITY, 10.0, 900.0), 10.0);
        assert_eq!(clamp_finite(f64::NEG_INFINITY, 10.0, 900.0), 10.0);
    }

    #[test]
    fn test_clamp_finite_degenerate_range() {
        // Area narrower than the minimum dimension: floor wins
        assert_eq!(clamp_finite(100.0, 10.0, 8.0), 10.0);
    }
}
