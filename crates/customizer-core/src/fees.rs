//! # Personalization Fee Calculator
//!
//! Computes personalization surcharge lines from the active field schemas
//! and the normalized personalization map.
//!
//! ## Fee Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Per active field schema (in sort order):                               │
//! │                                                                         │
//! │  value = normalized personalization[schema.key]   (may be absent)       │
//! │                                                                         │
//! │  required + empty value      ──► ValidationError (missing field)        │
//! │  len(value) < minLength      ──► ValidationError (too short)            │
//! │  len(value) > maxLength      ──► ValidationError (too long)             │
//! │                                                                         │
//! │  fee = flat_fee + per_character × len(value) + per_item × quantity      │
//! │                                                                         │
//! │  fee > 0  ──► emit PersonalizationFeeLine { name, fee }                 │
//! │  fee ≤ 0  ──► skip (zero-fee fields are free, negative config is a     │
//! │               merchant mistake and must not become a discount)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is integer cents, so two calls with identical inputs
//! return identical amounts — no floating drift.

use std::collections::BTreeMap;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{PersonalizationFeeLine, PersonalizationFieldSchema};

/// Computes the ordered personalization fee lines for a cart line.
///
/// ## Arguments
/// * `schemas` - Active field schemas, already sorted by `sort_order`
/// * `personalization` - The normalized personalization map (sanitized values)
/// * `quantity` - Cart line quantity (callers coerce to at least 1)
///
/// ## Ordering
/// Output preserves schema order, so fee lines render in the same order the
/// merchant arranged the fields.
pub fn compute_fee_lines(
    schemas: &[PersonalizationFieldSchema],
    personalization: &BTreeMap<String, String>,
    quantity: i64,
) -> ValidationResult<Vec<PersonalizationFeeLine>> {
    let mut lines = Vec::new();

    for schema in schemas {
        let value = personalization
            .get(&schema.key)
            .map(String::as_str)
            .unwrap_or("");
        let length = value.chars().count();

        if schema.required && length == 0 {
            return Err(ValidationError::MissingRequiredField(schema.key.clone()));
        }
        if let Some(min) = schema.min_length {
            // An optional empty field is simply unused; a required empty
            // field already failed above.
            if length > 0 && (length as u32) < min {
                return Err(ValidationError::PersonalizationTooShort(schema.key.clone()));
            }
        }
        if let Some(max) = schema.max_length {
            if length as u32 > max {
                return Err(ValidationError::PersonalizationTooLong(schema.key.clone()));
            }
        }

        // Unused optional fields never price.
        if length == 0 {
            continue;
        }

        let fee = Money::from_cents(schema.pricing.flat_fee_cents)
            + Money::from_cents(schema.pricing.per_character_cents) * (length as i64)
            + Money::from_cents(schema.pricing.per_item_cents).multiply_quantity(quantity);

        if fee.is_positive() {
            lines.push(PersonalizationFeeLine {
                name: schema.display_name().to_string(),
                amount_cents: fee.cents(),
            });
        }
    }

    Ok(lines)
}

// =============================================================================
// Unit Tests
// =============================================================================
