//! Spec front ends and the extracted entity model.
//!
//! Two front ends — a structured-XML reader and a header scraper — produce
//! the same [`types::ApiRegistry`], which the grouping and emission stages
//! consume without knowing where it came from.

pub mod header;
pub mod types;
pub mod validate;
pub mod xml;

pub use header::HeaderParser;
pub use types::ApiRegistry;

use crate::registry::types::EnumMember;
use crate::translate::{names, scalar};

/// An enum member value as it appears in the spec, before normalization.
#[derive(Debug, Clone)]
pub(crate) enum RawEnumValue {
    /// Explicit literal text (`0`, `0x7FFFFFFF`, `(~0U)`).
    Literal(String),

    /// Bit position, converted to a shift expression.
    BitPos(u32),

    /// Reference to another member by raw name.
    Reference(String),

    /// No value given; follows the C implicit-counter rule.
    Implicit,
}

/// Whether a value string names another member rather than spelling a
/// literal.
pub(crate) fn is_member_reference(value: &str) -> bool {
    value
        .trim()
        .starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
}

/// Parse an integer literal, tolerating hex, sign, and C suffix letters.
pub(crate) fn parse_int_literal(text: &str) -> Option<i64> {
    let text = text.trim().trim_matches(|c| c == '(' || c == ')');
    let text = text.trim_end_matches(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let value = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()?
    } else {
        text.parse().ok()?
    };
    Some(if negative { -value } else { value })
}

/// Normalize raw `(name, value)` pairs into emission-ready members.
///
/// The shared member prefix is derived from the member names themselves and
/// stripped alongside the global API prefix; values are rendered per kind
/// (suffix-preserving literals, `1 << n` bit positions, normalized member
/// references, or the running implicit counter).
pub(crate) fn build_enum_members(raw: &[(String, RawEnumValue)]) -> Vec<EnumMember> {
    let prefix = names::common_member_prefix(raw.iter().map(|(name, _)| name.as_str()));
    let prefix = prefix.as_deref();

    let mut next_implicit: i64 = 0;
    let mut members = Vec::with_capacity(raw.len());

    for (name, value) in raw {
        let rendered = match value {
            RawEnumValue::Literal(text) => {
                if let Some(parsed) = parse_int_literal(text) {
                    next_implicit = parsed + 1;
                }
                scalar::normalize_literal(text)
            }
            RawEnumValue::BitPos(n) => format!("1 << {}", n),
            RawEnumValue::Reference(target) => names::member_name(target, prefix),
            RawEnumValue::Implicit => {
                let value = next_implicit.to_string();
                next_implicit += 1;
                value
            }
        };
        members.push(EnumMember::new(names::member_name(name, prefix), rendered));
    }

    members
}
