//! The closed scalar-type vocabulary.
//!
//! Maps the spec's C base-type names onto ctypes identifiers. The map is
//! fixed at compile time; anything outside it is treated as a reference to
//! another spec entity.

/// Map of C base-type name to ctypes identifier.
///
/// `void*` and `char*` appear as combined keys so a single pointer level
/// collapses into the dedicated ctypes pointer types instead of a generic
/// `POINTER(...)` wrapper.
pub const SCALAR_MAP: &[(&str, &str)] = &[
    ("void*", "c_void_p"),
    ("char", "c_char"),
    ("char*", "c_char_p"),
    ("float", "c_float"),
    ("double", "c_double"),
    ("int", "c_int"),
    ("int8_t", "c_int8"),
    ("int16_t", "c_int16"),
    ("int32_t", "c_int32"),
    ("int64_t", "c_int64"),
    ("uint8_t", "c_uint8"),
    ("uint16_t", "c_uint16"),
    ("uint32_t", "c_uint32"),
    ("uint64_t", "c_uint64"),
    ("size_t", "c_size_t"),
];

/// Map of C numeric-literal suffix to the ctypes constructor that preserves
/// the literal's width and signedness, longest suffix first.
pub const SUFFIX_MAP: &[(&str, &str)] = &[("ULL", "c_uint64"), ("U", "c_uint32"), ("f", "c_float")];

/// Look up a base-type name in the scalar map.
pub fn lookup(name: &str) -> Option<&'static str> {
    SCALAR_MAP
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, target)| *target)
}

/// Normalize a spec value literal for emission.
///
/// Outer parentheses are removed and a recognized numeric suffix is replaced
/// by an explicit ctypes constructor call, so `(~0U)` becomes
/// `c_uint32(~0)`. The `f` suffix is only honored on literals containing a
/// decimal point, keeping lowercase hex digits intact. Unrecognized forms
/// pass through untouched.
pub fn normalize_literal(value: &str) -> String {
    let mut literal = value.trim();
    while literal.starts_with('(') && literal.ends_with(')') && literal.len() >= 2 {
        literal = literal[1..literal.len() - 1].trim();
    }

    for (suffix, ctor) in SUFFIX_MAP {
        if let Some(body) = literal.strip_suffix(suffix) {
            if *suffix == "f" && !body.contains('.') {
                continue;
            }
            return format!("{}({})", ctor, body);
        }
    }

    literal.to_string()
}
