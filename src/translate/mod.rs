//! Type translation from spec tokens to ctypes expressions.
//!
//! A [`TypeToken`] is the textual type descriptor lifted out of the spec; a
//! [`ForeignType`] is the target-side expression it resolves to. Translation
//! is a pure lookup-and-wrap: scalar table first, pointer and array wrapping
//! after, with unknown base names passing through optimistically as forward
//! references to other spec entities.

pub mod names;
pub mod scalar;

use std::fmt;

use serde::Serialize;

/// A fixed-array length: either a literal element count or a symbolic
/// reference to an API constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ArrayLen {
    /// Literal element count.
    Literal(u64),

    /// Normalized name of the constant holding the count.
    Symbol(String),
}

impl fmt::Display for ArrayLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayLen::Literal(n) => write!(f, "{}", n),
            ArrayLen::Symbol(name) => write!(f, "{}", name),
        }
    }
}

/// A textual type descriptor from the spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeToken {
    /// Base type name as spelled in the spec (`uint32_t`, `VkInstance`).
    pub base: String,

    /// Number of pointer markers trailing the base type.
    pub pointer_depth: u8,

    /// Fixed-array bound, if the declaration carries one.
    pub array_len: Option<ArrayLen>,
}

impl TypeToken {
    /// Create a plain token with no pointer or array markers.
    pub fn new(base: impl Into<String>) -> Self {
        TypeToken {
            base: base.into(),
            pointer_depth: 0,
            array_len: None,
        }
    }

    /// Set the pointer depth.
    pub fn with_pointer_depth(mut self, depth: u8) -> Self {
        self.pointer_depth = depth;
        self
    }

    /// Set the array bound.
    pub fn with_array_len(mut self, len: ArrayLen) -> Self {
        self.array_len = Some(len);
        self
    }
}

/// A target-side foreign-type expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ForeignType {
    /// The void type; renders as `None` in a ctypes signature.
    Void,

    /// A ctypes scalar identifier from the fixed map.
    Scalar(&'static str),

    /// A reference to another spec entity by normalized name.
    Named(String),

    /// Pointer to another foreign type.
    Pointer(Box<ForeignType>),

    /// Fixed-size array of another foreign type.
    Array(Box<ForeignType>, ArrayLen),
}

impl ForeignType {
    /// Render the expression as it appears in the generated module.
    pub fn render(&self) -> String {
        match self {
            ForeignType::Void => "None".to_string(),
            ForeignType::Scalar(name) => (*name).to_string(),
            ForeignType::Named(name) => name.clone(),
            ForeignType::Pointer(inner) => format!("POINTER({})", inner.render()),
            ForeignType::Array(inner, len) => format!("{} * {}", inner.render(), len),
        }
    }

    /// The entity name this expression refers to directly, if any.
    ///
    /// Used by the callable grouper to probe a first parameter's owning
    /// object type; pointers and arrays deliberately return `None` since a
    /// pointer-to-handle parameter is an output slot, not a receiver.
    pub fn named(&self) -> Option<&str> {
        match self {
            ForeignType::Named(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for ForeignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Translate one spec type token to a foreign-type expression.
pub fn translate(token: &TypeToken) -> ForeignType {
    let mut depth = token.pointer_depth;

    let mut ty = if depth > 0 {
        match scalar::lookup(&format!("{}*", token.base)) {
            Some(target) => {
                depth -= 1;
                ForeignType::Scalar(target)
            }
            None => base_type(&token.base),
        }
    } else {
        base_type(&token.base)
    };

    for _ in 0..depth {
        ty = ForeignType::Pointer(Box::new(ty));
    }

    if let Some(len) = &token.array_len {
        ty = ForeignType::Array(Box::new(ty), len.clone());
    }

    ty
}

fn base_type(base: &str) -> ForeignType {
    if base == "void" {
        return ForeignType::Void;
    }
    match scalar::lookup(base) {
        Some(target) => ForeignType::Scalar(target),
        None => ForeignType::Named(names::strip_api_prefix(base).to_string()),
    }
}
