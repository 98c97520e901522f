//! Entity descriptors extracted from the Vulkan spec.
//!
//! These types are the hand-off between the two spec front ends and the
//! shared grouping/emission pipeline. All names are normalized except
//! callable entry points, which keep the exact symbol the dynamic loader
//! resolves.

use serde::Serialize;

use crate::translate::ForeignType;

/// Everything extracted from one spec document, in spec order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApiRegistry {
    /// Opaque handle types.
    pub handles: Vec<HandleEntity>,

    /// Scalar typedef aliases.
    pub basetypes: Vec<BaseTypeEntity>,

    /// Bitmask flag aliases.
    pub flags: Vec<FlagEntity>,

    /// Enumerations and constant blocks.
    pub enums: Vec<EnumEntity>,

    /// Function-pointer typedefs.
    pub funcpointers: Vec<FunctionPointerEntity>,

    /// Struct and union records.
    pub records: Vec<RecordEntity>,

    /// Callable entry points.
    pub commands: Vec<CallableEntity>,
}

impl ApiRegistry {
    /// Whether nothing at all was extracted.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
            && self.basetypes.is_empty()
            && self.flags.is_empty()
            && self.enums.is_empty()
            && self.funcpointers.is_empty()
            && self.records.is_empty()
            && self.commands.is_empty()
    }

    /// Whether a normalized name refers to an extracted handle type.
    pub fn is_handle(&self, name: &str) -> bool {
        self.handles.iter().any(|h| h.name == name)
    }
}

/// An opaque handle type.
#[derive(Debug, Clone, Serialize)]
pub struct HandleEntity {
    /// Normalized name.
    pub name: String,

    /// Dispatchable handles are pointer-sized; non-dispatchable handles are
    /// a fixed 64-bit word.
    pub dispatchable: bool,
}

impl HandleEntity {
    /// Create a new handle entity.
    pub fn new(name: impl Into<String>, dispatchable: bool) -> Self {
        HandleEntity {
            name: name.into(),
            dispatchable,
        }
    }
}

/// A scalar typedef alias (`VkBool32` over `uint32_t`).
#[derive(Debug, Clone, Serialize)]
pub struct BaseTypeEntity {
    /// Normalized name.
    pub name: String,

    /// Resolved underlying type.
    pub ty: ForeignType,
}

impl BaseTypeEntity {
    /// Create a new base-type alias.
    pub fn new(name: impl Into<String>, ty: ForeignType) -> Self {
        BaseTypeEntity {
            name: name.into(),
            ty,
        }
    }
}

/// A bitmask flags alias. The underlying representation is always the
/// unsigned 32-bit word.
#[derive(Debug, Clone, Serialize)]
pub struct FlagEntity {
    /// Normalized name.
    pub name: String,
}

impl FlagEntity {
    /// Create a new flags alias.
    pub fn new(name: impl Into<String>) -> Self {
        FlagEntity { name: name.into() }
    }
}

/// Which kind of value block an [`EnumEntity`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumKind {
    /// A tagged enumeration; emitted with a signed 32-bit type alias.
    Enum,

    /// Bit values backing a flags type; emitted like an enumeration.
    Bitmask,

    /// A bare constant block (the registry's "API Constants"); members only,
    /// no type alias.
    Constants,
}

/// An enumeration or constant block.
#[derive(Debug, Clone, Serialize)]
pub struct EnumEntity {
    /// Normalized name (or the block title for constant blocks).
    pub name: String,

    /// Block kind.
    pub kind: EnumKind,

    /// Members in spec order. Duplicates are preserved; the first occurrence
    /// wins downstream.
    pub members: Vec<EnumMember>,
}

impl EnumEntity {
    /// Create a new empty enum.
    pub fn new(name: impl Into<String>, kind: EnumKind) -> Self {
        EnumEntity {
            name: name.into(),
            kind,
            members: Vec::new(),
        }
    }

    /// Add a member.
    pub fn with_member(mut self, member: EnumMember) -> Self {
        self.members.push(member);
        self
    }
}

/// A single enum member, fully normalized for emission.
#[derive(Debug, Clone, Serialize)]
pub struct EnumMember {
    /// Member name with common and API prefixes stripped.
    pub name: String,

    /// Emission-ready value: an integer literal, a `1 << n` bit position, a
    /// ctypes constructor call, or a reference to another member.
    pub value: String,
}

impl EnumMember {
    /// Create a new member.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        EnumMember {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Aggregate layout policy for a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    /// Sequential fields.
    Struct,

    /// Overlapping storage.
    Union,
}

/// A struct or union record.
#[derive(Debug, Clone, Serialize)]
pub struct RecordEntity {
    /// Normalized name.
    pub name: String,

    /// Layout kind.
    pub kind: RecordKind,

    /// Fields in declaration order.
    pub fields: Vec<RecordField>,
}

impl RecordEntity {
    /// Create a new empty record.
    pub fn new(name: impl Into<String>, kind: RecordKind) -> Self {
        RecordEntity {
            name: name.into(),
            kind,
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn with_field(mut self, field: RecordField) -> Self {
        self.fields.push(field);
        self
    }
}

/// A record field.
#[derive(Debug, Clone, Serialize)]
pub struct RecordField {
    /// Normalized field name.
    pub name: String,

    /// Resolved field type.
    pub ty: ForeignType,
}

impl RecordField {
    /// Create a new field.
    pub fn new(name: impl Into<String>, ty: ForeignType) -> Self {
        RecordField {
            name: name.into(),
            ty,
        }
    }
}

/// A function-pointer typedef. Only positional types are retained.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionPointerEntity {
    /// Normalized name.
    pub name: String,

    /// Resolved return type.
    pub return_type: ForeignType,

    /// Resolved parameter types in order.
    pub params: Vec<ForeignType>,
}

impl FunctionPointerEntity {
    /// Create a new function-pointer typedef.
    pub fn new(name: impl Into<String>, return_type: ForeignType) -> Self {
        FunctionPointerEntity {
            name: name.into(),
            return_type,
            params: Vec::new(),
        }
    }

    /// Add a parameter type.
    pub fn with_param(mut self, ty: ForeignType) -> Self {
        self.params.push(ty);
        self
    }
}

/// A callable entry point.
///
/// The name is kept raw and unstripped: it must match the symbol the dynamic
/// loader looks up.
#[derive(Debug, Clone, Serialize)]
pub struct CallableEntity {
    /// Raw entry-point symbol (`vkCreateInstance`).
    pub name: String,

    /// Resolved return type.
    pub return_type: ForeignType,

    /// Resolved parameter types in order.
    pub params: Vec<ForeignType>,
}

impl CallableEntity {
    /// Create a new callable.
    pub fn new(name: impl Into<String>, return_type: ForeignType) -> Self {
        CallableEntity {
            name: name.into(),
            return_type,
            params: Vec::new(),
        }
    }

    /// Add a parameter type.
    pub fn with_param(mut self, ty: ForeignType) -> Self {
        self.params.push(ty);
        self
    }
}
