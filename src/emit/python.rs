//! Per-category ctypes rendering.
//!
//! One function per entity category, each producing the category's block of
//! the generated module. Templated string substitution is deliberately
//! avoided; the descriptors carry everything these functions need.

use crate::dispatch::DispatchGroup;
use crate::registry::types::{
    BaseTypeEntity, CallableEntity, EnumEntity, EnumKind, FlagEntity, FunctionPointerEntity,
    HandleEntity, RecordEntity, RecordKind,
};
use crate::translate::names;

/// Indentation unit of the generated module.
pub const INDENT: &str = "    ";

/// `Instance = c_void_p` / `Fence = c_uint64`
pub fn render_handle(handle: &HandleEntity) -> String {
    let repr = if handle.dispatchable {
        "c_void_p"
    } else {
        "c_uint64"
    };
    format!("{} = {}\n", handle.name, repr)
}

/// `Bool32 = c_uint32`
pub fn render_basetype(basetype: &BaseTypeEntity) -> String {
    format!("{} = {}\n", basetype.name, basetype.ty.render())
}

/// `AccessFlags = c_uint32`
pub fn render_flag(flag: &FlagEntity) -> String {
    format!("{} = c_uint32\n", flag.name)
}

/// One enum block: comment header, type alias (except for constant blocks),
/// then the members in spec order.
pub fn render_enum(entity: &EnumEntity) -> String {
    let mut out = format!("# {}\n", entity.name);
    if entity.kind != EnumKind::Constants {
        out.push_str(&format!("{} = c_int32\n", entity.name));
    }
    for member in &entity.members {
        out.push_str(&format!("{} = {}\n", member.name, member.value));
    }
    out
}

/// `AllocationFunction = CFUNCTYPE(None, c_void_p, c_size_t, ...)`
pub fn render_funcpointer(funcpointer: &FunctionPointerEntity) -> String {
    format!(
        "{} = CFUNCTYPE({})\n",
        funcpointer.name,
        signature(&funcpointer.return_type.render(), &funcpointer.params)
    )
}

/// A statically declared Structure or Union subclass.
pub fn render_record(record: &RecordEntity) -> String {
    let base = match record.kind {
        RecordKind::Struct => "Structure",
        RecordKind::Union => "Union",
    };

    let mut out = format!("class {}({}):\n", record.name, base);
    if record.fields.is_empty() {
        out.push_str(&format!("{}_fields_ = []\n", INDENT));
        return out;
    }

    out.push_str(&format!("{}_fields_ = [\n", INDENT));
    for field in &record.fields {
        out.push_str(&format!(
            "{}{}('{}', {}),\n",
            INDENT,
            INDENT,
            field.name,
            field.ty.render()
        ));
    }
    out.push_str(&format!("{}]\n", INDENT));
    out
}

/// One CFUNCTYPE prototype per command, named by the stripped command name.
pub fn render_command_prototype(command: &CallableEntity) -> String {
    format!(
        "{} = CFUNCTYPE({})\n",
        names::strip_api_prefix(&command.name),
        signature(&command.return_type.render(), &command.params)
    )
}

/// A dispatch table: `(b'vkRawName', Prototype)` pairs carrying the exact
/// loader symbol next to the translated signature.
pub fn render_dispatch_group(group: &DispatchGroup) -> String {
    let mut out = format!("{} = (\n", group.scope.table_name());
    for command in &group.commands {
        out.push_str(&format!(
            "{}(b'{}', {}),\n",
            INDENT,
            command.name,
            names::strip_api_prefix(&command.name)
        ));
    }
    out.push_str(")\n");
    out
}

fn signature(return_type: &str, params: &[crate::translate::ForeignType]) -> String {
    let mut parts = vec![return_type.to_string()];
    parts.extend(params.iter().map(|ty| ty.render()));
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchScope;
    use crate::registry::types::{EnumMember, RecordField};
    use crate::translate::{ArrayLen, ForeignType};

    #[test]
    fn test_render_handles() {
        assert_eq!(
            render_handle(&HandleEntity::new("Instance", true)),
            "Instance = c_void_p\n"
        );
        assert_eq!(
            render_handle(&HandleEntity::new("Fence", false)),
            "Fence = c_uint64\n"
        );
    }

    #[test]
    fn test_render_enum_with_alias() {
        let entity = EnumEntity::new("Result", EnumKind::Enum)
            .with_member(EnumMember::new("SUCCESS", "0"))
            .with_member(EnumMember::new("NOT_READY", "1"));

        let out = render_enum(&entity);
        assert_eq!(out, "# Result\nResult = c_int32\nSUCCESS = 0\nNOT_READY = 1\n");
    }

    #[test]
    fn test_render_constants_block_has_no_alias() {
        let entity = EnumEntity::new("API Constants", EnumKind::Constants)
            .with_member(EnumMember::new("UUID_SIZE", "16"));

        let out = render_enum(&entity);
        assert_eq!(out, "# API Constants\nUUID_SIZE = 16\n");
    }

    #[test]
    fn test_render_record() {
        let record = RecordEntity::new("Extent2D", RecordKind::Struct)
            .with_field(RecordField::new("width", ForeignType::Scalar("c_uint32")))
            .with_field(RecordField::new("height", ForeignType::Scalar("c_uint32")));

        let out = render_record(&record);
        assert_eq!(
            out,
            "class Extent2D(Structure):\n    _fields_ = [\n        ('width', c_uint32),\n        ('height', c_uint32),\n    ]\n"
        );
    }

    #[test]
    fn test_render_union_subclasses_union() {
        let record = RecordEntity::new("ClearColorValue", RecordKind::Union).with_field(
            RecordField::new(
                "float32",
                ForeignType::Array(Box::new(ForeignType::Scalar("c_float")), ArrayLen::Literal(4)),
            ),
        );

        let out = render_record(&record);
        assert!(out.starts_with("class ClearColorValue(Union):\n"));
        assert!(out.contains("('float32', c_float * 4),"));
    }

    #[test]
    fn test_render_funcpointer_void_signature() {
        let funcpointer = FunctionPointerEntity::new("VoidFunction", ForeignType::Void);
        assert_eq!(
            render_funcpointer(&funcpointer),
            "VoidFunction = CFUNCTYPE(None)\n"
        );
    }

    #[test]
    fn test_render_command_prototype_strips_name() {
        let command = CallableEntity::new("vkCreateInstance", ForeignType::Named("Result".into()))
            .with_param(ForeignType::Pointer(Box::new(ForeignType::Named(
                "InstanceCreateInfo".into(),
            ))));

        assert_eq!(
            render_command_prototype(&command),
            "CreateInstance = CFUNCTYPE(Result, POINTER(InstanceCreateInfo))\n"
        );
    }

    #[test]
    fn test_render_dispatch_group_keeps_raw_symbols() {
        let group = DispatchGroup {
            scope: DispatchScope::Instance,
            commands: vec![CallableEntity::new(
                "vkEnumeratePhysicalDevices",
                ForeignType::Named("Result".into()),
            )],
        };

        let out = render_dispatch_group(&group);
        assert_eq!(
            out,
            "INSTANCE_FUNCTIONS = (\n    (b'vkEnumeratePhysicalDevices', EnumeratePhysicalDevices),\n)\n"
        );
    }
}
