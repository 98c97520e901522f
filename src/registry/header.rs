//! Header-scraper front end for `vulkan.h`-style spec text.
//!
//! Each construct class gets its own anchored rule (handle macros, flag and
//! base-type typedefs, enum/struct/union bodies, function-pointer typedefs,
//! command declarations, `#define` constants), so a miss is local to one
//! construct instead of derailing the whole document. The structured-XML
//! front end is preferred when the registry is available.

use anyhow::Result;
use regex::Regex;

use super::types::{
    ApiRegistry, BaseTypeEntity, CallableEntity, EnumEntity, EnumKind, FlagEntity,
    FunctionPointerEntity, HandleEntity, RecordEntity, RecordField, RecordKind,
};
use super::{build_enum_members, is_member_reference, RawEnumValue};
use crate::translate::{self, names, ArrayLen, TypeToken};

/// Parser for C header spec text.
pub struct HeaderParser;

impl Default for HeaderParser {
    fn default() -> Self {
        HeaderParser
    }
}

impl HeaderParser {
    /// Create a new header parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse header content into an [`ApiRegistry`].
    pub fn parse(&self, content: &str) -> Result<ApiRegistry> {
        let preprocessed = self.preprocess(content);

        let mut registry = ApiRegistry::default();
        registry.handles = self.parse_handles(&preprocessed);
        registry.basetypes = self.parse_basetypes(&preprocessed);
        registry.flags = self.parse_flags(&preprocessed);
        registry.enums = self.parse_enums(&preprocessed);
        registry.funcpointers = self.parse_funcpointers(&preprocessed);
        registry.records = self.parse_records(&preprocessed);
        registry.commands = self.parse_commands(&preprocessed);

        // #defines are line-oriented; scan the original text.
        if let Some(constants) = self.parse_constants(content) {
            registry.enums.insert(0, constants);
        }

        tracing::debug!(
            handles = registry.handles.len(),
            enums = registry.enums.len(),
            records = registry.records.len(),
            commands = registry.commands.len(),
            "extracted registry from header"
        );

        Ok(registry)
    }

    /// Strip comments and collapse whitespace.
    fn preprocess(&self, content: &str) -> String {
        let re_block = Regex::new(r"/\*[\s\S]*?\*/").unwrap();
        let content = re_block.replace_all(content, " ");

        let re_line = Regex::new(r"//[^\n]*").unwrap();
        let content = re_line.replace_all(&content, " ");

        let re_ws = Regex::new(r"\s+").unwrap();
        re_ws.replace_all(&content, " ").to_string()
    }

    fn parse_handles(&self, content: &str) -> Vec<HandleEntity> {
        let mut handles = Vec::new();

        // A single rule keeps dispatchable and non-dispatchable handles in
        // declaration order. Requiring the Vk prefix skips the macro
        // definition itself.
        let re = Regex::new(r"VK_DEFINE(_NON_DISPATCHABLE)?_HANDLE\(\s*(Vk\w+)\s*\)").unwrap();

        for cap in re.captures_iter(content) {
            let dispatchable = cap.get(1).is_none();
            let name = cap.get(2).map_or("", |m| m.as_str());
            if !name.is_empty() {
                handles.push(HandleEntity::new(
                    names::strip_api_prefix(name),
                    dispatchable,
                ));
            }
        }

        handles
    }

    fn parse_basetypes(&self, content: &str) -> Vec<BaseTypeEntity> {
        let mut basetypes = Vec::new();

        let re =
            Regex::new(r"typedef\s+(u?int\d+_t|size_t|float|double|char|int)\s+(Vk\w+)\s*;")
                .unwrap();

        for cap in re.captures_iter(content) {
            let base = cap.get(1).map_or("", |m| m.as_str());
            let name = cap.get(2).map_or("", |m| m.as_str());
            basetypes.push(BaseTypeEntity::new(
                names::strip_api_prefix(name),
                translate::translate(&TypeToken::new(base)),
            ));
        }

        basetypes
    }

    fn parse_flags(&self, content: &str) -> Vec<FlagEntity> {
        let mut flags = Vec::new();

        let re = Regex::new(r"typedef\s+VkFlags\s+(\w+)\s*;").unwrap();

        for cap in re.captures_iter(content) {
            let name = cap.get(1).map_or("", |m| m.as_str());
            flags.push(FlagEntity::new(names::strip_api_prefix(name)));
        }

        flags
    }

    fn parse_enums(&self, content: &str) -> Vec<EnumEntity> {
        let mut enums = Vec::new();

        // typedef enum NAME { members } ALIAS;
        let re = Regex::new(r"typedef\s+enum\s+(\w+)?\s*\{([^}]*)\}\s*(\w+)?\s*;").unwrap();

        for cap in re.captures_iter(content) {
            let tag_name = cap.get(1).map_or("", |m| m.as_str());
            let body = cap.get(2).map_or("", |m| m.as_str());
            let alias_name = cap.get(3).map_or("", |m| m.as_str());

            let name = if !alias_name.is_empty() {
                alias_name
            } else if !tag_name.is_empty() {
                tag_name
            } else {
                continue;
            };

            let mut raw_members: Vec<(String, RawEnumValue)> = Vec::new();
            for entry in body.split(',') {
                let entry = entry.trim();
                if entry.is_empty() {
                    continue;
                }
                match entry.split_once('=') {
                    Some((member, value)) => {
                        let value = value.trim();
                        let raw = if is_member_reference(value) {
                            RawEnumValue::Reference(value.to_string())
                        } else {
                            RawEnumValue::Literal(value.to_string())
                        };
                        raw_members.push((member.trim().to_string(), raw));
                    }
                    None => raw_members.push((entry.to_string(), RawEnumValue::Implicit)),
                }
            }

            let kind = if name.contains("FlagBits") {
                EnumKind::Bitmask
            } else {
                EnumKind::Enum
            };

            let mut entity = EnumEntity::new(names::strip_api_prefix(name), kind);
            entity.members = build_enum_members(&raw_members);
            enums.push(entity);
        }

        enums
    }

    fn parse_funcpointers(&self, content: &str) -> Vec<FunctionPointerEntity> {
        let mut funcpointers = Vec::new();

        // typedef RET (VKAPI_PTR *PFN_name)(args);
        let re = Regex::new(
            r"typedef\s+([\w\s*]+?)\s*\(\s*VKAPI_PTR\s*\*\s*(\w+)\s*\)\s*\(([^)]*)\)\s*;",
        )
        .unwrap();

        for cap in re.captures_iter(content) {
            let return_decl = cap.get(1).map_or("", |m| m.as_str());
            let name = cap.get(2).map_or("", |m| m.as_str());
            let args = cap.get(3).map_or("", |m| m.as_str());

            let Some((return_token, _)) = parse_decl(return_decl) else {
                continue;
            };

            let mut entity = FunctionPointerEntity::new(
                names::strip_api_prefix(name),
                translate::translate(&return_token),
            );
            for token in parse_params(args) {
                entity.params.push(translate::translate(&token));
            }
            funcpointers.push(entity);
        }

        funcpointers
    }

    fn parse_records(&self, content: &str) -> Vec<RecordEntity> {
        let mut records = Vec::new();

        // One rule for both layout kinds keeps structs and unions in
        // declaration order, which records that reference earlier records
        // rely on.
        let re =
            Regex::new(r"typedef\s+(struct|union)\s+(\w+)?\s*\{([^}]*)\}\s*(\w+)?\s*;").unwrap();

        for cap in re.captures_iter(content) {
            let kind = match cap.get(1).map_or("", |m| m.as_str()) {
                "union" => RecordKind::Union,
                _ => RecordKind::Struct,
            };
            let tag_name = cap.get(2).map_or("", |m| m.as_str());
            let body = cap.get(3).map_or("", |m| m.as_str());
            let alias_name = cap.get(4).map_or("", |m| m.as_str());

            let name = if !alias_name.is_empty() {
                alias_name
            } else if !tag_name.is_empty() {
                tag_name
            } else {
                continue;
            };

            let mut record = RecordEntity::new(names::strip_api_prefix(name), kind);
            for field in body.split(';') {
                let field = field.trim();
                if field.is_empty() {
                    continue;
                }
                if let Some((token, Some(field_name))) = parse_decl(field) {
                    record.fields.push(RecordField::new(
                        names::field_name(&field_name),
                        translate::translate(&token),
                    ));
                }
            }
            records.push(record);
        }

        records
    }

    fn parse_commands(&self, content: &str) -> Vec<CallableEntity> {
        let mut commands = Vec::new();

        // VKAPI_ATTR RET VKAPI_CALL vkName(args);
        let re =
            Regex::new(r"VKAPI_ATTR\s+([\w\s*]+?)\s+VKAPI_CALL\s+(\w+)\s*\(([^)]*)\)\s*;").unwrap();

        for cap in re.captures_iter(content) {
            let return_decl = cap.get(1).map_or("", |m| m.as_str());
            let name = cap.get(2).map_or("", |m| m.as_str());
            let args = cap.get(3).map_or("", |m| m.as_str());

            let Some((return_token, _)) = parse_decl(return_decl) else {
                continue;
            };

            // The raw symbol is what the loader resolves; never normalize it.
            let mut callable =
                CallableEntity::new(name, translate::translate(&return_token));
            for token in parse_params(args) {
                callable.params.push(translate::translate(&token));
            }
            commands.push(callable);
        }

        commands
    }

    fn parse_constants(&self, content: &str) -> Option<EnumEntity> {
        let re = Regex::new(r"#define\s+(VK_\w+)\s+([^\n]+)").unwrap();

        let mut raw_members: Vec<(String, RawEnumValue)> = Vec::new();
        for cap in re.captures_iter(content) {
            let name = cap.get(1).map_or("", |m| m.as_str());
            let mut value = cap.get(2).map_or("", |m| m.as_str());
            // The preprocessed text has no line structure, so this rule runs
            // on the raw header and trims trailing comments itself.
            if let Some(i) = value.find("//").or_else(|| value.find("/*")) {
                value = &value[..i];
            }
            let value = value.trim();

            // Skip expression macros (VK_MAKE_VERSION(1, 0, 0) and friends);
            // the runtime glue covers the version helpers.
            let mut inner = value;
            while inner.starts_with('(') && inner.ends_with(')') && inner.len() >= 2 {
                inner = inner[1..inner.len() - 1].trim();
            }
            if inner.contains('(') {
                continue;
            }

            let raw = if is_member_reference(value) {
                RawEnumValue::Reference(value.to_string())
            } else {
                RawEnumValue::Literal(value.to_string())
            };
            raw_members.push((name.to_string(), raw));
        }

        if raw_members.is_empty() {
            return None;
        }

        let mut entity = EnumEntity::new("API Constants", EnumKind::Constants);
        entity.members = build_enum_members(&raw_members);
        Some(entity)
    }
}

/// Parse a C declaration into a type token and an optional declarator name.
///
/// Handles pointer markers, `const`/`struct` qualifiers, a trailing `[N]` or
/// `[CONSTANT]` array bound, and a bitfield width (discarded).
fn parse_decl(decl: &str) -> Option<(TypeToken, Option<String>)> {
    let decl = match decl.split_once(':') {
        Some((left, _)) => left.trim(),
        None => decl.trim(),
    };

    let (decl, array_len) = match decl.find('[') {
        Some(open) => {
            let close = decl[open..].find(']')? + open;
            let bound = decl[open + 1..close].trim();
            let len = if bound.is_empty() {
                None
            } else if bound.chars().all(|c| c.is_ascii_digit()) {
                bound.parse().ok().map(ArrayLen::Literal)
            } else {
                Some(ArrayLen::Symbol(names::strip_api_prefix(bound).to_string()))
            };
            (
                format!("{} {}", &decl[..open], &decl[close + 1..]),
                len,
            )
        }
        None => (decl.to_string(), None),
    };

    let pointer_depth = decl.matches('*').count() as u8;
    let cleaned = decl.replace('*', " ");
    let mut words: Vec<&str> = cleaned
        .split_whitespace()
        .filter(|word| *word != "const" && *word != "struct")
        .collect();

    if words.is_empty() {
        return None;
    }
    let base = words.remove(0).to_string();
    let name = words.pop().map(|s| s.to_string());

    Some((
        TypeToken {
            base,
            pointer_depth,
            array_len,
        },
        name,
    ))
}

/// Parse a comma-separated parameter list into type tokens, dropping
/// parameter names.
fn parse_params(args: &str) -> Vec<TypeToken> {
    let args = args.trim();
    if args.is_empty() || args == "void" {
        return Vec::new();
    }

    args.split(',')
        .filter_map(|param| parse_decl(param).map(|(token, _)| token))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::ForeignType;

    const FIXTURE: &str = r#"
#define VK_UUID_SIZE 16 // bytes in a driver UUID
#define VK_ATTACHMENT_UNUSED (~0U)
#define VK_API_VERSION_1_0 VK_MAKE_VERSION(1, 0, 0)

VK_DEFINE_HANDLE(VkInstance)
VK_DEFINE_HANDLE(VkDevice)
VK_DEFINE_NON_DISPATCHABLE_HANDLE(VkSemaphore)

typedef uint32_t VkBool32;
typedef uint64_t VkDeviceSize;
typedef VkFlags VkQueueFlags;

typedef enum VkResult {
    VK_SUCCESS = 0,
    VK_NOT_READY = 1,
    VK_ERROR_OUT_OF_HOST_MEMORY = -1,
    VK_RESULT_MAX_ENUM = 0x7FFFFFFF
} VkResult;

typedef void (VKAPI_PTR *PFN_vkVoidFunction)(void);
typedef void* (VKAPI_PTR *PFN_vkAllocationFunction)(
    void* pUserData, size_t size, size_t alignment);

typedef struct VkExtent2D {
    uint32_t width;
    uint32_t height;
} VkExtent2D;

typedef struct VkInstanceCreateInfo {
    const void* pNext;
    const char* const* ppEnabledLayerNames;
    char layerName[VK_UUID_SIZE];
} VkInstanceCreateInfo;

typedef union VkClearColorValue {
    float float32[4];
    int32_t int32[4];
} VkClearColorValue;

VKAPI_ATTR VkResult VKAPI_CALL vkCreateInstance(
    const VkInstanceCreateInfo* pCreateInfo, VkInstance* pInstance);
VKAPI_ATTR void VKAPI_CALL vkDestroyDevice(VkDevice device);
"#;

    #[test]
    fn test_parse_handles() {
        let registry = HeaderParser::new().parse(FIXTURE).unwrap();

        assert_eq!(registry.handles.len(), 3);
        assert_eq!(registry.handles[0].name, "Instance");
        assert!(registry.handles[0].dispatchable);
        assert_eq!(registry.handles[2].name, "Semaphore");
        assert!(!registry.handles[2].dispatchable);
    }

    #[test]
    fn test_parse_basetypes_and_flags() {
        let registry = HeaderParser::new().parse(FIXTURE).unwrap();

        assert_eq!(registry.basetypes[0].name, "Bool32");
        assert_eq!(registry.basetypes[0].ty, ForeignType::Scalar("c_uint32"));
        assert_eq!(registry.basetypes[1].ty, ForeignType::Scalar("c_uint64"));
        assert_eq!(registry.flags[0].name, "QueueFlags");
    }

    #[test]
    fn test_parse_enum_members() {
        let registry = HeaderParser::new().parse(FIXTURE).unwrap();

        let result = registry
            .enums
            .iter()
            .find(|e| e.name == "Result")
            .expect("Result enum");
        let names: Vec<&str> = result.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            ["SUCCESS", "NOT_READY", "ERROR_OUT_OF_HOST_MEMORY", "RESULT_MAX_ENUM"]
        );
        assert_eq!(result.members[3].value, "0x7FFFFFFF");
    }

    #[test]
    fn test_parse_constants_skip_expression_macros() {
        let registry = HeaderParser::new().parse(FIXTURE).unwrap();

        let constants = &registry.enums[0];
        assert_eq!(constants.kind, EnumKind::Constants);
        let names: Vec<&str> = constants.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["UUID_SIZE", "ATTACHMENT_UNUSED"]);
        assert_eq!(constants.members[0].value, "16");
        assert_eq!(constants.members[1].value, "c_uint32(~0)");
    }

    #[test]
    fn test_parse_struct_fields() {
        let registry = HeaderParser::new().parse(FIXTURE).unwrap();

        let info = registry
            .records
            .iter()
            .find(|r| r.name == "InstanceCreateInfo")
            .expect("InstanceCreateInfo");
        assert_eq!(info.fields[0].name, "next");
        assert_eq!(info.fields[0].ty.render(), "c_void_p");
        assert_eq!(info.fields[1].name, "enabled_layer_names");
        assert_eq!(info.fields[1].ty.render(), "POINTER(c_char_p)");
        assert_eq!(info.fields[2].ty.render(), "c_char * UUID_SIZE");
    }

    #[test]
    fn test_parse_union() {
        let registry = HeaderParser::new().parse(FIXTURE).unwrap();

        let clear = registry
            .records
            .iter()
            .find(|r| r.name == "ClearColorValue")
            .expect("ClearColorValue");
        assert_eq!(clear.kind, RecordKind::Union);
        assert_eq!(clear.fields[1].ty.render(), "c_int32 * 4");
    }

    #[test]
    fn test_parse_funcpointers() {
        let registry = HeaderParser::new().parse(FIXTURE).unwrap();

        let void_fn = &registry.funcpointers[0];
        assert_eq!(void_fn.name, "VoidFunction");
        assert_eq!(void_fn.return_type, ForeignType::Void);
        assert!(void_fn.params.is_empty());

        let alloc = &registry.funcpointers[1];
        assert_eq!(alloc.name, "AllocationFunction");
        assert_eq!(alloc.return_type, ForeignType::Scalar("c_void_p"));
        assert_eq!(alloc.params.len(), 3);
        assert_eq!(alloc.params[0].render(), "c_void_p");
        assert_eq!(alloc.params[1].render(), "c_size_t");
    }

    #[test]
    fn test_parse_commands() {
        let registry = HeaderParser::new().parse(FIXTURE).unwrap();

        let create = &registry.commands[0];
        assert_eq!(create.name, "vkCreateInstance");
        assert_eq!(create.return_type.render(), "Result");
        assert_eq!(create.params[0].render(), "POINTER(InstanceCreateInfo)");

        let destroy = &registry.commands[1];
        assert_eq!(destroy.name, "vkDestroyDevice");
        assert_eq!(destroy.return_type, ForeignType::Void);
        assert_eq!(destroy.params[0].render(), "Device");
    }
}
