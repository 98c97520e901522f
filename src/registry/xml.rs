//! Structured-XML front end for the Vulkan registry (`vk.xml`).
//!
//! The event stream from `xml-rs` is folded into a small owned node tree,
//! then one extraction pass per entity category walks the tree and hands
//! every type token to the translator. This is the preferred source format;
//! the header scraper exists for specs only available as C headers.

use anyhow::{bail, Context, Result};
use xml::reader::XmlEvent;
use xml::{EventReader, ParserConfig};

use super::types::{
    ApiRegistry, BaseTypeEntity, CallableEntity, EnumEntity, EnumKind, FlagEntity,
    FunctionPointerEntity, HandleEntity, RecordEntity, RecordField, RecordKind,
};
use super::{build_enum_members, is_member_reference, RawEnumValue};
use crate::translate::{self, names, ArrayLen, TypeToken};

/// Parse a registry XML document into an [`ApiRegistry`].
pub fn parse(input: &str) -> Result<ApiRegistry> {
    let root = build_tree(input)?;
    if root.name != "registry" {
        bail!("expected <registry> root element, found <{}>", root.name);
    }

    let mut registry = ApiRegistry::default();

    if let Some(types) = root.find("types") {
        extract_types(types, &mut registry);
    }

    for block in root.elements().filter(|n| n.name == "enums") {
        if let Some(entity) = extract_enum_block(block) {
            registry.enums.push(entity);
        }
    }

    if let Some(commands) = root.find("commands") {
        for command in commands.elements().filter(|n| n.name == "command") {
            if let Some(callable) = extract_command(command) {
                registry.commands.push(callable);
            }
        }
    }

    tracing::debug!(
        handles = registry.handles.len(),
        enums = registry.enums.len(),
        records = registry.records.len(),
        commands = registry.commands.len(),
        "extracted registry from XML"
    );

    Ok(registry)
}

// ---------------------------------------------------------------------------
// Node tree
// ---------------------------------------------------------------------------

/// One element of the parsed document.
#[derive(Debug)]
struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlContent>,
}

/// Interleaved element and text content.
#[derive(Debug)]
enum XmlContent {
    Element(XmlNode),
    Text(String),
}

impl XmlNode {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn elements(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter().filter_map(|child| match child {
            XmlContent::Element(node) => Some(node),
            XmlContent::Text(_) => None,
        })
    }

    fn find(&self, name: &str) -> Option<&XmlNode> {
        self.elements().find(|node| node.name == name)
    }

    /// Concatenated direct text content.
    fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            if let XmlContent::Text(text) = child {
                out.push_str(text);
            }
        }
        out
    }
}

fn build_tree(input: &str) -> Result<XmlNode> {
    let config = ParserConfig::new()
        .trim_whitespace(true)
        .ignore_comments(true)
        .cdata_to_characters(true);
    let reader = EventReader::new_with_config(input.as_bytes(), config);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    for event in reader {
        match event.context("malformed XML in spec document")? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                stack.push(XmlNode {
                    name: name.local_name,
                    attributes: attributes
                        .into_iter()
                        .map(|attr| (attr.name.local_name, attr.value))
                        .collect(),
                    children: Vec::new(),
                });
            }
            XmlEvent::EndElement { .. } => {
                if let Some(node) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlContent::Element(node)),
                        None => root = Some(node),
                    }
                }
            }
            XmlEvent::Characters(text) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(XmlContent::Text(text));
                }
            }
            _ => {}
        }
    }

    root.context("spec document has no root element")
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// Walk the `<types>` block once, in document order, dispatching on the
/// category tag. Order within each category is the spec's order, which the
/// emitter relies on for records that reference earlier records.
fn extract_types(types: &XmlNode, registry: &mut ApiRegistry) {
    for node in types.elements().filter(|n| n.name == "type") {
        match node.attr("category") {
            Some("handle") => {
                if let Some(handle) = extract_handle(node) {
                    registry.handles.push(handle);
                }
            }
            Some("basetype") => {
                if let Some(basetype) = extract_basetype(node) {
                    registry.basetypes.push(basetype);
                }
            }
            Some("bitmask") => {
                if node.attr("alias").is_none() {
                    if let Some(name) = node.find("name") {
                        registry
                            .flags
                            .push(FlagEntity::new(names::strip_api_prefix(&name.text())));
                    }
                }
            }
            Some("funcpointer") => {
                if let Some(funcpointer) = extract_funcpointer(node) {
                    registry.funcpointers.push(funcpointer);
                }
            }
            Some("struct") => {
                if let Some(record) = extract_record(node, RecordKind::Struct) {
                    registry.records.push(record);
                }
            }
            Some("union") => {
                if let Some(record) = extract_record(node, RecordKind::Union) {
                    registry.records.push(record);
                }
            }
            _ => {}
        }
    }
}

fn extract_handle(node: &XmlNode) -> Option<HandleEntity> {
    if node.attr("alias").is_some() {
        return None;
    }
    let raw_name = node.find("name")?.text();
    let dispatchable = node.find("type")?.text() == "VK_DEFINE_HANDLE";
    Some(HandleEntity::new(
        names::strip_api_prefix(&raw_name),
        dispatchable,
    ))
}

fn extract_basetype(node: &XmlNode) -> Option<BaseTypeEntity> {
    let raw_name = node.find("name")?.text();
    let base = node.find("type")?.text();
    Some(BaseTypeEntity::new(
        names::strip_api_prefix(&raw_name),
        translate::translate(&TypeToken::new(base)),
    ))
}

fn extract_record(node: &XmlNode, kind: RecordKind) -> Option<RecordEntity> {
    if node.attr("alias").is_some() {
        return None;
    }
    let raw_name = node.attr("name")?;
    let mut record = RecordEntity::new(names::strip_api_prefix(raw_name), kind);
    for member in node.elements().filter(|n| n.name == "member") {
        if let Some(field) = extract_member(member) {
            record.fields.push(field);
        }
    }
    Some(record)
}

fn extract_member(member: &XmlNode) -> Option<RecordField> {
    let base = member.find("type")?.text();
    let raw_name = member.find("name")?.text();
    let token = member_token(member, base);
    Some(RecordField::new(
        names::field_name(&raw_name),
        translate::translate(&token),
    ))
}

/// Build the type token for a `<member>` or `<param>` node.
///
/// Pointer markers live in the text between the type and name elements;
/// array bounds are either a literal in the trailing text (`[4]`) or a
/// sibling `<enum>` node holding a constant reference, never both.
fn member_token(node: &XmlNode, base: String) -> TypeToken {
    let mut pointer_depth: u8 = 0;
    let mut array_len: Option<ArrayLen> = None;
    let mut seen_type = false;
    let mut seen_name = false;
    let mut trailing = String::new();

    for child in &node.children {
        match child {
            XmlContent::Element(el) if el.name == "type" => seen_type = true,
            XmlContent::Element(el) if el.name == "name" => seen_name = true,
            XmlContent::Element(el) if el.name == "enum" => {
                array_len = Some(ArrayLen::Symbol(
                    names::strip_api_prefix(&el.text()).to_string(),
                ));
            }
            XmlContent::Element(_) => {}
            XmlContent::Text(text) => {
                if seen_type && !seen_name {
                    pointer_depth += text.matches('*').count() as u8;
                }
                if seen_name {
                    trailing.push_str(text);
                }
            }
        }
    }

    if array_len.is_none() {
        array_len = literal_array_len(&trailing);
    }

    TypeToken {
        base,
        pointer_depth,
        array_len,
    }
}

fn literal_array_len(text: &str) -> Option<ArrayLen> {
    let open = text.find('[')?;
    let close = text[open..].find(']')? + open;
    text[open + 1..close]
        .trim()
        .parse()
        .ok()
        .map(ArrayLen::Literal)
}

fn extract_funcpointer(node: &XmlNode) -> Option<FunctionPointerEntity> {
    let raw_name = node.find("name")?.text();

    let mut leading = String::new();
    for child in &node.children {
        match child {
            XmlContent::Text(text) => leading.push_str(text),
            XmlContent::Element(_) => break,
        }
    }
    let return_token = funcpointer_return_token(&leading)?;

    let mut params: Vec<TypeToken> = Vec::new();
    let mut past_name = false;
    for child in &node.children {
        match child {
            XmlContent::Element(el) if el.name == "name" => past_name = true,
            XmlContent::Element(el) if past_name && el.name == "type" => {
                params.push(TypeToken::new(el.text()));
            }
            XmlContent::Text(text) if past_name => {
                if let Some(last) = params.last_mut() {
                    last.pointer_depth += text.matches('*').count() as u8;
                }
            }
            _ => {}
        }
    }

    let mut entity = FunctionPointerEntity::new(
        names::strip_api_prefix(&raw_name),
        translate::translate(&return_token),
    );
    for token in &params {
        entity.params.push(translate::translate(token));
    }
    Some(entity)
}

/// Recover the return type from the leading typedef text
/// (`typedef void* (VKAPI_PTR *`).
fn funcpointer_return_token(leading: &str) -> Option<TypeToken> {
    let decl = leading.split('(').next()?.replace("typedef", "");
    let pointer_depth = decl.matches('*').count() as u8;
    let base = decl.replace('*', " ").split_whitespace().last()?.to_string();
    Some(TypeToken {
        base,
        pointer_depth,
        array_len: None,
    })
}

fn extract_enum_block(node: &XmlNode) -> Option<EnumEntity> {
    let raw_name = node.attr("name")?;
    let kind = match node.attr("type") {
        Some("enum") => EnumKind::Enum,
        Some("bitmask") => EnumKind::Bitmask,
        _ => EnumKind::Constants,
    };

    let mut raw_members: Vec<(String, RawEnumValue)> = Vec::new();
    for member in node.elements().filter(|n| n.name == "enum") {
        let Some(name) = member.attr("name") else {
            continue;
        };
        let value = if let Some(value) = member.attr("value") {
            if is_member_reference(value) {
                RawEnumValue::Reference(value.to_string())
            } else {
                RawEnumValue::Literal(value.to_string())
            }
        } else if let Some(bitpos) = member.attr("bitpos") {
            match bitpos.trim().parse() {
                Ok(n) => RawEnumValue::BitPos(n),
                Err(_) => continue,
            }
        } else if let Some(alias) = member.attr("alias") {
            RawEnumValue::Reference(alias.to_string())
        } else {
            continue;
        };
        raw_members.push((name.to_string(), value));
    }

    let name = match kind {
        EnumKind::Constants => raw_name.to_string(),
        _ => names::strip_api_prefix(raw_name).to_string(),
    };

    let mut entity = EnumEntity::new(name, kind);
    entity.members = build_enum_members(&raw_members);
    Some(entity)
}

fn extract_command(node: &XmlNode) -> Option<CallableEntity> {
    if node.attr("alias").is_some() {
        return None;
    }
    let proto = node.find("proto")?;
    let raw_name = proto.find("name")?.text();
    let return_base = proto.find("type")?.text();

    let mut callable = CallableEntity::new(
        raw_name,
        translate::translate(&TypeToken::new(return_base)),
    );
    for param in node.elements().filter(|n| n.name == "param") {
        let Some(base) = param.find("type").map(|t| t.text()) else {
            continue;
        };
        let token = member_token(param, base);
        callable.params.push(translate::translate(&token));
    }
    Some(callable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::ForeignType;

    const FIXTURE: &str = r#"
<registry>
    <types>
        <type category="basetype">typedef <type>uint32_t</type> <name>VkBool32</name>;</type>
        <type category="bitmask">typedef <type>VkFlags</type> <name>VkAccessFlags</name>;</type>
        <type category="handle"><type>VK_DEFINE_HANDLE</type>(<name>VkInstance</name>)</type>
        <type category="handle"><type>VK_DEFINE_NON_DISPATCHABLE_HANDLE</type>(<name>VkFence</name>)</type>
        <type category="funcpointer">typedef void (VKAPI_PTR *<name>PFN_vkVoidFunction</name>)(void);</type>
        <type category="struct" name="VkApplicationInfo">
            <member><type>VkStructureType</type> <name>sType</name></member>
            <member>const <type>void</type>*     <name>pNext</name></member>
            <member>const <type>char</type>*     <name>pApplicationName</name></member>
            <member><type>uint32_t</type>        <name>applicationVersion</name></member>
        </type>
        <type category="struct" name="VkPhysicalDeviceProperties">
            <member><type>char</type> <name>deviceName</name>[<enum>VK_MAX_PHYSICAL_DEVICE_NAME_SIZE</enum>]</member>
            <member><type>uint8_t</type> <name>pipelineCacheUUID</name>[16]</member>
        </type>
        <type category="union" name="VkClearColorValue">
            <member><type>float</type> <name>float32</name>[4]</member>
            <member><type>int32_t</type> <name>int32</name>[4]</member>
        </type>
    </types>
    <enums name="API Constants">
        <enum value="256" name="VK_MAX_PHYSICAL_DEVICE_NAME_SIZE"/>
        <enum value="(~0U)" name="VK_ATTACHMENT_UNUSED"/>
    </enums>
    <enums name="VkResult" type="enum">
        <enum value="0" name="VK_SUCCESS"/>
        <enum value="1" name="VK_NOT_READY"/>
        <enum value="-1" name="VK_ERROR_OUT_OF_HOST_MEMORY"/>
    </enums>
    <enums name="VkAccessFlagBits" type="bitmask">
        <enum bitpos="0" name="VK_ACCESS_INDIRECT_COMMAND_READ_BIT"/>
        <enum bitpos="1" name="VK_ACCESS_INDEX_READ_BIT"/>
    </enums>
    <commands>
        <command>
            <proto><type>VkResult</type> <name>vkCreateInstance</name></proto>
            <param>const <type>VkInstanceCreateInfo</type>* <name>pCreateInfo</name></param>
            <param><type>VkInstance</type>* <name>pInstance</name></param>
        </command>
        <command>
            <proto><type>void</type> <name>vkDestroyInstance</name></proto>
            <param><type>VkInstance</type> <name>instance</name></param>
        </command>
    </commands>
</registry>
"#;

    #[test]
    fn test_parse_handles() {
        let registry = parse(FIXTURE).unwrap();

        assert_eq!(registry.handles.len(), 2);
        assert_eq!(registry.handles[0].name, "Instance");
        assert!(registry.handles[0].dispatchable);
        assert_eq!(registry.handles[1].name, "Fence");
        assert!(!registry.handles[1].dispatchable);
    }

    #[test]
    fn test_parse_basetypes_and_flags() {
        let registry = parse(FIXTURE).unwrap();

        assert_eq!(registry.basetypes[0].name, "Bool32");
        assert_eq!(registry.basetypes[0].ty, ForeignType::Scalar("c_uint32"));
        assert_eq!(registry.flags[0].name, "AccessFlags");
    }

    #[test]
    fn test_parse_enums() {
        let registry = parse(FIXTURE).unwrap();

        let constants = &registry.enums[0];
        assert_eq!(constants.name, "API Constants");
        assert_eq!(constants.kind, EnumKind::Constants);
        assert_eq!(constants.members[0].name, "MAX_PHYSICAL_DEVICE_NAME_SIZE");
        assert_eq!(constants.members[1].value, "c_uint32(~0)");

        let result = &registry.enums[1];
        assert_eq!(result.name, "Result");
        assert_eq!(result.kind, EnumKind::Enum);
        let names: Vec<&str> = result.members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["SUCCESS", "NOT_READY", "ERROR_OUT_OF_HOST_MEMORY"]);

        let access = &registry.enums[2];
        assert_eq!(access.kind, EnumKind::Bitmask);
        assert_eq!(access.members[0].value, "1 << 0");
        assert_eq!(access.members[0].name, "INDIRECT_COMMAND_READ_BIT");
    }

    #[test]
    fn test_parse_struct_members() {
        let registry = parse(FIXTURE).unwrap();

        let info = &registry.records[0];
        assert_eq!(info.name, "ApplicationInfo");
        assert_eq!(info.kind, RecordKind::Struct);
        assert_eq!(info.fields[0].name, "type");
        assert_eq!(info.fields[0].ty.render(), "StructureType");
        assert_eq!(info.fields[1].name, "next");
        assert_eq!(info.fields[1].ty.render(), "c_void_p");
        assert_eq!(info.fields[2].name, "application_name");
        assert_eq!(info.fields[2].ty.render(), "c_char_p");
    }

    #[test]
    fn test_parse_array_bounds() {
        let registry = parse(FIXTURE).unwrap();

        let props = &registry.records[1];
        assert_eq!(
            props.fields[0].ty.render(),
            "c_char * MAX_PHYSICAL_DEVICE_NAME_SIZE"
        );
        assert_eq!(props.fields[1].ty.render(), "c_uint8 * 16");
    }

    #[test]
    fn test_parse_union() {
        let registry = parse(FIXTURE).unwrap();

        let clear = &registry.records[2];
        assert_eq!(clear.kind, RecordKind::Union);
        assert_eq!(clear.fields[0].ty.render(), "c_float * 4");
    }

    #[test]
    fn test_parse_funcpointer() {
        let registry = parse(FIXTURE).unwrap();

        let void_fn = &registry.funcpointers[0];
        assert_eq!(void_fn.name, "VoidFunction");
        assert_eq!(void_fn.return_type, ForeignType::Void);
        assert!(void_fn.params.is_empty());
    }

    #[test]
    fn test_parse_commands_keep_raw_names() {
        let registry = parse(FIXTURE).unwrap();

        let create = &registry.commands[0];
        assert_eq!(create.name, "vkCreateInstance");
        assert_eq!(create.return_type.render(), "Result");
        assert_eq!(create.params[0].render(), "POINTER(InstanceCreateInfo)");
        assert_eq!(create.params[1].render(), "POINTER(Instance)");

        let destroy = &registry.commands[1];
        assert_eq!(destroy.name, "vkDestroyInstance");
        assert_eq!(destroy.params[0].render(), "Instance");
    }

    #[test]
    fn test_parse_rejects_wrong_root() {
        assert!(parse("<notregistry></notregistry>").is_err());
    }
}
