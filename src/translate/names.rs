//! Name normalization for Vulkan spec identifiers.
//!
//! All entity and member names pass through here on their way into the
//! generated module. Raw command symbols never do: the loader looks those up
//! byte-for-byte.

/// API name prefixes stripped from type and entity names, longest first.
/// The lowercase `vk` form covers command names when a prototype or table
/// entry needs the stripped spelling.
const NAME_PREFIXES: [&str; 4] = ["PFN_vk", "VK_", "Vk", "vk"];

/// Field-name prefixes that encode pointer notation, longest first.
const FIELD_PREFIXES: [&str; 4] = ["pfn_", "pp_", "p_", "s_"];

/// Strip the first matching API prefix from a name.
///
/// Names without a recognized prefix pass through unchanged.
pub fn strip_api_prefix(name: &str) -> &str {
    for prefix in NAME_PREFIXES {
        if let Some(stripped) = name.strip_prefix(prefix) {
            return stripped;
        }
    }
    name
}

/// Convert a mixed-case spec name to snake_case.
///
/// A segment boundary falls before an uppercase letter that follows a
/// lowercase letter or digit, and before the last uppercase letter of a
/// capital run that is followed by a lowercase letter, so acronym runs stay
/// together: `deviceLUID` becomes `device_luid` and `LUIDValid` becomes
/// `luid_valid`. Already-segmented input is a fixed point.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_ascii_uppercase() {
            out.push(c);
            continue;
        }

        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();

        let after_word = matches!(prev, Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit());
        let run_end = matches!(prev, Some(p) if p.is_ascii_uppercase())
            && matches!(next, Some(n) if n.is_ascii_lowercase());

        if (after_word || run_end) && !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
        out.push(c.to_ascii_lowercase());
    }

    out
}

/// Normalize a record field name: snake_case, then drop the pointer-notation
/// prefix (`pfn`, `pp`, `p`, `s`) if one is present.
pub fn field_name(raw: &str) -> String {
    let snake = to_snake_case(raw);
    for prefix in FIELD_PREFIXES {
        if let Some(rest) = snake.strip_prefix(prefix) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    snake
}

/// Compute the common member prefix of an enum from its member names.
///
/// The prefix is the longest common prefix of all names cut back to an
/// underscore boundary. It backs off one segment at a time while any member
/// would be left starting with a digit (`VK_IMAGE_TYPE_1D` keeps `TYPE_1D`
/// rather than the invalid `1D`). Enums with fewer than two members have no
/// derivable prefix.
pub fn common_member_prefix<'a, I>(names: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = names.into_iter().collect();
    if names.len() < 2 {
        return None;
    }

    let mut prefix = names[0].to_string();
    for name in &names[1..] {
        let common = prefix
            .bytes()
            .zip(name.bytes())
            .take_while(|(a, b)| a == b)
            .count();
        prefix.truncate(common);
    }

    let cut = prefix.rfind('_')?;
    prefix.truncate(cut + 1);

    loop {
        if prefix.is_empty() {
            return None;
        }
        let digit_lead = names.iter().any(|name| {
            name[prefix.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_digit())
        });
        if !digit_lead {
            break;
        }
        match prefix[..prefix.len() - 1].rfind('_') {
            Some(i) => prefix.truncate(i + 1),
            None => return None,
        }
    }

    Some(prefix)
}

/// Normalize an enum member name by stripping the enum's common prefix,
/// falling back to the global API prefix when the member does not share it.
pub fn member_name(raw: &str, common_prefix: Option<&str>) -> String {
    if let Some(prefix) = common_prefix {
        if let Some(rest) = raw.strip_prefix(prefix) {
            if !rest.is_empty() && !rest.starts_with(|c: char| c.is_ascii_digit()) {
                return rest.to_string();
            }
        }
    }
    strip_api_prefix(raw).to_string()
}
