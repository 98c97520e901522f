//! Callable grouping into dispatch tables.
//!
//! Every extracted callable lands in exactly one group, keyed by the
//! foreign type of its first parameter. Two entry points are force-assigned
//! by name: the ones that must be callable before any per-object table
//! exists.

use serde::Serialize;

use crate::registry::types::{CallableEntity, HandleEntity};

/// Entry points that load before any dispatch table is populated, so the
/// first-parameter heuristic never applies to them.
const LOADER_OVERRIDES: [&str; 2] = ["vkGetInstanceProcAddr", "vkGetDeviceProcAddr"];

/// Handles whose commands are loaded through the device-scoped loader.
const DEVICE_SCOPED: [&str; 3] = ["Device", "Queue", "CommandBuffer"];

/// Handles whose commands are loaded through the instance-scoped loader.
const INSTANCE_SCOPED: [&str; 2] = ["Instance", "PhysicalDevice"];

/// Loading scope of a dispatch group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DispatchScope {
    /// Global entry points, resolved from the process image.
    Loader,

    /// Instance-level entry points.
    Instance,

    /// Device-level entry points.
    Device,
}

impl DispatchScope {
    /// The table constant emitted for this scope.
    pub fn table_name(&self) -> &'static str {
        match self {
            DispatchScope::Loader => "LOADER_FUNCTIONS",
            DispatchScope::Instance => "INSTANCE_FUNCTIONS",
            DispatchScope::Device => "DEVICE_FUNCTIONS",
        }
    }

    /// All scopes, in the fixed emission fallback order.
    pub fn all() -> [DispatchScope; 3] {
        [
            DispatchScope::Loader,
            DispatchScope::Instance,
            DispatchScope::Device,
        ]
    }
}

impl std::fmt::Display for DispatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatchScope::Loader => write!(f, "Loader"),
            DispatchScope::Instance => write!(f, "Instance"),
            DispatchScope::Device => write!(f, "Device"),
        }
    }
}

/// A named bucket of callables sharing a loading scope.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchGroup {
    /// The group's scope.
    pub scope: DispatchScope,

    /// Member callables, in first-seen spec order.
    pub commands: Vec<CallableEntity>,
}

/// Partition callables into dispatch groups.
///
/// Groups appear in insertion order of the first callable assigned to each
/// scope; callables keep their spec order within a group.
pub fn group_commands(commands: &[CallableEntity], handles: &[HandleEntity]) -> Vec<DispatchGroup> {
    let mut groups: Vec<DispatchGroup> = Vec::new();

    for command in commands {
        let scope = classify(command, handles);
        match groups.iter_mut().find(|group| group.scope == scope) {
            Some(group) => group.commands.push(command.clone()),
            None => groups.push(DispatchGroup {
                scope,
                commands: vec![command.clone()],
            }),
        }
    }

    groups
}

fn classify(command: &CallableEntity, handles: &[HandleEntity]) -> DispatchScope {
    if LOADER_OVERRIDES.contains(&command.name.as_str()) {
        return DispatchScope::Loader;
    }

    let first = match command.params.first().and_then(|ty| ty.named()) {
        Some(name) => name,
        None => return DispatchScope::Loader,
    };

    if !handles.iter().any(|handle| handle.name == first) {
        return DispatchScope::Loader;
    }

    if DEVICE_SCOPED.contains(&first) {
        DispatchScope::Device
    } else if INSTANCE_SCOPED.contains(&first) {
        DispatchScope::Instance
    } else {
        DispatchScope::Loader
    }
}
