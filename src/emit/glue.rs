//! Fixed text blocks of the generated module.
//!
//! Everything here is constant: the ctypes import list, the version-macro
//! glue, and the loader bootstrap that resolves dispatch tables at runtime.

/// Module header and the full ctypes import list.
pub const IMPORTS: &str = "\
# -*- coding: utf-8 -*-
from ctypes import (
    CFUNCTYPE,
    POINTER,
    Structure,
    Union,
    c_char,
    c_char_p,
    c_double,
    c_float,
    c_int,
    c_int8,
    c_int16,
    c_int32,
    c_int64,
    c_size_t,
    c_uint8,
    c_uint16,
    c_uint32,
    c_uint64,
    c_void_p,
)
";

/// Version macros and the null handle constant.
pub const RUNTIME_GLUE: &str = "\
NULL_HANDLE = c_void_p(0)


def MAKE_VERSION(major, minor, patch):
    return (major << 22) | (minor << 12) | patch


API_VERSION_1_0 = MAKE_VERSION(1, 0, 0)
";

/// Loader bootstrap.
///
/// `load_functions` resolves each raw symbol through the supplied loader and
/// keeps only the entry points the runtime actually exposes; absent symbols
/// are skipped, with a notice under `__debug__` only, because not every
/// entry point exists on every backend.
pub const LOADER_GLUE: &str = "\
def load_functions(vk_object, functions_list, loader):
    functions = []
    for name, prototype in functions_list:
        py_name = name.decode()[2:]
        fn_ptr = loader(vk_object, name)
        if fn_ptr is not None:
            functions.append((py_name, prototype(fn_ptr)))
        elif __debug__:
            print('missing entry point {}'.format(name.decode()))
    return functions


def load_loader_functions(loader):
    return load_functions(None, LOADER_FUNCTIONS, loader)


def load_instance_functions(instance, loader):
    return load_functions(instance, INSTANCE_FUNCTIONS, loader)


def load_device_functions(device, loader):
    return load_functions(device, DEVICE_FUNCTIONS, loader)
";
