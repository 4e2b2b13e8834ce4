//! Importable libraries, builtin routines and generic specialization

pub mod builtins;
pub mod declaration;
pub mod external;
pub mod registry;
pub mod stdlib;

pub use builtins::{BuiltinMethod, Builtins};
pub use declaration::{
    CustomCodegen, GenericReturn, LibraryDeclaration, MethodImplementation, MethodInterface,
    MethodKind, MethodParameter,
};
pub use external::{library_from_interface, AbiResolver, FsAbiResolver, NoAbiResolver};
pub use registry::LibraryRegistry;
pub use stdlib::LIBRARY_NAMES;
