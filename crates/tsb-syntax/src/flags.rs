//! Modifier flags attached to declaration nodes.

use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Syntactic modifiers as written in source. The collector derives
    /// declaration flags from these by direct inspection, never inference.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
    pub struct ModifierFlags: u16 {
        /// `export`
        const EXPORT = 1 << 0;
        /// `declare`
        const AMBIENT = 1 << 1;
        /// `static`
        const STATIC = 1 << 2;
        /// `private`
        const PRIVATE = 1 << 3;
        /// `public`
        const PUBLIC = 1 << 4;
        /// `?` after a property or parameter name
        const OPTIONAL = 1 << 5;
        /// `...` before a parameter name
        const REST = 1 << 6;
    }
}
