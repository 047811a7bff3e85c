//! Container-level attribute definitions.

/// Struct-level attributes.
///
/// Parsed from `#[props(...)]` on structs.
#[derive(Debug)]
pub struct StructAttrs {
    /// Setters and deleters are not exposed once the value is constructed.
    pub frozen: bool,
    /// Generate a `Debug` impl reading fields through their getters.
    pub repr: bool,
    /// Generate a `PartialEq` impl comparing fields through their getters.
    pub eq: bool,
}

impl Default for StructAttrs {
    fn default() -> Self {
        Self {
            frozen: false,
            repr: true,
            eq: true,
        }
    }
}
