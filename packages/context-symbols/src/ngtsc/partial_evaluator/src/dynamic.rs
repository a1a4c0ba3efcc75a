// Dynamic Value
//
// Represents a value that could not be statically evaluated.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicValue {
    pub reason: DynamicReason,
    /// Source form of the offending expression.
    pub detail: String,
}

/// Reason why a value is dynamic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DynamicReason {
    /// Identifier with no declaration in scope.
    UnknownIdentifier,
    /// Imported from a module outside the program.
    ExternalReference,
    /// `let` / `var` binding.
    MutableBinding,
    /// Call to a function that is not a single-return macro.
    UnsupportedCall,
    /// Computed key or element access.
    ComputedProperty,
    /// Spread of something that is not an array (or object, in object literals).
    InvalidSpread,
    /// Operator applied to operands it cannot fold.
    InvalidOperand,
    /// Syntax with no static meaning (function literals, classes, ...).
    UnsupportedSyntax,
    /// A constant whose initializer refers back to itself.
    CircularReference,
    /// Macro expansion nested deeper than allowed.
    MacroDepthExceeded,
    /// Property read on a value that has no properties.
    NotAnObject,
}

impl DynamicValue {
    pub fn new(reason: DynamicReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }

    pub fn message(&self) -> String {
        match self.reason {
            DynamicReason::UnknownIdentifier => format!("unknown identifier '{}'", self.detail),
            DynamicReason::ExternalReference => {
                format!("'{}' is declared outside of the program", self.detail)
            }
            DynamicReason::MutableBinding => {
                format!("'{}' is not a const and cannot be evaluated", self.detail)
            }
            DynamicReason::UnsupportedCall => {
                format!("call to '{}' cannot be evaluated statically", self.detail)
            }
            DynamicReason::ComputedProperty => {
                format!("computed property access '{}' is not supported", self.detail)
            }
            DynamicReason::InvalidSpread => format!("cannot spread '{}'", self.detail),
            DynamicReason::InvalidOperand => format!("cannot fold '{}'", self.detail),
            DynamicReason::UnsupportedSyntax => {
                format!("expression '{}' is not statically analyzable", self.detail)
            }
            DynamicReason::CircularReference => {
                format!("'{}' refers to itself in its own initializer", self.detail)
            }
            DynamicReason::MacroDepthExceeded => {
                format!("expansion of '{}' nests too deeply", self.detail)
            }
            DynamicReason::NotAnObject => format!("'{}' is not an object", self.detail),
        }
    }
}

impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}
