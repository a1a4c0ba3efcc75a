// Core - symbols recognized from @angular/core
//
// Decorators and helpers are recognized by the name under which
// `@angular/core` exports them, never by the local alias.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Module specifier the recognized decorators are imported from.
pub const CORE_MODULE: &str = "@angular/core";

/// Injection token whose `useValue` lists entry components and route configs.
pub const ANALYZE_FOR_ENTRY_COMPONENTS: &str = "ANALYZE_FOR_ENTRY_COMPONENTS";

/// Helper deferring a type reference behind an arrow function.
pub const FORWARD_REF: &str = "forwardRef";

/// Kind of annotated declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    NgModule,
    Component,
    Directive,
    Pipe,
    Injectable,
}

impl DeclarationKind {
    pub fn is_directive(self) -> bool {
        matches!(self, DeclarationKind::Component | DeclarationKind::Directive)
    }

    pub fn decorator_name(self) -> &'static str {
        match self {
            DeclarationKind::NgModule => "NgModule",
            DeclarationKind::Component => "Component",
            DeclarationKind::Directive => "Directive",
            DeclarationKind::Pipe => "Pipe",
            DeclarationKind::Injectable => "Injectable",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.decorator_name())
    }
}

/// Decorators exported by `@angular/core` that carry analyzable metadata.
static CORE_DECORATORS: Lazy<HashMap<&'static str, DeclarationKind>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("NgModule", DeclarationKind::NgModule);
    m.insert("Component", DeclarationKind::Component);
    m.insert("Directive", DeclarationKind::Directive);
    m.insert("Pipe", DeclarationKind::Pipe);
    m.insert("Injectable", DeclarationKind::Injectable);
    m
});

/// Kind of declaration a decorator exported as `exported_name` introduces.
pub fn decorator_kind(exported_name: &str) -> Option<DeclarationKind> {
    CORE_DECORATORS.get(exported_name).copied()
}

/// `@angular/core` itself or one of its secondary entry points.
pub fn is_core_specifier(specifier: &str, core_module: &str) -> bool {
    specifier == core_module
        || specifier
            .strip_prefix(core_module)
            .map_or(false, |rest| rest.starts_with('/'))
}
