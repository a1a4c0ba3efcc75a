// Interpreter
//
// Evaluates `ts::Expression`s against the program. Identifiers are followed
// through the reflection host; class and function declarations become
// `Reference`s interned in the registry. Functions whose body is a single
// `return` are expanded with their arguments bound as parameters.

use super::builtin::{evaluate_binary, evaluate_unary};
use super::dynamic::DynamicReason;
use super::result::{ForwardRef, MetadataValue};
use crate::ngtsc::imports::{Reference, ReferenceRegistry, SymbolKey, FORWARD_REF};
use crate::ngtsc::reflection::{Declaration, Import, ReflectionHost, ResolvedIdentifier};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use ts::{
    ArrayElement, ClassMemberKind, Expression, FunctionBody, LocalDeclaration, ObjectMember,
    PropertyName, SourceFile, VariableKind,
};

/// How many macro calls may nest before evaluation gives up.
pub const DEFAULT_MAX_MACRO_DEPTH: usize = 8;

type Scope = IndexMap<String, MetadataValue>;

#[derive(Clone)]
struct Context<'a> {
    file: &'a SourceFile,
    /// Parameters bound by the enclosing macro expansion.
    scope: Option<Rc<Scope>>,
    depth: usize,
}

impl<'a> Context<'a> {
    fn top_level(file: &'a SourceFile, depth: usize) -> Self {
        Self {
            file,
            scope: None,
            depth,
        }
    }

    fn lookup(&self, name: &str) -> Option<&MetadataValue> {
        self.scope.as_ref().and_then(|scope| scope.get(name))
    }
}

struct Callable<'a> {
    name: String,
    body: &'a FunctionBody,
    file: &'a SourceFile,
}

fn unresolvable(reason: DynamicReason, detail: impl Into<String>) -> MetadataValue {
    MetadataValue::unresolvable(reason, detail)
}

pub struct PartialEvaluator<'a> {
    host: &'a dyn ReflectionHost<'a>,
    registry: &'a ReferenceRegistry,
    max_macro_depth: usize,
    /// Constants whose initializer is being evaluated.
    in_progress: RefCell<HashSet<SymbolKey>>,
}

impl<'a> PartialEvaluator<'a> {
    pub fn new(host: &'a dyn ReflectionHost<'a>, registry: &'a ReferenceRegistry) -> Self {
        Self {
            host,
            registry,
            max_macro_depth: DEFAULT_MAX_MACRO_DEPTH,
            in_progress: RefCell::new(HashSet::new()),
        }
    }

    pub fn with_max_macro_depth(mut self, max_macro_depth: usize) -> Self {
        self.max_macro_depth = max_macro_depth;
        self
    }

    pub fn host(&self) -> &'a dyn ReflectionHost<'a> {
        self.host
    }

    pub fn registry(&self) -> &'a ReferenceRegistry {
        self.registry
    }

    /// Evaluate `expression` as written in `file`.
    pub fn evaluate(&self, expression: &Expression, file: &'a SourceFile) -> MetadataValue {
        self.eval(expression, &Context::top_level(file, 0))
    }

    /// The interned reference for a declaration the host resolved.
    pub fn reference_of(&self, decl: &Declaration<'a>) -> Reference {
        self.registry.intern_with_owner(
            &decl.file.file_name,
            decl.name(),
            decl.node.span(),
            decl.via_module.clone(),
        )
    }

    /// Reference to what `file` exports as `exported_name`, if that is a declaration.
    pub fn resolve_export_reference(
        &self,
        file: &'a SourceFile,
        exported_name: &str,
    ) -> Option<Reference> {
        match self.host.get_export_of_module(file, exported_name)? {
            ResolvedIdentifier::Declaration(decl) => Some(self.reference_of(&decl)),
            _ => None,
        }
    }

    /// Evaluate the expression wrapped by a forward reference.
    pub fn resolve_forward_ref(&self, forward: &ForwardRef) -> MetadataValue {
        match self.host.source_file(&forward.context_file) {
            Some(file) => self.evaluate(&forward.expression, file),
            None => unresolvable(DynamicReason::UnknownIdentifier, forward.expression.to_string()),
        }
    }

    /// Copy of `value` with every forward reference replaced by its target.
    pub fn resolve_forward_refs(&self, value: &MetadataValue) -> MetadataValue {
        self.resolve_forward_refs_bounded(value, self.max_macro_depth)
    }

    fn resolve_forward_refs_bounded(&self, value: &MetadataValue, budget: usize) -> MetadataValue {
        match value {
            MetadataValue::ForwardRef(forward) => {
                if budget == 0 {
                    return unresolvable(
                        DynamicReason::MacroDepthExceeded,
                        forward.expression.to_string(),
                    );
                }
                let resolved = self.resolve_forward_ref(forward);
                self.resolve_forward_refs_bounded(&resolved, budget - 1)
            }
            MetadataValue::Array(items) => MetadataValue::Array(
                items
                    .iter()
                    .map(|item| self.resolve_forward_refs_bounded(item, budget))
                    .collect(),
            ),
            MetadataValue::Object(map) => MetadataValue::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), self.resolve_forward_refs_bounded(item, budget)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    fn eval(&self, expr: &Expression, ctx: &Context<'a>) -> MetadataValue {
        match expr {
            Expression::String(s) => MetadataValue::String(s.clone()),
            Expression::Number(n) => MetadataValue::Number(*n),
            Expression::Boolean(b) => MetadataValue::Boolean(*b),
            Expression::Null => MetadataValue::Null,
            Expression::Identifier(name) => self.eval_identifier(name, ctx),
            Expression::Array(elements) => MetadataValue::Array(self.eval_elements(elements, ctx)),
            Expression::Object(members) => self.eval_object(members, ctx),
            Expression::Call { callee, arguments } => self.eval_call(expr, callee, arguments, ctx),
            Expression::PropertyAccess { object, name } => {
                self.eval_property_access(expr, object, name, ctx)
            }
            Expression::ElementAccess { .. } => {
                unresolvable(DynamicReason::ComputedProperty, expr.to_string())
            }
            Expression::New { .. } => unresolvable(DynamicReason::UnsupportedCall, expr.to_string()),
            Expression::ArrowFunction(_) | Expression::Unsupported(_) => {
                unresolvable(DynamicReason::UnsupportedSyntax, expr.to_string())
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let left = self.eval(left, ctx);
                if left.is_unresolvable() {
                    return left;
                }
                let right = self.eval(right, ctx);
                if right.is_unresolvable() {
                    return right;
                }
                evaluate_binary(&left, operator, &right)
                    .unwrap_or_else(|| unresolvable(DynamicReason::InvalidOperand, expr.to_string()))
            }
            Expression::Unary { operator, operand } => {
                let operand = self.eval(operand, ctx);
                if operand.is_unresolvable() {
                    return operand;
                }
                evaluate_unary(operator, &operand)
                    .unwrap_or_else(|| unresolvable(DynamicReason::InvalidOperand, expr.to_string()))
            }
        }
    }

    fn eval_identifier(&self, name: &str, ctx: &Context<'a>) -> MetadataValue {
        if let Some(value) = ctx.lookup(name) {
            return value.clone();
        }
        if name == "undefined" {
            return MetadataValue::Null;
        }
        match self.host.get_declaration_of_identifier(name, ctx.file) {
            Some(ResolvedIdentifier::Declaration(decl)) => self.eval_declaration(&decl, ctx.depth),
            Some(ResolvedIdentifier::Namespace(_)) => {
                unresolvable(DynamicReason::UnsupportedSyntax, name)
            }
            Some(ResolvedIdentifier::External(import)) => external(&import),
            None => unresolvable(DynamicReason::UnknownIdentifier, name),
        }
    }

    fn eval_declaration(&self, decl: &Declaration<'a>, depth: usize) -> MetadataValue {
        match decl.node {
            LocalDeclaration::Class(_) | LocalDeclaration::Function(_) => {
                MetadataValue::Reference(self.reference_of(decl))
            }
            LocalDeclaration::Variable(stmt, var) => {
                if stmt.kind != VariableKind::Const {
                    return unresolvable(DynamicReason::MutableBinding, var.name.clone());
                }
                match &var.initializer {
                    // Ambient (`declare const`) and `new`-constructed constants are
                    // identities, not values: injection tokens.
                    None | Some(Expression::New { .. }) => {
                        MetadataValue::Reference(self.reference_of(decl))
                    }
                    Some(initializer) => {
                        let key = SymbolKey::new(decl.file.file_name.clone(), var.name.clone());
                        if !self.in_progress.borrow_mut().insert(key.clone()) {
                            return unresolvable(DynamicReason::CircularReference, var.name.clone());
                        }
                        let value = self.eval(initializer, &Context::top_level(decl.file, depth));
                        self.in_progress.borrow_mut().remove(&key);
                        value
                    }
                }
            }
        }
    }

    /// Array elements and call arguments; spread arrays are spliced in place.
    fn eval_elements(&self, elements: &[ArrayElement], ctx: &Context<'a>) -> Vec<MetadataValue> {
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                ArrayElement::Expression(expr) => out.push(self.eval(expr, ctx)),
                ArrayElement::Hole => out.push(MetadataValue::Null),
                ArrayElement::Spread(expr) => match self.eval(expr, ctx) {
                    MetadataValue::Array(items) => out.extend(items),
                    unresolved @ MetadataValue::Unresolvable(_) => out.push(unresolved),
                    _ => out.push(unresolvable(DynamicReason::InvalidSpread, expr.to_string())),
                },
            }
        }
        out
    }

    fn eval_object(&self, members: &[ObjectMember], ctx: &Context<'a>) -> MetadataValue {
        let mut map = IndexMap::new();
        for member in members {
            match member {
                ObjectMember::Property {
                    key: PropertyName::Static(key),
                    value,
                } => {
                    map.insert(key.clone(), self.eval(value, ctx));
                }
                ObjectMember::Property {
                    key: PropertyName::Computed(key),
                    value,
                } => match self.eval(key, ctx) {
                    MetadataValue::String(key) => {
                        map.insert(key, self.eval(value, ctx));
                    }
                    _ => return unresolvable(DynamicReason::ComputedProperty, format!("[{}]", key)),
                },
                ObjectMember::Spread(expr) => match self.eval(expr, ctx) {
                    MetadataValue::Object(other) => map.extend(other),
                    unresolved @ MetadataValue::Unresolvable(_) => return unresolved,
                    _ => return unresolvable(DynamicReason::InvalidSpread, expr.to_string()),
                },
            }
        }
        MetadataValue::Object(map)
    }

    fn eval_call(
        &self,
        call: &Expression,
        callee: &Expression,
        arguments: &[ArrayElement],
        ctx: &Context<'a>,
    ) -> MetadataValue {
        if self.is_forward_ref(callee, ctx) {
            return self.forward_ref(call, arguments, ctx);
        }
        match self.resolve_callable(callee, ctx) {
            Some(callable) => self.expand_macro(call, callable, arguments, ctx),
            None => unresolvable(DynamicReason::UnsupportedCall, callee.to_string()),
        }
    }

    fn is_forward_ref(&self, callee: &Expression, ctx: &Context<'a>) -> bool {
        match callee {
            Expression::Identifier(name) if ctx.lookup(name).is_none() => {
                match self.host.get_import_of_identifier(name, ctx.file) {
                    Some(Import {
                        name: Some(imported),
                        ..
                    }) => imported == FORWARD_REF,
                    Some(_) => false,
                    None => name == FORWARD_REF,
                }
            }
            Expression::PropertyAccess { object, name } if name == FORWARD_REF => {
                match object.as_ref() {
                    Expression::Identifier(ns) => matches!(
                        self.host.get_import_of_identifier(ns, ctx.file),
                        Some(Import { name: None, .. })
                    ),
                    _ => false,
                }
            }
            _ => false,
        }
    }

    fn forward_ref(
        &self,
        call: &Expression,
        arguments: &[ArrayElement],
        ctx: &Context<'a>,
    ) -> MetadataValue {
        let body = match arguments {
            [ArrayElement::Expression(Expression::ArrowFunction(body))]
                if body.parameters.is_empty() =>
            {
                body
            }
            _ => return unresolvable(DynamicReason::UnsupportedCall, call.to_string()),
        };

        match &body.return_expression {
            Some(Expression::Identifier(name)) if ctx.lookup(name).is_some() => {
                ctx.lookup(name).cloned().unwrap_or(MetadataValue::Null)
            }
            Some(inner) => MetadataValue::ForwardRef(ForwardRef {
                expression: inner.clone(),
                context_file: ctx.file.file_name.clone(),
            }),
            None => unresolvable(DynamicReason::UnsupportedCall, call.to_string()),
        }
    }

    /// Follow an identifier or a chain of namespace members to what it names.
    fn resolve_qualified(&self, expr: &Expression, ctx: &Context<'a>) -> Option<ResolvedIdentifier<'a>> {
        match expr {
            Expression::Identifier(name) if ctx.lookup(name).is_none() => {
                self.host.get_declaration_of_identifier(name, ctx.file)
            }
            Expression::PropertyAccess { object, name } => match self.resolve_qualified(object, ctx)? {
                ResolvedIdentifier::Namespace(module) => self.host.get_export_of_module(module, name),
                _ => None,
            },
            _ => None,
        }
    }

    fn resolve_callable(&self, callee: &Expression, ctx: &Context<'a>) -> Option<Callable<'a>> {
        if let Some(ResolvedIdentifier::Declaration(decl)) = self.resolve_qualified(callee, ctx) {
            return callable_of(&decl);
        }
        let Expression::PropertyAccess { object, name } = callee else {
            return None;
        };
        match self.resolve_qualified(object, ctx)? {
            ResolvedIdentifier::Declaration(Declaration {
                file,
                node: LocalDeclaration::Class(class),
                ..
            }) => match &class.static_member(name)?.kind {
                ClassMemberKind::Method(body) => Some(Callable {
                    name: format!("{}.{}", class.name, name),
                    body,
                    file,
                }),
                ClassMemberKind::Property { .. } => None,
            },
            _ => None,
        }
    }

    fn expand_macro(
        &self,
        call: &Expression,
        callable: Callable<'a>,
        arguments: &[ArrayElement],
        ctx: &Context<'a>,
    ) -> MetadataValue {
        if ctx.depth >= self.max_macro_depth {
            return unresolvable(DynamicReason::MacroDepthExceeded, callable.name);
        }
        let Some(return_expression) = &callable.body.return_expression else {
            return unresolvable(DynamicReason::UnsupportedCall, call.to_string());
        };

        let arguments = self.eval_elements(arguments, ctx);
        let scope: Scope = callable
            .body
            .parameters
            .iter()
            .enumerate()
            .map(|(index, parameter)| {
                (
                    parameter.clone(),
                    arguments.get(index).cloned().unwrap_or(MetadataValue::Null),
                )
            })
            .collect();

        self.eval(
            return_expression,
            &Context {
                file: callable.file,
                scope: Some(Rc::new(scope)),
                depth: ctx.depth + 1,
            },
        )
    }

    fn eval_property_access(
        &self,
        expr: &Expression,
        object: &Expression,
        name: &str,
        ctx: &Context<'a>,
    ) -> MetadataValue {
        match self.resolve_qualified(object, ctx) {
            Some(ResolvedIdentifier::Namespace(module)) => {
                return match self.host.get_export_of_module(module, name) {
                    Some(ResolvedIdentifier::Declaration(decl)) => {
                        self.eval_declaration(&decl, ctx.depth)
                    }
                    Some(ResolvedIdentifier::External(import)) => external(&import),
                    Some(ResolvedIdentifier::Namespace(_)) => {
                        unresolvable(DynamicReason::UnsupportedSyntax, expr.to_string())
                    }
                    None => unresolvable(DynamicReason::UnknownIdentifier, expr.to_string()),
                };
            }
            Some(ResolvedIdentifier::Declaration(Declaration {
                file,
                node: LocalDeclaration::Class(class),
                ..
            })) => {
                return match class.static_member(name).map(|member| &member.kind) {
                    Some(ClassMemberKind::Property {
                        initializer: Some(initializer),
                    }) => self.eval(initializer, &Context::top_level(file, ctx.depth)),
                    Some(_) => unresolvable(DynamicReason::UnsupportedSyntax, expr.to_string()),
                    None => MetadataValue::Null,
                };
            }
            _ => {}
        }

        match self.eval(object, ctx) {
            MetadataValue::Object(mut map) => map.swap_remove(name).unwrap_or(MetadataValue::Null),
            MetadataValue::Array(items) if name == "length" => {
                MetadataValue::Number(items.len() as f64)
            }
            MetadataValue::String(s) if name == "length" => {
                MetadataValue::Number(s.encode_utf16().count() as f64)
            }
            unresolved @ MetadataValue::Unresolvable(_) => unresolved,
            _ => unresolvable(DynamicReason::NotAnObject, object.to_string()),
        }
    }
}

fn external(import: &Import) -> MetadataValue {
    unresolvable(
        DynamicReason::ExternalReference,
        format!("{} from '{}'", import.name.as_deref().unwrap_or("*"), import.from),
    )
}

fn callable_of<'a>(decl: &Declaration<'a>) -> Option<Callable<'a>> {
    match decl.node {
        LocalDeclaration::Function(function) => Some(Callable {
            name: function.name.clone(),
            body: &function.body,
            file: decl.file,
        }),
        LocalDeclaration::Variable(stmt, var) if stmt.kind == VariableKind::Const => {
            match &var.initializer {
                Some(Expression::ArrowFunction(body)) => Some(Callable {
                    name: var.name.clone(),
                    body,
                    file: decl.file,
                }),
                _ => None,
            }
        }
        _ => None,
    }
}
