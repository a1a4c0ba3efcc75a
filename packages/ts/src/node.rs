//! Declaration tree of a single source file.
//!
//! Only the shapes that matter for decorator metadata are modelled. Anything
//! else a parser meets is kept as `Statement::Other` / `Expression::Unsupported`
//! so positions stay stable and evaluation can report what it could not read.

use crate::Span;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub file_name: String,
    pub statements: Vec<Statement>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            file_name: file_name.into(),
            statements,
        }
    }

    pub fn imports(&self) -> impl Iterator<Item = &ImportDeclaration> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Import(import) => Some(import),
            _ => None,
        })
    }

    pub fn exports(&self) -> impl Iterator<Item = &ExportDeclaration> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Export(export) => Some(export),
            _ => None,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDeclaration> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Class(class) => Some(class),
            _ => None,
        })
    }

    /// Find the top-level declaration introducing `name` in this file.
    pub fn find_local(&self, name: &str) -> Option<LocalDeclaration<'_>> {
        for stmt in &self.statements {
            match stmt {
                Statement::Class(class) if class.name == name => {
                    return Some(LocalDeclaration::Class(class));
                }
                Statement::Function(function) if function.name == name => {
                    return Some(LocalDeclaration::Function(function));
                }
                Statement::Variable(variables) => {
                    if let Some(decl) = variables.declarations.iter().find(|d| d.name == name) {
                        return Some(LocalDeclaration::Variable(variables, decl));
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Find the import binding that introduces the local `name`, if any.
    pub fn find_import(&self, name: &str) -> Option<(&ImportDeclaration, &ImportBinding)> {
        self.imports().find_map(|import| {
            import
                .bindings
                .iter()
                .find(|binding| binding.local_name() == name)
                .map(|binding| (import, binding))
        })
    }

    /// Innermost top-level statement whose span contains `offset`.
    pub fn statement_at(&self, offset: u32) -> Option<&Statement> {
        self.statements.iter().find(|stmt| stmt.span().contains(offset))
    }
}

/// A top-level declaration found by name inside one file.
#[derive(Debug, Clone, Copy)]
pub enum LocalDeclaration<'a> {
    Class(&'a ClassDeclaration),
    Function(&'a FunctionDeclaration),
    Variable(&'a VariableStatement, &'a VariableDeclaration),
}

impl<'a> LocalDeclaration<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            LocalDeclaration::Class(class) => &class.name,
            LocalDeclaration::Function(function) => &function.name,
            LocalDeclaration::Variable(_, decl) => &decl.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LocalDeclaration::Class(class) => class.span,
            LocalDeclaration::Function(function) => function.span,
            LocalDeclaration::Variable(_, decl) => decl.span,
        }
    }

    pub fn is_exported(&self) -> bool {
        match self {
            LocalDeclaration::Class(class) => class.exported,
            LocalDeclaration::Function(function) => function.exported,
            LocalDeclaration::Variable(stmt, _) => stmt.exported,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Import(ImportDeclaration),
    Export(ExportDeclaration),
    Class(ClassDeclaration),
    Variable(VariableStatement),
    Function(FunctionDeclaration),
    Other(Span),
}

impl Statement {
    pub fn span(&self) -> Span {
        match self {
            Statement::Import(s) => s.span,
            Statement::Export(s) => s.span,
            Statement::Class(s) => s.span,
            Statement::Variable(s) => s.span,
            Statement::Function(s) => s.span,
            Statement::Other(span) => *span,
        }
    }

    pub fn as_class(&self) -> Option<&ClassDeclaration> {
        match self {
            Statement::Class(class) => Some(class),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub module_specifier: String,
    pub bindings: Vec<ImportBinding>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportBinding {
    /// `import {imported as local} from '...'`
    Named { imported: String, local: String },
    /// `import local from '...'`
    Default { local: String },
    /// `import * as local from '...'`
    Namespace { local: String },
}

impl ImportBinding {
    pub fn local_name(&self) -> &str {
        match self {
            ImportBinding::Named { local, .. }
            | ImportBinding::Default { local }
            | ImportBinding::Namespace { local } => local,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportDeclaration {
    /// `Some` for re-exports (`export ... from '...'`).
    pub module_specifier: Option<String>,
    pub kind: ExportKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    /// `export { a, b as c }`
    Named(Vec<ExportSpecifier>),
    /// `export * from '...'`
    All,
    /// `export * as ns from '...'`
    Namespace(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub name: String,
    pub exported: bool,
    pub decorators: Vec<Decorator>,
    pub members: Vec<ClassMember>,
    /// Covers the decorators as well as the class body.
    pub span: Span,
}

impl ClassDeclaration {
    pub fn static_member(&self, name: &str) -> Option<&ClassMember> {
        self.members.iter().find(|m| m.is_static && m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decorator {
    /// Name by which the decorator was invoked (`Component` in `@core.Component()`).
    pub name: String,
    /// Qualifier of a namespaced decorator (`core` in `@core.Component()`).
    pub namespace: Option<String>,
    /// `None` when the decorator is not invoked (`@Component` instead of `@Component()`).
    pub arguments: Option<Vec<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMember {
    pub name: String,
    pub is_static: bool,
    pub kind: ClassMemberKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMemberKind {
    Property { initializer: Option<Expression> },
    Method(FunctionBody),
}

/// Parameters and the single returned expression of a function, if its body
/// consists of exactly one `return` statement (or is an expression-bodied arrow).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FunctionBody {
    pub parameters: Vec<String>,
    pub return_expression: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub exported: bool,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableStatement {
    pub kind: VariableKind,
    pub exported: bool,
    pub declarations: Vec<VariableDeclaration>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub name: String,
    pub initializer: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Identifier(String),
    Array(Vec<ArrayElement>),
    Object(Vec<ObjectMember>),
    Call {
        callee: Box<Expression>,
        arguments: Vec<ArrayElement>,
    },
    New {
        callee: Box<Expression>,
        arguments: Vec<ArrayElement>,
    },
    PropertyAccess {
        object: Box<Expression>,
        name: String,
    },
    ElementAccess {
        object: Box<Expression>,
        index: Box<Expression>,
    },
    ArrowFunction(Box<FunctionBody>),
    Binary {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    /// Syntax the model does not represent; carries the source text.
    Unsupported(String),
}

impl Expression {
    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::String(value.into())
    }

    pub fn array(elements: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Array(elements.into_iter().map(ArrayElement::Expression).collect())
    }

    pub fn object<K: Into<String>>(properties: impl IntoIterator<Item = (K, Expression)>) -> Self {
        Expression::Object(
            properties
                .into_iter()
                .map(|(key, value)| ObjectMember::Property {
                    key: PropertyName::Static(key.into()),
                    value,
                })
                .collect(),
        )
    }

    pub fn call(callee: Expression, arguments: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Call {
            callee: Box::new(callee),
            arguments: arguments.into_iter().map(ArrayElement::Expression).collect(),
        }
    }

    pub fn property(object: Expression, name: impl Into<String>) -> Self {
        Expression::PropertyAccess {
            object: Box::new(object),
            name: name.into(),
        }
    }

    /// `() => expr`
    pub fn arrow(body: Expression) -> Self {
        Expression::ArrowFunction(Box::new(FunctionBody {
            parameters: Vec::new(),
            return_expression: Some(body),
        }))
    }

    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Expression::Identifier(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_object_literal(&self) -> bool {
        matches!(self, Expression::Object(_))
    }

    /// Value of a static `key` property when this is an object literal.
    pub fn get_property(&self, key: &str) -> Option<&Expression> {
        match self {
            Expression::Object(members) => members.iter().find_map(|member| match member {
                ObjectMember::Property {
                    key: PropertyName::Static(name),
                    value,
                } if name == key => Some(value),
                _ => None,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayElement {
    Expression(Expression),
    Spread(Expression),
    Hole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    Property { key: PropertyName, value: Expression },
    Spread(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyName {
    Static(String),
    Computed(Box<Expression>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Plus,
    Not,
    Other(String),
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Add => f.write_str("+"),
            BinaryOperator::Subtract => f.write_str("-"),
            BinaryOperator::Multiply => f.write_str("*"),
            BinaryOperator::Divide => f.write_str("/"),
            BinaryOperator::Other(op) => f.write_str(op),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOperator::Minus => f.write_str("-"),
            UnaryOperator::Plus => f.write_str("+"),
            UnaryOperator::Not => f.write_str("!"),
            UnaryOperator::Other(op) => write!(f, "{} ", op),
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for ArrayElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayElement::Expression(expr) => write!(f, "{}", expr),
            ArrayElement::Spread(expr) => write!(f, "...{}", expr),
            ArrayElement::Hole => Ok(()),
        }
    }
}

impl fmt::Display for ObjectMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectMember::Property {
                key: PropertyName::Static(key),
                value,
            } => write!(f, "{}: {}", key, value),
            ObjectMember::Property {
                key: PropertyName::Computed(key),
                value,
            } => write!(f, "[{}]: {}", key, value),
            ObjectMember::Spread(expr) => write!(f, "...{}", expr),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::String(s) => write!(f, "{:?}", s),
            Expression::Number(n) => write!(f, "{}", n),
            Expression::Boolean(b) => write!(f, "{}", b),
            Expression::Null => f.write_str("null"),
            Expression::Identifier(name) => f.write_str(name),
            Expression::Array(elements) => {
                f.write_str("[")?;
                write_list(f, elements)?;
                f.write_str("]")
            }
            Expression::Object(members) => {
                f.write_str("{")?;
                write_list(f, members)?;
                f.write_str("}")
            }
            Expression::Call { callee, arguments } => {
                write!(f, "{}(", callee)?;
                write_list(f, arguments)?;
                f.write_str(")")
            }
            Expression::New { callee, arguments } => {
                write!(f, "new {}(", callee)?;
                write_list(f, arguments)?;
                f.write_str(")")
            }
            Expression::PropertyAccess { object, name } => write!(f, "{}.{}", object, name),
            Expression::ElementAccess { object, index } => write!(f, "{}[{}]", object, index),
            Expression::ArrowFunction(body) => {
                write!(f, "({}) => ", body.parameters.join(", "))?;
                match &body.return_expression {
                    Some(expr) => write!(f, "{}", expr),
                    None => f.write_str("{ ... }"),
                }
            }
            Expression::Binary {
                operator,
                left,
                right,
            } => write!(f, "{} {} {}", left, operator, right),
            Expression::Unary { operator, operand } => write!(f, "{}{}", operator, operand),
            Expression::Unsupported(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, start: u32, end: u32) -> Statement {
        Statement::Class(ClassDeclaration {
            name: name.to_string(),
            exported: true,
            decorators: vec![],
            members: vec![],
            span: Span::new(start, end),
        })
    }

    #[test]
    fn should_find_local_declarations_by_name() {
        let file = SourceFile::new(
            "/app/a.ts",
            vec![
                class("AppModule", 0, 10),
                Statement::Variable(VariableStatement {
                    kind: VariableKind::Const,
                    exported: false,
                    declarations: vec![VariableDeclaration {
                        name: "routes".to_string(),
                        initializer: Some(Expression::array([])),
                        span: Span::new(12, 30),
                    }],
                    span: Span::new(11, 31),
                }),
            ],
        );

        assert!(matches!(file.find_local("AppModule"), Some(LocalDeclaration::Class(_))));
        let routes = file.find_local("routes").unwrap();
        assert_eq!(routes.name(), "routes");
        assert!(!routes.is_exported());
        assert!(file.find_local("Missing").is_none());
    }

    #[test]
    fn should_locate_statement_by_offset() {
        let file = SourceFile::new("/app/a.ts", vec![class("A", 0, 10), class("B", 12, 20)]);
        assert_eq!(file.statement_at(15).and_then(|s| s.as_class()).map(|c| c.name.as_str()), Some("B"));
        assert!(file.statement_at(11).is_none());
    }

    #[test]
    fn should_print_expressions() {
        let expr = Expression::call(
            Expression::identifier("forwardRef"),
            [Expression::arrow(Expression::identifier("LazyModule"))],
        );
        assert_eq!(expr.to_string(), "forwardRef(() => LazyModule)");

        let obj = Expression::object([("path", Expression::string("lazy-a"))]);
        assert_eq!(obj.to_string(), "{path: \"lazy-a\"}");
        assert_eq!(obj.get_property("path"), Some(&Expression::string("lazy-a")));
    }
}
