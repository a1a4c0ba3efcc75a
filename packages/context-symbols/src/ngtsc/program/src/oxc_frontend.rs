// Oxc Frontend
//
// Parses TypeScript with oxc and lowers the top-level statements of a file into
// the `ts` declaration model. Nothing outside this file sees oxc types.

use oxc_allocator::Allocator;
use oxc_ast::ast as oxc;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use oxc_syntax::operator::{BinaryOperator as OxcBinaryOperator, UnaryOperator as OxcUnaryOperator};
use std::path::Path;
use thiserror::Error;
use ts::{
    ArrayElement, BinaryOperator, ClassDeclaration, ClassMember, ClassMemberKind, Decorator,
    ExportDeclaration, ExportKind, ExportSpecifier, Expression, FunctionBody, FunctionDeclaration,
    ImportBinding, ImportDeclaration, ObjectMember, PropertyName, SourceFile, Span, Statement,
    UnaryOperator, VariableDeclaration, VariableKind, VariableStatement,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("failed to parse '{file_name}': {message}")]
    Syntax { file_name: String, message: String },
}

/// Parse `source_text` as the file `file_name` (the extension picks the dialect).
pub fn parse_source_file(file_name: &str, source_text: &str) -> Result<SourceFile, ParseError> {
    let allocator = Allocator::default();
    let source_type =
        SourceType::from_path(Path::new(file_name)).unwrap_or_else(|_| SourceType::ts());
    let ret = Parser::new(&allocator, source_text, source_type).parse();

    if let Some(error) = ret.errors.first() {
        return Err(ParseError::Syntax {
            file_name: file_name.to_string(),
            message: error.to_string(),
        });
    }

    let lowering = Lowering {
        source: source_text,
    };
    let statements = ret
        .program
        .body
        .iter()
        .map(|stmt| lowering.statement(stmt))
        .collect();
    Ok(SourceFile::new(file_name, statements))
}

fn to_span(span: oxc_span::Span) -> Span {
    Span::new(span.start, span.end)
}

struct Lowering<'s> {
    source: &'s str,
}

impl<'s> Lowering<'s> {
    fn text(&self, span: oxc_span::Span) -> String {
        self.source
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
            .to_string()
    }

    fn statement(&self, stmt: &oxc::Statement<'_>) -> Statement {
        match stmt {
            oxc::Statement::ImportDeclaration(import) => Statement::Import(self.import(import)),
            oxc::Statement::ExportNamedDeclaration(export) => match &export.declaration {
                Some(declaration) => self
                    .declaration(declaration, export.span)
                    .unwrap_or(Statement::Other(to_span(export.span))),
                None => Statement::Export(ExportDeclaration {
                    module_specifier: export.source.as_ref().map(|s| s.value.to_string()),
                    kind: ExportKind::Named(
                        export
                            .specifiers
                            .iter()
                            .map(|s| ExportSpecifier {
                                local: s.local.name().to_string(),
                                exported: s.exported.name().to_string(),
                            })
                            .collect(),
                    ),
                    span: to_span(export.span),
                }),
            },
            oxc::Statement::ExportAllDeclaration(export) => Statement::Export(ExportDeclaration {
                module_specifier: Some(export.source.value.to_string()),
                kind: match &export.exported {
                    Some(name) => ExportKind::Namespace(name.name().to_string()),
                    None => ExportKind::All,
                },
                span: to_span(export.span),
            }),
            oxc::Statement::ExportDefaultDeclaration(export) => match &export.declaration {
                oxc::ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                    Statement::Class(self.class(class, true, export.span))
                }
                _ => Statement::Other(to_span(export.span)),
            },
            oxc::Statement::ClassDeclaration(class) => {
                Statement::Class(self.class(class, false, class.span))
            }
            oxc::Statement::VariableDeclaration(variables) => {
                Statement::Variable(self.variables(variables, false, variables.span))
            }
            oxc::Statement::FunctionDeclaration(function) => self
                .function(function, false, function.span)
                .map(Statement::Function)
                .unwrap_or(Statement::Other(to_span(function.span))),
            other => Statement::Other(to_span(other.span())),
        }
    }

    /// Declaration of an `export <declaration>` statement.
    fn declaration(&self, declaration: &oxc::Declaration<'_>, outer: oxc_span::Span) -> Option<Statement> {
        match declaration {
            oxc::Declaration::ClassDeclaration(class) => {
                Some(Statement::Class(self.class(class, true, outer)))
            }
            oxc::Declaration::VariableDeclaration(variables) => {
                Some(Statement::Variable(self.variables(variables, true, outer)))
            }
            oxc::Declaration::FunctionDeclaration(function) => {
                self.function(function, true, outer).map(Statement::Function)
            }
            _ => None,
        }
    }

    fn import(&self, import: &oxc::ImportDeclaration<'_>) -> ImportDeclaration {
        let bindings = import
            .specifiers
            .as_ref()
            .map(|specifiers| {
                specifiers
                    .iter()
                    .map(|spec| match spec {
                        oxc::ImportDeclarationSpecifier::ImportSpecifier(s) => ImportBinding::Named {
                            imported: s.imported.name().to_string(),
                            local: s.local.name.to_string(),
                        },
                        oxc::ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                            ImportBinding::Default {
                                local: s.local.name.to_string(),
                            }
                        }
                        oxc::ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                            ImportBinding::Namespace {
                                local: s.local.name.to_string(),
                            }
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        ImportDeclaration {
            module_specifier: import.source.value.to_string(),
            bindings,
            span: to_span(import.span),
        }
    }

    fn class(&self, class: &oxc::Class<'_>, exported: bool, outer: oxc_span::Span) -> ClassDeclaration {
        // Decorators written before `export` may fall outside the class span.
        let span = class
            .decorators
            .iter()
            .fold(to_span(outer).merge(to_span(class.span)), |acc, d| {
                acc.merge(to_span(d.span))
            });

        ClassDeclaration {
            name: class
                .id
                .as_ref()
                .map_or_else(|| "default".to_string(), |id| id.name.to_string()),
            exported,
            decorators: class.decorators.iter().map(|d| self.decorator(d)).collect(),
            members: class
                .body
                .body
                .iter()
                .filter_map(|element| self.class_member(element))
                .collect(),
            span,
        }
    }

    fn decorator(&self, decorator: &oxc::Decorator<'_>) -> Decorator {
        let (callee, arguments) = match &decorator.expression {
            oxc::Expression::CallExpression(call) => (
                &call.callee,
                Some(
                    call.arguments
                        .iter()
                        .map(|arg| match arg.as_expression() {
                            Some(expr) => self.expression(expr),
                            None => Expression::Unsupported(self.text(arg.span())),
                        })
                        .collect(),
                ),
            ),
            other => (other, None),
        };

        let (name, namespace) = match callee {
            oxc::Expression::Identifier(id) => (id.name.to_string(), None),
            oxc::Expression::StaticMemberExpression(member) => match &member.object {
                oxc::Expression::Identifier(ns) => {
                    (member.property.name.to_string(), Some(ns.name.to_string()))
                }
                _ => (self.text(callee.span()), None),
            },
            _ => (self.text(callee.span()), None),
        };

        Decorator {
            name,
            namespace,
            arguments,
            span: to_span(decorator.span),
        }
    }

    fn class_member(&self, element: &oxc::ClassElement<'_>) -> Option<ClassMember> {
        match element {
            oxc::ClassElement::PropertyDefinition(prop) => Some(ClassMember {
                name: prop.key.name()?.to_string(),
                is_static: prop.r#static,
                kind: ClassMemberKind::Property {
                    initializer: prop.value.as_ref().map(|v| self.expression(v)),
                },
            }),
            oxc::ClassElement::MethodDefinition(method) => Some(ClassMember {
                name: method.key.name()?.to_string(),
                is_static: method.r#static,
                kind: ClassMemberKind::Method(self.function_body(&method.value)),
            }),
            _ => None,
        }
    }

    fn function(
        &self,
        function: &oxc::Function<'_>,
        exported: bool,
        outer: oxc_span::Span,
    ) -> Option<FunctionDeclaration> {
        let id = function.id.as_ref()?;
        Some(FunctionDeclaration {
            name: id.name.to_string(),
            exported,
            body: self.function_body(function),
            span: to_span(outer),
        })
    }

    fn variables(
        &self,
        variables: &oxc::VariableDeclaration<'_>,
        exported: bool,
        outer: oxc_span::Span,
    ) -> VariableStatement {
        VariableStatement {
            kind: match variables.kind {
                oxc::VariableDeclarationKind::Const => VariableKind::Const,
                oxc::VariableDeclarationKind::Let => VariableKind::Let,
                _ => VariableKind::Var,
            },
            exported,
            declarations: variables
                .declarations
                .iter()
                .filter_map(|decl| {
                    Some(VariableDeclaration {
                        name: decl.id.get_identifier_name()?.to_string(),
                        initializer: decl.init.as_ref().map(|init| self.expression(init)),
                        span: to_span(decl.span),
                    })
                })
                .collect(),
            span: to_span(outer),
        }
    }

    fn parameters(&self, params: &oxc::FormalParameters<'_>) -> Vec<String> {
        params
            .items
            .iter()
            .map(|param| {
                param
                    .pattern
                    .get_identifier_name()
                    .map_or_else(String::new, |name| name.to_string())
            })
            .collect()
    }

    fn single_return(&self, statements: &[oxc::Statement<'_>]) -> Option<Expression> {
        match statements {
            [oxc::Statement::ReturnStatement(ret)] => {
                ret.argument.as_ref().map(|arg| self.expression(arg))
            }
            _ => None,
        }
    }

    fn function_body(&self, function: &oxc::Function<'_>) -> FunctionBody {
        FunctionBody {
            parameters: self.parameters(&function.params),
            return_expression: function
                .body
                .as_ref()
                .and_then(|body| self.single_return(&body.statements)),
        }
    }

    fn arrow_body(&self, arrow: &oxc::ArrowFunctionExpression<'_>) -> FunctionBody {
        let return_expression = if arrow.expression {
            match arrow.body.statements.first() {
                Some(oxc::Statement::ExpressionStatement(stmt)) => {
                    Some(self.expression(&stmt.expression))
                }
                _ => None,
            }
        } else {
            self.single_return(&arrow.body.statements)
        };

        FunctionBody {
            parameters: self.parameters(&arrow.params),
            return_expression,
        }
    }

    fn arguments(&self, args: &[oxc::Argument<'_>]) -> Vec<ArrayElement> {
        args.iter()
            .map(|arg| match arg {
                oxc::Argument::SpreadElement(spread) => {
                    ArrayElement::Spread(self.expression(&spread.argument))
                }
                other => other
                    .as_expression()
                    .map_or(ArrayElement::Hole, |e| ArrayElement::Expression(self.expression(e))),
            })
            .collect()
    }

    fn array_element(&self, element: &oxc::ArrayExpressionElement<'_>) -> ArrayElement {
        match element {
            oxc::ArrayExpressionElement::SpreadElement(spread) => {
                ArrayElement::Spread(self.expression(&spread.argument))
            }
            oxc::ArrayExpressionElement::Elision(_) => ArrayElement::Hole,
            other => other
                .as_expression()
                .map_or(ArrayElement::Hole, |e| ArrayElement::Expression(self.expression(e))),
        }
    }

    fn object_member(&self, property: &oxc::ObjectPropertyKind<'_>) -> ObjectMember {
        match property {
            oxc::ObjectPropertyKind::ObjectProperty(prop) => {
                let key = match (prop.computed, prop.key.as_expression()) {
                    (true, Some(expr)) => PropertyName::Computed(Box::new(self.expression(expr))),
                    _ => PropertyName::Static(
                        prop.key
                            .name()
                            .map_or_else(|| self.text(prop.key.span()), |name| name.to_string()),
                    ),
                };
                ObjectMember::Property {
                    key,
                    value: self.expression(&prop.value),
                }
            }
            oxc::ObjectPropertyKind::SpreadProperty(spread) => {
                ObjectMember::Spread(self.expression(&spread.argument))
            }
        }
    }

    fn expression(&self, expr: &oxc::Expression<'_>) -> Expression {
        match expr {
            oxc::Expression::StringLiteral(s) => Expression::String(s.value.to_string()),
            oxc::Expression::NumericLiteral(n) => Expression::Number(n.value),
            oxc::Expression::BooleanLiteral(b) => Expression::Boolean(b.value),
            oxc::Expression::NullLiteral(_) => Expression::Null,
            oxc::Expression::Identifier(id) => Expression::Identifier(id.name.to_string()),
            oxc::Expression::TemplateLiteral(template) if template.expressions.is_empty() => {
                Expression::String(
                    template
                        .quasis
                        .iter()
                        .map(|quasi| {
                            quasi
                                .value
                                .cooked
                                .as_ref()
                                .map_or_else(|| quasi.value.raw.to_string(), |c| c.to_string())
                        })
                        .collect(),
                )
            }
            oxc::Expression::ArrayExpression(array) => Expression::Array(
                array.elements.iter().map(|el| self.array_element(el)).collect(),
            ),
            oxc::Expression::ObjectExpression(object) => Expression::Object(
                object.properties.iter().map(|p| self.object_member(p)).collect(),
            ),
            oxc::Expression::CallExpression(call) => Expression::Call {
                callee: Box::new(self.expression(&call.callee)),
                arguments: self.arguments(&call.arguments),
            },
            oxc::Expression::NewExpression(new) => Expression::New {
                callee: Box::new(self.expression(&new.callee)),
                arguments: self.arguments(&new.arguments),
            },
            oxc::Expression::StaticMemberExpression(member) => Expression::PropertyAccess {
                object: Box::new(self.expression(&member.object)),
                name: member.property.name.to_string(),
            },
            oxc::Expression::ComputedMemberExpression(member) => Expression::ElementAccess {
                object: Box::new(self.expression(&member.object)),
                index: Box::new(self.expression(&member.expression)),
            },
            oxc::Expression::ArrowFunctionExpression(arrow) => {
                Expression::ArrowFunction(Box::new(self.arrow_body(arrow)))
            }
            oxc::Expression::FunctionExpression(function) => {
                Expression::ArrowFunction(Box::new(self.function_body(function)))
            }
            oxc::Expression::ParenthesizedExpression(paren) => self.expression(&paren.expression),
            oxc::Expression::TSAsExpression(e) => self.expression(&e.expression),
            oxc::Expression::TSSatisfiesExpression(e) => self.expression(&e.expression),
            oxc::Expression::TSNonNullExpression(e) => self.expression(&e.expression),
            oxc::Expression::BinaryExpression(binary) => Expression::Binary {
                operator: binary_operator(binary.operator),
                left: Box::new(self.expression(&binary.left)),
                right: Box::new(self.expression(&binary.right)),
            },
            oxc::Expression::UnaryExpression(unary) => Expression::Unary {
                operator: unary_operator(unary.operator),
                operand: Box::new(self.expression(&unary.argument)),
            },
            other => Expression::Unsupported(self.text(other.span())),
        }
    }
}

fn binary_operator(op: OxcBinaryOperator) -> BinaryOperator {
    match op {
        OxcBinaryOperator::Addition => BinaryOperator::Add,
        OxcBinaryOperator::Subtraction => BinaryOperator::Subtract,
        OxcBinaryOperator::Multiplication => BinaryOperator::Multiply,
        OxcBinaryOperator::Division => BinaryOperator::Divide,
        other => BinaryOperator::Other(other.as_str().to_string()),
    }
}

fn unary_operator(op: OxcUnaryOperator) -> UnaryOperator {
    match op {
        OxcUnaryOperator::UnaryNegation => UnaryOperator::Minus,
        OxcUnaryOperator::UnaryPlus => UnaryOperator::Plus,
        OxcUnaryOperator::LogicalNot => UnaryOperator::Not,
        other => UnaryOperator::Other(other.as_str().to_string()),
    }
}
