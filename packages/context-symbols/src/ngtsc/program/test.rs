// Program Frontend Tests

#[cfg(test)]
mod tests {
    use crate::ngtsc::program::*;
    use ts::{
        ArrayElement, ClassMemberKind, ExportKind, Expression, ImportBinding, Program, Statement,
        VariableKind,
    };

    mod oxc_frontend_tests {
        use super::*;

        #[test]
        fn should_lower_imports_and_decorated_classes() {
            let source = r#"
import { NgModule as Module } from '@angular/core';
import * as common from '@angular/common';

@Module({
  imports: [common.CommonModule],
  declarations: [],
})
export class AppModule {}
"#;
            let file = parse_source_file("/app/app.module.ts", source).unwrap();
            assert_eq!(file.statements.len(), 3);

            let (import, binding) = file.find_import("Module").unwrap();
            assert_eq!(import.module_specifier, "@angular/core");
            assert_eq!(
                binding,
                &ImportBinding::Named {
                    imported: "NgModule".into(),
                    local: "Module".into()
                }
            );

            let class = file.statements[2].as_class().unwrap();
            assert_eq!(class.name, "AppModule");
            assert!(class.exported);
            assert_eq!(class.decorators[0].name, "Module");
            let args = class.decorators[0].arguments.as_ref().unwrap();
            assert_eq!(args.len(), 1);
            assert_eq!(
                args[0].get_property("imports").map(|e| e.to_string()),
                Some("[common.CommonModule]".to_string())
            );

            let decorator_start = source.find("@Module").unwrap() as u32;
            assert!(class.span.start <= decorator_start);
        }

        #[test]
        fn should_mark_uninvoked_decorators() {
            let file = parse_source_file("/app/a.ts", "@Injectable\nexport class Service {}").unwrap();
            let class = file.statements[0].as_class().unwrap();
            assert!(class.decorators[0].arguments.is_none());
        }

        #[test]
        fn should_lower_single_return_functions_and_static_methods() {
            let source = r#"
export function provideRoutes(routes) {
  return [{ provide: ROUTES, multi: true, useValue: routes }];
}
export class RouterModule {
  static forRoot(routes: Routes) {
    return { ngModule: RouterModule, providers: [provideRoutes(routes)] };
  }
}
"#;
            let file = parse_source_file("/router.ts", source).unwrap();
            match &file.statements[0] {
                Statement::Function(function) => {
                    assert_eq!(function.name, "provideRoutes");
                    assert_eq!(function.body.parameters, vec!["routes".to_string()]);
                    assert!(matches!(
                        function.body.return_expression,
                        Some(Expression::Array(_))
                    ));
                }
                other => panic!("expected function, got {:?}", other),
            }

            let class = file.statements[1].as_class().unwrap();
            let member = class.static_member("forRoot").unwrap();
            match &member.kind {
                ClassMemberKind::Method(body) => {
                    assert_eq!(body.parameters, vec!["routes".to_string()]);
                    assert!(body.return_expression.as_ref().unwrap().is_object_literal());
                }
                other => panic!("expected method, got {:?}", other),
            }
        }

        #[test]
        fn should_lower_variables_and_exports() {
            let source = r#"
const routes = [{ path: 'a' }, ...extra, , `tpl`];
export let counter = -1;
export { routes as appRoutes };
export * from './other';
"#;
            let file = parse_source_file("/app/routes.ts", source).unwrap();
            match &file.statements[0] {
                Statement::Variable(stmt) => {
                    assert_eq!(stmt.kind, VariableKind::Const);
                    assert!(!stmt.exported);
                    match stmt.declarations[0].initializer.as_ref().unwrap() {
                        Expression::Array(elements) => {
                            assert!(matches!(elements[1], ArrayElement::Spread(_)));
                            assert_eq!(elements[2], ArrayElement::Hole);
                            assert_eq!(
                                elements[3],
                                ArrayElement::Expression(Expression::string("tpl"))
                            );
                        }
                        other => panic!("expected array, got {:?}", other),
                    }
                }
                other => panic!("expected variable, got {:?}", other),
            }
            match &file.statements[1] {
                Statement::Variable(stmt) => {
                    assert_eq!(stmt.kind, VariableKind::Let);
                    assert!(stmt.exported);
                }
                other => panic!("expected variable, got {:?}", other),
            }
            match &file.statements[2] {
                Statement::Export(export) => match &export.kind {
                    ExportKind::Named(specifiers) => {
                        assert_eq!(specifiers[0].local, "routes");
                        assert_eq!(specifiers[0].exported, "appRoutes");
                    }
                    other => panic!("expected named export, got {:?}", other),
                },
                other => panic!("expected export, got {:?}", other),
            }
            match &file.statements[3] {
                Statement::Export(export) => {
                    assert_eq!(export.kind, ExportKind::All);
                    assert_eq!(export.module_specifier.as_deref(), Some("./other"));
                }
                other => panic!("expected export, got {:?}", other),
            }
        }

        #[test]
        fn should_report_syntax_errors() {
            let err = parse_source_file("/app/broken.ts", "export class {").unwrap_err();
            assert!(err.to_string().starts_with("failed to parse '/app/broken.ts'"));
        }
    }

    mod in_memory_program_tests {
        use super::*;

        fn program() -> InMemoryProgram {
            InMemoryProgram::from_sources([
                ("/project/src/app/app.module.ts", "export class AppModule {}"),
                ("/project/src/app/lazy/index.ts", "export class LazyModule {}"),
                (
                    "/project/node_modules/@angular/core/index.d.ts",
                    "export declare function NgModule(meta?: any): any;",
                ),
                ("/project/libs/shared.ts", "export class SharedModule {}"),
            ])
            .unwrap()
            .with_path_mapping("@app/shared", "/project/libs/shared")
        }

        #[test]
        fn should_resolve_relative_specifiers() {
            let program = program();
            assert_eq!(
                program.resolve_module_name("./lazy", "/project/src/app/app.module.ts"),
                Some("/project/src/app/lazy/index.ts".to_string())
            );
            assert_eq!(
                program.resolve_module_name("./app.module", "/project/src/app/other.ts"),
                Some("/project/src/app/app.module.ts".to_string())
            );
            assert_eq!(
                program.resolve_module_name("./missing", "/project/src/app/app.module.ts"),
                None
            );
        }

        #[test]
        fn should_resolve_bare_specifiers() {
            let program = program();
            assert_eq!(
                program.resolve_module_name("@angular/core", "/project/src/app/app.module.ts"),
                Some("/project/node_modules/@angular/core/index.d.ts".to_string())
            );
            assert_eq!(
                program.resolve_module_name("@app/shared", "/project/src/app/app.module.ts"),
                Some("/project/libs/shared.ts".to_string())
            );
            assert_eq!(
                program.resolve_module_name("rxjs", "/project/src/app/app.module.ts"),
                None
            );
        }

        #[test]
        fn should_replace_files_with_same_name() {
            let mut program = program();
            let replacement =
                parse_source_file("/project/libs/shared.ts", "export class Other {}").unwrap();
            program.add_file(replacement);
            assert_eq!(program.source_files().len(), 4);
            let file = program.source_file("/project/libs/shared.ts").unwrap();
            assert!(file.find_local("Other").is_some());
        }
    }
}
