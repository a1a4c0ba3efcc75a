// Partial Evaluator Tests

#[cfg(test)]
mod tests {
    use crate::ngtsc::imports::ReferenceRegistry;
    use crate::ngtsc::partial_evaluator::*;
    use crate::ngtsc::program::InMemoryProgram;
    use crate::ngtsc::reflection::ProgramReflectionHost;
    use ts::{LocalDeclaration, Program};

    /// Evaluate the initializer of `const result` in the first file.
    fn evaluate_result(sources: &[(&str, &str)]) -> MetadataValue {
        evaluate_result_with_depth(sources, DEFAULT_MAX_MACRO_DEPTH)
    }

    fn evaluate_result_with_depth(sources: &[(&str, &str)], depth: usize) -> MetadataValue {
        let program = InMemoryProgram::from_sources(sources.iter().copied()).unwrap();
        let registry = ReferenceRegistry::new();
        let host = ProgramReflectionHost::new(&program);
        let evaluator = PartialEvaluator::new(&host, &registry).with_max_macro_depth(depth);
        let file = &program.source_files()[0];
        let initializer = match file.find_local("result") {
            Some(LocalDeclaration::Variable(_, decl)) => decl.initializer.clone().unwrap(),
            other => panic!("no const result: {:?}", other),
        };
        evaluator.evaluate(&initializer, file)
    }

    fn reason(value: &MetadataValue) -> DynamicReason {
        match value {
            MetadataValue::Unresolvable(dynamic) => dynamic.reason,
            other => panic!("expected unresolvable value, got {:?}", other),
        }
    }

    mod literal_tests {
        use super::*;

        #[test]
        fn should_evaluate_literal_trees() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "const result = { selector: 'app-root', pure: false, n: 3, tags: ['a', , 'b'], none: null };",
            )]);
            assert_eq!(value.get_property("selector").and_then(|v| v.as_str()), Some("app-root"));
            assert_eq!(value.get_property("pure").and_then(|v| v.as_bool()), Some(false));
            assert_eq!(value.get_property("n").and_then(|v| v.as_number()), Some(3.0));
            let tags = value.get_property("tags").unwrap().as_array().unwrap();
            assert_eq!(tags, &[MetadataValue::from("a"), MetadataValue::Null, MetadataValue::from("b")]);
            assert_eq!(value.get_property("none"), Some(&MetadataValue::Null));
        }

        #[test]
        fn should_fold_operators() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "const prefix = 'app';\nconst result = [prefix + '-root', 1 + 2 * 3, -4, !0, 'v' + 2];",
            )]);
            assert_eq!(
                value.as_array().unwrap(),
                &[
                    MetadataValue::from("app-root"),
                    MetadataValue::Number(7.0),
                    MetadataValue::Number(-4.0),
                    MetadataValue::Boolean(true),
                    MetadataValue::from("v2"),
                ]
            );
        }

        #[test]
        fn should_splice_spread_arrays_and_objects() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "const base = ['a', 'b'];\nconst extra = { x: 1 };\nconst result = { list: [...base, 'c'], ...extra, ['computed']: true };",
            )]);
            assert_eq!(value.get_property("list").unwrap().as_array().unwrap().len(), 3);
            assert_eq!(value.get_property("x").and_then(|v| v.as_number()), Some(1.0));
            assert_eq!(value.get_property("computed").and_then(|v| v.as_bool()), Some(true));
        }

        #[test]
        fn should_read_properties_and_length() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "const config = { routes: ['a', 'b'] };\nconst result = [config.routes.length, config.missing, 'abc'.length];",
            )]);
            assert_eq!(
                value.as_array().unwrap(),
                &[MetadataValue::Number(2.0), MetadataValue::Null, MetadataValue::Number(3.0)]
            );
        }
    }

    mod dynamic_tests {
        use super::*;

        #[test]
        fn should_keep_failures_local_to_the_element() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "let mutable = 1;\nconst result = [1, mutable, unknownThing, compute(), 'ok'];",
            )]);
            let items = value.as_array().unwrap();
            assert_eq!(items.len(), 5);
            assert_eq!(items[0], MetadataValue::Number(1.0));
            assert_eq!(reason(&items[1]), DynamicReason::MutableBinding);
            assert_eq!(reason(&items[2]), DynamicReason::UnknownIdentifier);
            assert_eq!(reason(&items[3]), DynamicReason::UnsupportedCall);
            assert_eq!(items[4], MetadataValue::from("ok"));
            assert_eq!(value.unresolvable_leaves().len(), 3);
        }

        #[test]
        fn should_report_external_references() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "import { environment } from 'env-config';\nconst result = environment.production;",
            )]);
            assert_eq!(reason(&value), DynamicReason::ExternalReference);
        }

        #[test]
        fn should_detect_circular_constants() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "const a = [b];\nconst b = [a];\nconst result = a;",
            )]);
            let inner = &value.as_array().unwrap()[0].as_array().unwrap()[0];
            assert_eq!(reason(inner), DynamicReason::CircularReference);
        }

        #[test]
        fn should_reject_non_string_computed_keys() {
            let value = evaluate_result(&[("/app/main.ts", "const result = { [1 + 1]: 'x' };")]);
            assert_eq!(reason(&value), DynamicReason::ComputedProperty);
        }

        #[test]
        fn should_reject_spread_of_non_arrays() {
            let value = evaluate_result(&[("/app/main.ts", "const result = [...'abc'];")]);
            assert_eq!(reason(&value.as_array().unwrap()[0]), DynamicReason::InvalidSpread);
        }

        #[test]
        fn should_reject_property_reads_on_primitives() {
            let value = evaluate_result(&[("/app/main.ts", "const result = (1).foo;")]);
            assert_eq!(reason(&value), DynamicReason::NotAnObject);
        }
    }

    mod reference_tests {
        use super::*;

        #[test]
        fn should_follow_imports_to_declarations() {
            let value = evaluate_result(&[
                (
                    "/app/main.ts",
                    "import { SharedModule, SHARED } from './shared';\nconst result = [SharedModule, SHARED];",
                ),
                (
                    "/app/shared.ts",
                    "export class SharedModule {}\nexport const SHARED = ['shared'];",
                ),
            ]);
            let items = value.as_array().unwrap();
            let reference = items[0].as_reference().unwrap();
            assert_eq!(reference.name(), "SharedModule");
            assert_eq!(reference.file(), "/app/shared.ts");
            assert_eq!(items[1], MetadataValue::Array(vec![MetadataValue::from("shared")]));
        }

        #[test]
        fn should_treat_constructed_and_ambient_constants_as_tokens() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "const result = [TOKEN, AMBIENT];\nconst TOKEN = new InjectionToken('token');\ndeclare const AMBIENT: any;",
            )]);
            let items = value.as_array().unwrap();
            assert_eq!(items[0].as_reference().unwrap().name(), "TOKEN");
            assert_eq!(items[1].as_reference().unwrap().name(), "AMBIENT");
        }

        #[test]
        fn should_record_owning_module_of_package_symbols() {
            let value = evaluate_result(&[
                (
                    "/app/main.ts",
                    "import { CommonModule } from '@angular/common';\nconst result = CommonModule;",
                ),
                (
                    "/node_modules/@angular/common/index.ts",
                    "export class CommonModule {}",
                ),
            ]);
            let owner = value.as_reference().unwrap().best_guess_owning_module().unwrap();
            assert_eq!(owner.specifier, "@angular/common");
        }

        #[test]
        fn should_read_namespace_members_and_static_properties() {
            let value = evaluate_result(&[
                (
                    "/app/main.ts",
                    "import * as lib from './lib';\nconst result = [lib.LibModule, lib.Config.routes, lib.Config.missing];",
                ),
                (
                    "/app/lib.ts",
                    "export class LibModule {}\nexport class Config { static routes = ['r']; }",
                ),
            ]);
            let items = value.as_array().unwrap();
            assert_eq!(items[0].as_reference().unwrap().name(), "LibModule");
            assert_eq!(items[1], MetadataValue::Array(vec![MetadataValue::from("r")]));
            assert_eq!(items[2], MetadataValue::Null);
        }
    }

    mod forward_ref_tests {
        use super::*;

        const SOURCE: &str = r#"
import { forwardRef } from '@angular/core';
const result = [forwardRef(() => LaterModule), forwardRef(function () { return LaterModule; })];
export class LaterModule {}
"#;

        #[test]
        fn should_defer_forward_refs_and_resolve_them_on_demand() {
            let program = InMemoryProgram::from_sources([("/app/main.ts", SOURCE)]).unwrap();
            let registry = ReferenceRegistry::new();
            let host = ProgramReflectionHost::new(&program);
            let evaluator = PartialEvaluator::new(&host, &registry);
            let file = &program.source_files()[0];
            let initializer = match file.find_local("result") {
                Some(LocalDeclaration::Variable(_, decl)) => decl.initializer.clone().unwrap(),
                other => panic!("no const result: {:?}", other),
            };

            let value = evaluator.evaluate(&initializer, file);
            let items = value.as_array().unwrap();
            assert!(matches!(items[0], MetadataValue::ForwardRef(_)));
            assert!(matches!(items[1], MetadataValue::ForwardRef(_)));

            let resolved = evaluator.resolve_forward_refs(&value);
            for item in resolved.as_array().unwrap() {
                assert_eq!(item.as_reference().unwrap().name(), "LaterModule");
            }
        }

        #[test]
        fn should_reject_forward_refs_with_parameters() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "import { forwardRef } from '@angular/core';\nconst result = forwardRef((x) => x);",
            )]);
            assert_eq!(reason(&value), DynamicReason::UnsupportedCall);
        }

        #[test]
        fn should_serialize_forward_refs_by_expression() {
            let value = evaluate_result(&[("/app/main.ts", SOURCE)]);
            let json = serde_json::to_value(&value.as_array().unwrap()[0]).unwrap();
            assert_eq!(json, serde_json::json!({ "forwardRef": "LaterModule" }));
        }
    }

    mod macro_tests {
        use super::*;

        const ROUTER: &str = r#"
export class RouterModule {
  static forRoot(routes) {
    return { ngModule: RouterModule, providers: [{ provide: ROUTES, useValue: routes, multi: true }] };
  }
}
export const ROUTES = new InjectionToken('ROUTES');
export function provideRoutes(routes) {
  return [{ provide: ROUTES, useValue: routes, multi: true }];
}
export const withPrefix = (p, name) => p + '/' + name;
"#;

        #[test]
        fn should_expand_static_method_macros() {
            let value = evaluate_result(&[
                (
                    "/app/main.ts",
                    "import { RouterModule } from './router';\nconst routes = [{ path: 'lazy', loadChildren: './lazy#LazyModule' }];\nconst result = RouterModule.forRoot(routes);",
                ),
                ("/app/router.ts", ROUTER),
            ]);
            assert_eq!(
                value.get_property("ngModule").and_then(|v| v.as_reference()).map(|r| r.name()),
                Some("RouterModule")
            );
            let provider = &value.get_property("providers").unwrap().as_array().unwrap()[0];
            assert_eq!(
                provider.get_property("provide").and_then(|v| v.as_reference()).map(|r| r.name()),
                Some("ROUTES")
            );
            let route = &provider.get_property("useValue").unwrap().as_array().unwrap()[0];
            assert_eq!(
                route.get_property("loadChildren").and_then(|v| v.as_str()),
                Some("./lazy#LazyModule")
            );
        }

        #[test]
        fn should_expand_functions_and_arrow_constants() {
            let value = evaluate_result(&[
                (
                    "/app/main.ts",
                    "import { provideRoutes, withPrefix } from './router';\nconst result = [provideRoutes([]), withPrefix('app', 'home'), withPrefix('only')];",
                ),
                ("/app/router.ts", ROUTER),
            ]);
            let items = value.as_array().unwrap();
            assert_eq!(
                items[0].as_array().unwrap()[0].get_property("multi"),
                Some(&MetadataValue::Boolean(true))
            );
            assert_eq!(items[1], MetadataValue::from("app/home"));
            // Missing arguments are bound to undefined.
            assert_eq!(reason(&items[2]), DynamicReason::InvalidOperand);
        }

        #[test]
        fn should_stop_at_the_macro_depth_limit() {
            let source = "function wrap(x) { return [x]; }\nconst result = wrap(wrap(wrap(1)));";
            let deep = evaluate_result_with_depth(&[("/app/main.ts", source)], 8);
            assert_eq!(deep.flatten(), vec![&MetadataValue::Number(1.0)]);

            let recursive = "function loop(x) { return loop(x); }\nconst result = loop(1);";
            let value = evaluate_result_with_depth(&[("/app/main.ts", recursive)], 3);
            assert_eq!(reason(&value), DynamicReason::MacroDepthExceeded);
        }
    }

    mod diagnostics_tests {
        use super::*;
        use crate::ngtsc::diagnostics::ErrorCode;
        use ts::Span;

        #[test]
        fn should_report_each_unresolvable_leaf() {
            let value = evaluate_result(&[(
                "/app/main.ts",
                "let a = 1;\nconst result = [a, missing, 'fine'];",
            )]);
            let diagnostics =
                unresolvable_diagnostics(&value, "providers", "AppModule", "/app/main.ts", Span::new(0, 5));
            assert_eq!(diagnostics.len(), 2);
            assert!(diagnostics.iter().all(|d| d.code == ErrorCode::ValueNotLiteral));
        }
    }
}
