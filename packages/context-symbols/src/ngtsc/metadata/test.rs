// Metadata Tests

#[cfg(test)]
mod tests {
    use crate::ngtsc::diagnostics::ErrorCode;
    use crate::ngtsc::imports::ReferenceRegistry;
    use crate::ngtsc::logging::NullLogger;
    use crate::ngtsc::metadata::*;
    use crate::ngtsc::partial_evaluator::{MetadataValue, PartialEvaluator};
    use crate::ngtsc::program::InMemoryProgram;
    use crate::ngtsc::reflection::{DeclarationClassifier, ProgramReflectionHost};
    use crate::ngtsc::resource::{InMemoryResourceResolver, ResourceCache};
    use std::rc::Rc;
    use ts::Program;

    const CORE: (&str, &str) = (
        "/node_modules/@angular/core/index.ts",
        "export declare const ANALYZE_FOR_ENTRY_COMPONENTS: any;\nexport function forwardRef(fn) { return fn; }",
    );

    /// Runs `check` with a resolver over a program whose first file is `source`.
    fn with_resolver(
        source: &str,
        resources: InMemoryResourceResolver,
        check: impl for<'p> FnOnce(
            &MetadataResolver<'p>,
            &[crate::ngtsc::reflection::Classification],
            &'p ts::SourceFile,
        ),
    ) {
        let program = InMemoryProgram::from_sources([("/app/test.ts", source), CORE]).unwrap();
        let registry = ReferenceRegistry::new();
        let host = ProgramReflectionHost::new(&program);
        let evaluator = PartialEvaluator::new(&host, &registry);
        let cache = ResourceCache::new(Rc::new(resources));
        let logger = NullLogger::new();
        let resolver = MetadataResolver::new(&evaluator, &cache, &logger);
        let file = &program.source_files()[0];
        let classifications = DeclarationClassifier::default().classify_file(file);
        check(&resolver, &classifications, file);
    }

    fn codes(diagnostics: &[crate::ngtsc::diagnostics::Diagnostic]) -> Vec<ErrorCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    mod directive_tests {
        use super::*;

        #[test]
        fn should_keep_non_resolved_metadata_and_load_resources() {
            let resources = InMemoryResourceResolver::new()
                .with("/app/main.component.html", "<h1>main</h1>")
                .with("/app/styles/main.css", "h1 {}");
            with_resolver(
                r#"
import { Component } from '@angular/core';
@Component({
  selector: 'main-component',
  templateUrl: './main.component.html',
  styles: ['p {}'],
  styleUrls: ['./styles/main.css'],
  inputs: ['value'],
  host: { '(click)': 'onClick()' },
})
export class MainComponent {}
"#,
                resources,
                |resolver, classifications, file| {
                    let reference = resolver.evaluator().registry().intern(&file.file_name, "MainComponent", classifications[0].span);
                    let dir = resolver.resolve_directive(&classifications[0], file, reference);
                    assert!(dir.is_component());
                    assert_eq!(dir.non_resolved_metadata().selector.as_deref(), Some("main-component"));
                    assert_eq!(dir.metadata.template_url.as_deref(), Some("./main.component.html"));
                    assert_eq!(dir.metadata.inputs, vec!["value".to_string()]);
                    assert_eq!(dir.metadata.host.get("(click)").map(String::as_str), Some("onClick()"));
                    let template = dir.template.as_ref().unwrap();
                    assert_eq!(template.template.as_deref(), Some("<h1>main</h1>"));
                    assert_eq!(template.styles, vec!["p {}".to_string(), "h1 {}".to_string()]);
                    assert!(dir.diagnostics.is_empty(), "{:?}", dir.diagnostics);
                },
            );
        }

        #[test]
        fn should_degrade_when_selector_or_template_is_missing() {
            with_resolver(
                r#"
@Component({ templateUrl: './missing.html' })
export class Broken {}
@Directive({})
export class NoSelector {}
"#,
                InMemoryResourceResolver::new(),
                |resolver, classifications, file| {
                    let registry = resolver.evaluator().registry();
                    let broken = resolver.resolve_directive(
                        &classifications[0],
                        file,
                        registry.intern(&file.file_name, "Broken", classifications[0].span),
                    );
                    assert!(broken.has_errors());
                    assert_eq!(
                        codes(&broken.diagnostics),
                        vec![ErrorCode::DirectiveMissingSelector, ErrorCode::ComponentResourceNotFound]
                    );
                    assert_eq!(broken.template.as_ref().unwrap().template, None);

                    let plain = resolver.resolve_directive(
                        &classifications[1],
                        file,
                        registry.intern(&file.file_name, "NoSelector", classifications[1].span),
                    );
                    assert!(!plain.is_component());
                    assert!(plain.template.is_none());
                    assert_eq!(codes(&plain.diagnostics), vec![ErrorCode::DirectiveMissingSelector]);
                },
            );
        }

        #[test]
        fn should_require_exactly_one_template_source() {
            with_resolver(
                "@Component({ selector: 'x', template: '', templateUrl: './x.html' })\nexport class Both {}\n@Component({ selector: 'y' })\nexport class Neither {}",
                InMemoryResourceResolver::new(),
                |resolver, classifications, file| {
                    let registry = resolver.evaluator().registry();
                    for (classification, name) in classifications.iter().zip(["Both", "Neither"]) {
                        let reference = registry.intern(&file.file_name, name, classification.span);
                        let dir = resolver.resolve_directive(classification, file, reference);
                        assert_eq!(codes(&dir.diagnostics), vec![ErrorCode::ComponentMissingTemplate]);
                    }
                },
            );
        }
    }

    mod pipe_tests {
        use super::*;

        #[test]
        fn should_default_purity_and_validate_types() {
            with_resolver(
                "@Pipe({ name: 'decimal' })\nexport class DecimalPipe {}\n@Pipe({ pure: 'no' })\nexport class BadPipe {}",
                InMemoryResourceResolver::new(),
                |resolver, classifications, file| {
                    let registry = resolver.evaluator().registry();
                    let decimal = resolver.resolve_pipe(
                        &classifications[0],
                        file,
                        registry.intern(&file.file_name, "DecimalPipe", classifications[0].span),
                    );
                    assert_eq!(decimal.name, "decimal");
                    assert!(decimal.pure);
                    assert!(!decimal.has_errors());

                    let bad = resolver.resolve_pipe(
                        &classifications[1],
                        file,
                        registry.intern(&file.file_name, "BadPipe", classifications[1].span),
                    );
                    assert_eq!(bad.name, "BadPipe");
                    assert!(bad.pure);
                    assert_eq!(
                        codes(&bad.diagnostics),
                        vec![ErrorCode::PipeMissingName, ErrorCode::ValueHasWrongType]
                    );
                },
            );
        }
    }

    mod provider_tests {
        use super::*;

        #[test]
        fn should_read_provider_strategies_in_source_order() {
            with_resolver(
                r#"
import { ANALYZE_FOR_ENTRY_COMPONENTS, forwardRef } from '@angular/core';
export class Service {}
export class Other {}
@Directive({
  selector: '[x]',
  providers: [
    Service,
    [{ provide: Other, useExisting: forwardRef(() => Service) }],
    { provide: ANALYZE_FOR_ENTRY_COMPONENTS, useValue: [{ path: 'a' }], multi: true },
    { provide: 'both', useValue: 1, useClass: Service },
    { provide: 'none' },
    42,
  ],
})
export class WithProviders {}
"#,
                InMemoryResourceResolver::new(),
                |resolver, classifications, file| {
                    let reference = resolver.evaluator().registry().intern(&file.file_name, "WithProviders", classifications[0].span);
                    let dir = resolver.resolve_directive(&classifications[0], file, reference);
                    let providers = &dir.metadata.providers;
                    assert_eq!(providers.len(), 5);

                    assert_eq!(providers[0].strategy, Some(ProviderStrategy::Class));
                    assert_eq!(providers[0].token_name(), Some("Service"));

                    match &providers[1].strategy {
                        Some(ProviderStrategy::UseExisting(MetadataValue::Reference(target))) => {
                            assert_eq!(target.name(), "Service")
                        }
                        other => panic!("unexpected strategy {:?}", other),
                    }

                    assert_eq!(providers[2].token_name(), Some("ANALYZE_FOR_ENTRY_COMPONENTS"));
                    assert!(providers[2].multi);
                    let routes = providers[2].use_value().unwrap();
                    assert_eq!(routes.as_array().unwrap()[0].get_property("path").and_then(|p| p.as_str()), Some("a"));

                    assert_eq!(providers[3].use_value(), Some(&MetadataValue::Number(1.0)));
                    assert_eq!(codes(&providers[3].diagnostics), vec![ErrorCode::ProviderStrategyConflict]);

                    assert_eq!(providers[4].strategy, None);
                    assert_eq!(codes(&providers[4].diagnostics), vec![ErrorCode::ProviderMissingStrategy]);

                    assert_eq!(codes(&dir.diagnostics), vec![ErrorCode::ValueHasWrongType]);
                },
            );
        }

        #[test]
        fn should_serialize_providers_with_their_strategy_key() {
            let provider = ProviderDescriptor {
                token: MetadataValue::from("token"),
                strategy: Some(ProviderStrategy::UseValue(MetadataValue::Array(vec![MetadataValue::from("a")]))),
                multi: true,
                diagnostics: Vec::new(),
            };
            assert_eq!(
                serde_json::to_value(&provider).unwrap(),
                serde_json::json!({ "token": "token", "useValue": ["a"], "multi": true })
            );
        }
    }

    mod injectable_tests {
        use super::*;

        #[test]
        fn should_read_provided_in_and_configuration() {
            with_resolver(
                "@Injectable({ providedIn: 'root' })\nexport class RootService {}\n@Injectable({ useFactory: factory, deps: [RootService] })\nexport class Built {}\nexport function factory() { return 1; }\n@Injectable()\nexport class Bare {}",
                InMemoryResourceResolver::new(),
                |resolver, classifications, file| {
                    let registry = resolver.evaluator().registry();
                    let names = ["RootService", "Built", "Bare"];
                    let descriptors: Vec<_> = classifications
                        .iter()
                        .zip(names)
                        .map(|(c, name)| resolver.resolve_injectable(c, file, registry.intern(&file.file_name, name, c.span)))
                        .collect();

                    assert_eq!(descriptors[0].provided_in, Some(MetadataValue::from("root")));
                    assert!(descriptors[0].provider.is_none());

                    let built = descriptors[1].provider.as_ref().unwrap();
                    assert_eq!(built.token_name(), Some("Built"));
                    match &built.strategy {
                        Some(ProviderStrategy::UseFactory { factory, deps }) => {
                            assert_eq!(factory.as_reference().unwrap().name(), "factory");
                            assert_eq!(deps[0].as_reference().unwrap().name(), "RootService");
                        }
                        other => panic!("unexpected strategy {:?}", other),
                    }

                    assert!(descriptors[2].provided_in.is_none());
                    assert!(descriptors[2].diagnostics.is_empty());
                },
            );
        }
    }

    mod ng_module_tests {
        use super::*;

        #[test]
        fn should_flatten_lists_and_report_invalid_shapes() {
            with_resolver(
                r#"
import { forwardRef } from '@angular/core';
export class A {}
export class B {}
const SHARED = [A, [B]];
let dynamic = [];
@NgModule({
  declarations: [...SHARED, forwardRef(() => Later)],
  imports: 'CommonModule',
  exports: [dynamic],
  providers: [A],
})
export class AppModule {}
export class Later {}
"#,
                InMemoryResourceResolver::new(),
                |resolver, classifications, file| {
                    let reference = resolver.evaluator().registry().intern(&file.file_name, "AppModule", classifications[0].span);
                    let module = resolver.resolve_ng_module(&classifications[0], file, &reference);
                    let names: Vec<_> = module
                        .declarations
                        .iter()
                        .filter_map(|d| d.as_reference().map(|r| r.name().to_string()))
                        .collect();
                    assert_eq!(names, vec!["A", "B", "Later"]);
                    assert!(module.imports.is_empty());
                    assert_eq!(module.exports.len(), 1);
                    assert!(module.exports[0].is_unresolvable());
                    assert_eq!(module.providers.len(), 1);
                    assert_eq!(
                        codes(&module.diagnostics),
                        vec![ErrorCode::NgmoduleInvalidImport, ErrorCode::ValueNotLiteral]
                    );
                },
            );
        }
    }
}
