// Diagnostics Tests

#[cfg(test)]
mod tests {
    use crate::ngtsc::diagnostics::*;
    use ts::Span;

    mod error_code_tests {
        use super::*;

        #[test]
        fn should_prefix_angular_codes() {
            assert_eq!(ng_error_code(ErrorCode::DecoratorArgNotLiteral), -991001);
            assert_eq!(ErrorCode::PipeMissingName.to_string(), "NG2002");
        }
    }

    mod diagnostic_tests {
        use super::*;

        #[test]
        fn should_format_diagnostic_with_location() {
            let diag = Diagnostic::error(
                DiagnosticKind::Validation,
                ErrorCode::DirectiveMissingSelector,
                "Directive MainDirective has no selector",
                "/app/main.directive.ts",
                Span::new(42, 80),
            );
            assert!(diag.is_error());
            assert_eq!(
                diag.to_string(),
                "/app/main.directive.ts:42 - error NG2004: Directive MainDirective has no selector"
            );
        }

        #[test]
        fn should_create_warnings() {
            let diag = Diagnostic::warning(
                DiagnosticKind::Validation,
                ErrorCode::NgmoduleInvalidLazyRoute,
                "Lazy route './missing#Nope' of AppModule cannot be resolved",
                "/app/a.ts",
                Span::default(),
            );
            assert!(!diag.is_error());
            assert_eq!(diag.kind, DiagnosticKind::Validation);
        }
    }

    mod context_error_tests {
        use super::*;

        #[test]
        fn should_classify_query_errors() {
            let ambiguous = ContextError::AmbiguousRootModule {
                candidates: vec!["AppModule".into(), "OtherModule".into()],
            };
            assert_eq!(ambiguous.kind(), DiagnosticKind::Resolution);
            assert_eq!(ambiguous.code(), ErrorCode::RootModuleAmbiguous);
            assert_eq!(
                ambiguous.to_string(),
                "ambiguous root module, candidates are: AppModule, OtherModule"
            );

            let missing = ContextError::FileNotFound("/app/x.ts".into());
            assert_eq!(missing.kind(), DiagnosticKind::NotFound);
        }
    }
}
