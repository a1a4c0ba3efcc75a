// Resource Tests

#[cfg(test)]
mod tests {
    use crate::ngtsc::resource::*;
    use std::cell::Cell;
    use std::rc::Rc;

    mod in_memory_resolver_tests {
        use super::*;

        #[test]
        fn should_resolve_added_resources_by_clean_path() {
            let resolver = InMemoryResourceResolver::new().with("/app/./main.html", "<div>Hello</div>");
            assert!(resolver.contains("/app/main.html"));
            assert_eq!(resolver.resolve("/app/x/../main.html").unwrap(), "<div>Hello</div>");
        }

        #[test]
        fn should_return_not_found_for_missing_resource() {
            let err = InMemoryResourceResolver::new().resolve("/app/missing.html").unwrap_err();
            assert_eq!(err, ResourceError::not_found("/app/missing.html"));
            assert_eq!(err.path(), "/app/missing.html");
            assert!(err.to_string().contains("not found"));
        }
    }

    mod file_resolver_tests {
        use super::*;

        #[test]
        fn should_read_relative_paths_below_root() {
            let dir = std::env::temp_dir().join("context_symbols_resource_test");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("style.css"), "body { margin: 0; }").unwrap();

            let resolver = FileResourceResolver::new(&dir);
            assert_eq!(resolver.resolve("style.css").unwrap(), "body { margin: 0; }");
            let absolute = dir.join("style.css");
            assert!(resolver.resolve(&absolute.to_string_lossy()).is_ok());
            assert!(matches!(
                resolver.resolve("nope.css"),
                Err(ResourceError::NotFound { .. })
            ));
        }
    }

    mod cache_tests {
        use super::*;

        struct CountingResolver {
            inner: InMemoryResourceResolver,
            calls: Rc<Cell<usize>>,
        }

        impl ResourceResolver for CountingResolver {
            fn resolve(&self, path: &str) -> Result<String, ResourceError> {
                self.calls.set(self.calls.get() + 1);
                self.inner.resolve(path)
            }
        }

        #[test]
        fn should_call_resolver_once_per_distinct_path() {
            let calls = Rc::new(Cell::new(0));
            let cache = ResourceCache::new(Rc::new(CountingResolver {
                inner: InMemoryResourceResolver::new().with("/app/a.html", "a"),
                calls: calls.clone(),
            }));

            assert_eq!(cache.load("/app/a.html").unwrap(), "a");
            assert_eq!(cache.load("/app/./a.html").unwrap(), "a");
            assert!(cache.load("/app/b.html").is_err());
            assert!(cache.load("/app/b.html").is_err());

            assert_eq!(calls.get(), 2);
            assert_eq!(cache.len(), 2);
        }
    }
}
