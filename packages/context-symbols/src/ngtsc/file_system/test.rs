// File System Tests
//
// Tests for the path helpers.

#[cfg(test)]
mod tests {
    use crate::ngtsc::file_system::*;

    mod util_tests {
        use super::*;

        #[test]
        fn should_strip_typescript_extensions() {
            assert_eq!(strip_extension("/app/app.module.ts"), "/app/app.module");
            assert_eq!(strip_extension("/lib/index.d.ts"), "/lib/index");
            assert_eq!(strip_extension("/lib/index.js"), "/lib/index");
            assert_eq!(strip_extension("/lib/index"), "/lib/index");
        }

        #[test]
        fn should_clean_paths() {
            assert_eq!(clean_path("/app/./a/../b.ts"), "/app/b.ts");
            assert_eq!(clean_path("C:\\app\\b.ts"), "C:/app/b.ts");
            assert_eq!(clean_path("../x/./y"), "../x/y");
            assert_eq!(clean_path("//app//b.ts"), "/app/b.ts");
        }

        #[test]
        fn should_resolve_relative_to_file() {
            assert_eq!(
                resolve_relative_to_file("/app/main.component.ts", "./main.component.html"),
                "/app/main.component.html"
            );
            assert_eq!(
                resolve_relative_to_file("/app/lazy/lazy.module.ts", "../shared/x.ts"),
                "/app/shared/x.ts"
            );
            assert_eq!(resolve_relative_to_file("/app/a.ts", "/abs/t.html"), "/abs/t.html");
        }

        #[test]
        fn should_distinguish_relative_specifiers() {
            assert!(is_relative_specifier("./app.module"));
            assert!(is_relative_specifier("../core"));
            assert!(!is_relative_specifier("@angular/core"));
            assert!(!is_relative_specifier("rxjs"));
        }

        #[test]
        fn should_list_candidate_file_names() {
            let candidates = candidate_file_names("/app/lazy-a/lazy-a.module");
            assert_eq!(candidates[0], "/app/lazy-a/lazy-a.module");
            assert!(candidates.contains(&"/app/lazy-a/lazy-a.module.ts".to_string()));
            assert!(candidates.contains(&"/app/lazy-a/lazy-a.module/index.ts".to_string()));
        }
    }
}
