use once_cell::sync::Lazy;
use regex::Regex;

static TS_DTS_JS_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.d\.ts$|\.ts$|\.js$").expect("valid extension pattern"));

/// Extensions tried, in order, when a module specifier omits one.
pub const RESOLVABLE_EXTENSIONS: &[&str] = &[".ts", ".d.ts", "/index.ts", "/index.d.ts"];

/// Convert Windows-style separators to POSIX separators.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Remove a .ts, .d.ts, or .js extension from a file name.
pub fn strip_extension(path: &str) -> String {
    TS_DTS_JS_EXTENSION.replace(path, "").to_string()
}

/// Collapse `.` and `..` segments and duplicate separators.
pub fn clean_path(path: &str) -> String {
    let normalized = normalize_separators(path);
    let is_absolute = normalized.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in normalized.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().map_or(false, |s| *s != "..") {
                    segments.pop();
                } else if !is_absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if is_absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Directory part of a file name (`/app/a.ts` -> `/app`).
pub fn dirname(path: &str) -> String {
    let normalized = normalize_separators(path);
    match normalized.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => normalized[..idx].to_string(),
        None => ".".to_string(),
    }
}

/// Join `relative` onto `base` unless `relative` is already absolute.
pub fn join(base: &str, relative: &str) -> String {
    let relative = normalize_separators(relative);
    if relative.starts_with('/') {
        return clean_path(&relative);
    }
    clean_path(&format!("{}/{}", base, relative))
}

/// Resolve a path written inside `containing_file` (a resource URL or a
/// relative module specifier) against that file's directory.
pub fn resolve_relative_to_file(containing_file: &str, path: &str) -> String {
    join(&dirname(containing_file), path)
}

/// `./x` and `../x` specifiers are relative; everything else is bare.
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// File names a specifier-derived path may refer to, most specific first.
pub fn candidate_file_names(path: &str) -> Vec<String> {
    let base = clean_path(path);
    let mut candidates = vec![base.clone()];
    let stripped = strip_extension(&base);
    for ext in RESOLVABLE_EXTENSIONS {
        candidates.push(format!("{}{}", stripped, ext));
    }
    candidates.dedup();
    candidates
}
