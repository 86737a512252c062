//! Identifier naming rules shared by the graph and the bundle engine.

/// Identifier used for the package itself (package docs / package clause)
pub const PACKAGE_IDENTIFIER: &str = "package";

/// Exported identifiers start with an uppercase letter.
///
/// Methods are named `Receiver.Member`; both halves must be exported for the
/// method to be reachable from outside the package.
#[must_use]
pub fn is_exported_identifier(id: &str) -> bool {
    match id.split_once('.') {
        Some((receiver, member)) => starts_uppercase(receiver) && starts_uppercase(member),
        None => starts_uppercase(id),
    }
}

/// Blank and `init` declarations cannot be referenced by name, so the front
/// end gives them positional ids (`_:file.go:12`, `init:file.go:40`).
#[must_use]
pub fn is_ambiguous_identifier(id: &str) -> bool {
    id == "_" || id == "init" || id.starts_with("_:") || id.starts_with("init:")
}

/// Test harness entry points: `TestX`, `BenchmarkX`, `FuzzX`, `ExampleX`.
#[must_use]
pub fn is_test_function(id: &str) -> bool {
    const PREFIXES: [&str; 4] = ["Test", "Benchmark", "Fuzz", "Example"];

    PREFIXES.iter().any(|prefix| {
        id.strip_prefix(prefix).is_some_and(|rest| {
            // `Testing` is not a test; `Test`, `Test_x` and `TestX` are.
            rest.chars()
                .next()
                .map_or(true, |c| !c.is_lowercase())
        })
    })
}

fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exported_plain() {
        assert!(is_exported_identifier("Parse"));
        assert!(!is_exported_identifier("parse"));
        assert!(!is_exported_identifier("_"));
        assert!(!is_exported_identifier(""));
    }

    #[test]
    fn test_exported_methods() {
        assert!(is_exported_identifier("Reader.Read"));
        assert!(!is_exported_identifier("reader.Read"));
        assert!(!is_exported_identifier("Reader.read"));
    }

    #[test]
    fn test_ambiguous() {
        assert!(is_ambiguous_identifier("_"));
        assert!(is_ambiguous_identifier("_:vars.go:12"));
        assert!(is_ambiguous_identifier("init:main.go:40"));
        assert!(!is_ambiguous_identifier("initialize"));
        assert!(!is_ambiguous_identifier("_private"));
    }

    #[test]
    fn test_test_functions() {
        assert!(is_test_function("TestParse"));
        assert!(is_test_function("Test_parse"));
        assert!(is_test_function("BenchmarkParse"));
        assert!(is_test_function("ExampleParse"));
        assert!(is_test_function("FuzzParse"));
        assert!(!is_test_function("Testing"));
        assert!(!is_test_function("parse"));
    }
}
