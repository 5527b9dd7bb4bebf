//! JSON pointers (RFC 6901) used as stable identifiers for locations in a
//! document.

/// Escape a single segment: `~` becomes `~0`, `/` becomes `~1`.
pub fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Reverse of [`escape`].
pub fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Compile path segments into a pointer string.
///
/// `["paths", "/pets/{id}", "get"]` compiles to `/paths/~1pets~1{id}/get`.
pub fn compile<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut pointer = String::new();
    for segment in segments {
        pointer.push('/');
        pointer.push_str(&escape(segment.as_ref()));
    }
    pointer
}

/// Split a pointer back into unescaped segments. A leading `#` (as found in
/// `$ref` values) is ignored.
pub fn parse(pointer: &str) -> Vec<String> {
    let pointer = pointer.strip_prefix('#').unwrap_or(pointer);
    if pointer.is_empty() {
        return Vec::new();
    }
    pointer
        .strip_prefix('/')
        .unwrap_or(pointer)
        .split('/')
        .map(unescape)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_operation_pointer() {
        assert_eq!(
            compile(["paths", "/pets/{id}", "get"]),
            "/paths/~1pets~1{id}/get"
        );
    }

    #[test]
    fn test_compile_escapes_tilde_before_slash() {
        assert_eq!(compile(["a~/b"]), "/a~0~1b");
    }

    #[test]
    fn test_compile_empty() {
        assert_eq!(compile(Vec::<String>::new()), "");
    }

    #[test]
    fn test_compile_is_deterministic() {
        let segments = ["paths", "/users/{userId}/messages", "post"];
        assert_eq!(compile(segments), compile(segments));
    }

    #[test]
    fn test_parse_ref() {
        assert_eq!(
            parse("#/components/parameters/limit"),
            vec!["components", "parameters", "limit"]
        );
        assert_eq!(parse("/paths/~1pets~1{id}/get")[1], "/pets/{id}");
        assert!(parse("#").is_empty());
    }

    #[test]
    fn test_unescape_order() {
        // "~01" is an escaped "~" followed by a literal "1", not a slash
        assert_eq!(unescape("~01"), "~1");
    }
}
