const STACK_TRACE_PREFIXES: &[&str] = &["at "];

/// Normalizes line endings, trims the text and splits it into lines.
pub fn to_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .split('\n')
        .map(String::from)
        .collect()
}

/// Splits a `<failure>`/`<error>` payload into the exception message followed by its frames.
///
/// The first line is kept as is. Every following line is trimmed and loses a leading
/// `at ` prefix.
pub fn extract_stack_trace(text: &str) -> Vec<String> {
    let mut lines = to_lines(text);
    for line in lines.iter_mut().skip(1) {
        let trimmed = line.trim();
        let frame = STACK_TRACE_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
            .unwrap_or(trimmed);
        *line = String::from(frame);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_message_and_frames() {
        let payload = "java.lang.AssertionError: x\n\tat A.m(A.java:1)\n\tat B.m(B.java:2)";
        assert_eq!(
            extract_stack_trace(payload),
            vec![
                "java.lang.AssertionError: x",
                "A.m(A.java:1)",
                "B.m(B.java:2)"
            ]
        );
    }

    #[test]
    fn normalizes_line_endings() {
        assert_eq!(to_lines("a\r\nb\rc\n"), vec!["a", "b", "c"]);
    }

    #[test]
    fn trims_outer_whitespace_before_splitting() {
        let payload = "\n\n   java.lang.IllegalStateException: boom  \r\n     at C.run(C.java:9)\n\n";
        assert_eq!(
            extract_stack_trace(payload),
            vec!["java.lang.IllegalStateException: boom", "C.run(C.java:9)"]
        );
    }

    #[test]
    fn keeps_first_line_verbatim() {
        assert_eq!(
            extract_stack_trace("at the start\nat x.y(Z.java:3)"),
            vec!["at the start", "x.y(Z.java:3)"]
        );
    }

    #[test]
    fn keeps_frames_without_prefix_and_blank_lines() {
        assert_eq!(
            extract_stack_trace("msg\n\n  ... 3 more\nCaused by: E"),
            vec!["msg", "", "... 3 more", "Caused by: E"]
        );
    }

    #[test]
    fn empty_payload_yields_single_empty_line() {
        assert_eq!(extract_stack_trace("  \n\t "), vec![""]);
    }
}
