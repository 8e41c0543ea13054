use once_cell::sync::Lazy;
use regex::Regex;

use crate::report::finding::Finding;

/// `Line 5: ...`, `Lines 5-7: ...`, `Lines 5, 9: ...`
static FINDING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^Lines?\s+\d+(?:\s*[-–—,]\s*\d+)*\s*:\s*(\S.*)$").expect("valid regex")
});

/// Description must separate cause from fix with an em/en dash, or with an
/// ASCII hyphen surrounded by whitespace (so `use-after-free` does not count).
static DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S\s*[—–]|\S\s+-{1,2}\s+\S").expect("valid regex"));

/// Report headers echoed back by the model
static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#+\s*analyzer\b").expect("valid regex"));

/// Whether a single trimmed line is a well-formed finding
pub fn is_finding(line: &str) -> bool {
    FINDING_LINE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .is_some_and(|desc| DESCRIPTION.is_match(desc.as_str()))
}

/// Extract the findings from raw model output.
///
/// Anything that does not match the finding grammar exactly (prose,
/// echoed code, markdown, the no-issues sentinel) is dropped.
pub fn parse_response(raw: &str) -> Vec<Finding> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !HEADER_LINE.is_match(line))
        .filter(|line| is_finding(line))
        .map(Finding::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(raw: &str) -> Vec<String> {
        parse_response(raw)
            .into_iter()
            .map(|f| f.as_str().to_string())
            .collect()
    }

    #[test]
    fn accepts_single_and_ranged_findings() {
        assert!(is_finding(
            "Line 5: Buffer Overflow — unchecked strcpy — FIX: use strncpy"
        ));
        assert!(is_finding(
            "Lines 12-14: Use After Free – pointer reused after free – FIX: null it"
        ));
        assert!(is_finding(
            "Lines 3, 9: Integer Overflow - size * count wraps - FIX: check bounds"
        ));
        assert!(is_finding(
            "Line 5: Buffer Overflow—unchecked strcpy—FIX: use strncpy"
        ));
        assert!(is_finding("Line 6: Double Free –free twice– FIX: track ownership"));
        assert!(is_finding("Line 7 : Format String — printf(buf) — FIX: printf(\"%s\", buf)"));
    }

    #[test]
    fn rejects_malformed_lines() {
        // no line number
        assert!(!is_finding("Buffer Overflow — strcpy — FIX: strncpy"));
        // no colon
        assert!(!is_finding("Line 5 Buffer Overflow — strcpy — FIX: strncpy"));
        // no separator in description
        assert!(!is_finding("Line 5: looks fine to me"));
        // hyphen inside a word is not a separator
        assert!(!is_finding("Line 5: use-after-free"));
        // empty description
        assert!(!is_finding("Line 5:"));
        // bullets and markdown are not accepted
        assert!(!is_finding("- Line 5: Overflow — strcpy — FIX: strncpy"));
        assert!(!is_finding("**Line 5**: Overflow — strcpy — FIX: strncpy"));
        assert!(!is_finding("# analyzer main.c"));
    }

    #[test]
    fn filters_noise_from_raw_output() {
        let raw = "\
# analyzer main.c

Here is my analysis:
    char buf[16];
  Line 4: Buffer Overflow — strcpy into fixed buffer — FIX: use strncpy
No vulnerabilities found.
Line 9: Command Injection — system() with user input — FIX: use execve
```
";
        assert_eq!(
            texts(raw),
            vec![
                "Line 4: Buffer Overflow — strcpy into fixed buffer — FIX: use strncpy",
                "Line 9: Command Injection — system() with user input — FIX: use execve",
            ]
        );
    }

    #[test]
    fn sentinel_only_yields_nothing() {
        assert!(parse_response("No vulnerabilities found.\n").is_empty());
        assert!(parse_response("").is_empty());
    }

    #[test]
    fn parsing_is_repeatable() {
        let raw = "Line 2: A — b — FIX: c\nnoise\nLine 1: D — e — FIX: f\nLine 2: A — b — FIX: c";
        assert_eq!(parse_response(raw), parse_response(raw));
        assert_eq!(parse_response(raw).len(), 3);
    }
}
