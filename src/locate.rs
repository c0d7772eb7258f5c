//! Brace-balanced construct range finder.
//!
//! Locates the line extent of a brace-delimited construct (typically a
//! function body) starting from a textual signature. The scan counts raw
//! `{` and `}` characters per line; it has no notion of string literals or
//! comments, so a brace inside either is counted like any other. That is an
//! accepted limitation of the whole tool, not something this module tries
//! to paper over.

/// A `[start, end)` line-index range describing a construct's extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First line of the construct (inclusive).
    pub start: usize,
    /// One past the last line of the construct (exclusive).
    pub end: usize,
}

impl Span {
    /// Number of lines covered by the span.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true when the span covers no lines.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Find the construct beginning at `signature`, scanning from `start_index`.
///
/// The scan becomes active at the first line containing `signature`. Once
/// active, a running balance of opening minus closing braces is accumulated
/// across every scanned line, the signature line included. The construct is
/// complete the moment the balance is exactly zero while active; the
/// returned span starts at `start_index` and ends one past the closing
/// line.
///
/// A signature line carrying no brace at all closes immediately as a
/// one-line span, since the balance is already zero there.
///
/// Returns `None` when the signature never appears at or after
/// `start_index`, or when the balance never returns to zero before the
/// document ends. Absence is explicit: callers decide whether a missing
/// construct is acceptable.
pub fn find_construct(lines: &[String], start_index: usize, signature: &str) -> Option<Span> {
    let mut active = false;
    let mut balance: i64 = 0;

    for (i, line) in lines.iter().enumerate().skip(start_index) {
        if line.contains(signature) {
            active = true;
        }

        if active {
            balance += line.matches('{').count() as i64;
            balance -= line.matches('}').count() as i64;

            if balance == 0 {
                return Some(Span {
                    start: start_index,
                    end: i + 1,
                });
            }
        }
    }

    None
}

/// Like [`find_construct`], with the reference fallback for absence.
///
/// When the construct cannot be delimited, returns the trivial one-line
/// span `[start_index, start_index + 1)` instead of `None`. Callers must
/// treat that fallback as "construct not found" and do nothing destructive
/// with it.
pub fn find_construct_range(lines: &[String], start_index: usize, signature: &str) -> Span {
    find_construct(lines, start_index, signature).unwrap_or(Span {
        start: start_index,
        end: start_index + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_single_function_span() {
        let lines = doc(&["function f() {\n", "  x = 1;\n", "}\n"]);
        let span = find_construct_range(&lines, 0, "f()");
        assert_eq!(span, Span { start: 0, end: 3 });
    }

    #[test]
    fn test_absent_signature_is_none() {
        let lines = doc(&["function f() {\n", "  x = 1;\n", "}\n"]);
        assert_eq!(find_construct(&lines, 0, "g()"), None);
    }

    #[test]
    fn test_absent_signature_fallback_span() {
        let lines = doc(&["function f() {\n", "  x = 1;\n", "}\n"]);
        let span = find_construct_range(&lines, 0, "g()");
        assert_eq!(span, Span { start: 0, end: 1 });
    }

    #[test]
    fn test_nested_braces() {
        let lines = doc(&[
            "function outer() {\n",
            "  if (a) {\n",
            "    b();\n",
            "  }\n",
            "  return c;\n",
            "}\n",
            "function next() {\n",
            "}\n",
        ]);
        let span = find_construct_range(&lines, 0, "outer()");
        assert_eq!(span, Span { start: 0, end: 6 });
    }

    #[test]
    fn test_unbalanced_braces_never_close() {
        let lines = doc(&["function f() {\n", "  x = 1;\n"]);
        assert_eq!(find_construct(&lines, 0, "f()"), None);
        let span = find_construct_range(&lines, 0, "f()");
        assert_eq!(span, Span { start: 0, end: 1 });
    }

    #[test]
    fn test_scan_starts_at_given_index() {
        let lines = doc(&[
            "function f() {\n",
            "}\n",
            "function f() {\n",
            "  y = 2;\n",
            "}\n",
        ]);
        let span = find_construct_range(&lines, 2, "f()");
        assert_eq!(span, Span { start: 2, end: 5 });
    }

    #[test]
    fn test_signature_line_without_brace_closes_immediately() {
        // Balance is already zero on the signature line, so the span is a
        // single line. Mirrors the reference behavior.
        let lines = doc(&["function f()\n", "{\n", "}\n"]);
        let span = find_construct_range(&lines, 0, "f()");
        assert_eq!(span, Span { start: 0, end: 1 });
    }

    #[test]
    fn test_open_and_close_on_one_line() {
        let lines = doc(&["function f() { return 1; }\n", "rest\n"]);
        let span = find_construct_range(&lines, 0, "f()");
        assert_eq!(span, Span { start: 0, end: 1 });
    }

    #[test]
    fn test_closing_line_brings_balance_to_zero() {
        let lines = doc(&[
            "prefix\n",
            "function f() {\n",
            "  a = { b: 1 };\n",
            "  c = {\n",
            "  };\n",
            "}\n",
            "suffix\n",
        ]);
        let span = find_construct_range(&lines, 0, "f()");
        // Cumulative balance: 0, +1, +1, +2, +1, 0 -> closes at line 5.
        assert_eq!(span, Span { start: 0, end: 6 });
    }
}
