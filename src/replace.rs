//! Safe construct replacement over an immutable scan snapshot.
//!
//! The replacer scans the document for lines whose trimmed content starts
//! with an accepted form of the target signature, delimits each matched
//! construct with the same brace-balance walk as [`crate::locate`], and
//! substitutes the span with the replacement template re-indented to the
//! matched line's own indentation.
//!
//! Edits are planned against the original line indices and applied from the
//! end backward, so earlier edits' index shifts never affect later ones.
//! The scan cursor jumps past each matched span, which is exactly where the
//! reference mutate-and-rescan cursor lands once the span has collapsed
//! into one line.

use crate::document::Document;
use crate::locate::Span;

/// A planned single-span edit: replace `span` with the re-indented text.
#[derive(Debug, Clone)]
pub struct Edit {
    /// Line range to replace, in original document indices.
    pub span: Span,
    /// Joined replacement text, already re-indented, without a trailing
    /// newline.
    pub text: String,
}

/// Prefix rule for matching a construct's first line.
///
/// The trimmed line must start with `target` itself or with its
/// `async `-qualified form, and the raw line must contain `target`. This is
/// a deliberately ad hoc textual match; it can over-match (a comment
/// mentioning the name at the start of a line) and under-match (differently
/// formatted declarations).
pub fn matches_target(line: &str, target: &str) -> bool {
    let trimmed = line.trim();
    line.contains(target)
        && (trimmed.starts_with(target)
            || trimmed
                .strip_prefix("async ")
                .is_some_and(|rest| rest.starts_with(target)))
}

/// Re-indent a replacement template by `indent` spaces.
///
/// Every line with non-blank content gets the prefix; blank and
/// whitespace-only lines pass through unchanged. Lines are joined with
/// embedded newlines into one string.
pub fn reindent(template: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    template
        .split('\n')
        .map(|l| {
            if l.trim().is_empty() {
                l.to_string()
            } else {
                format!("{}{}", pad, l)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Plan every replacement of `target` against an immutable line snapshot.
///
/// Scanning starts at the top. At each matching line the construct end is
/// derived inline: brace accumulation activates at the first line from the
/// match onward that contains a brace character, and stops when the balance
/// returns to zero. If it never does, the edit covers the matched line
/// alone. The cursor then continues at the first line past the span, so the
/// planned edits never overlap.
pub fn plan_replacements(lines: &[String], target: &str, template: &str) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        if !matches_target(line, target) {
            i += 1;
            continue;
        }

        let mut end = i + 1;
        let mut balance: i64 = 0;

        for (j, candidate) in lines.iter().enumerate().skip(i) {
            let opens = candidate.matches('{').count() as i64;
            let closes = candidate.matches('}').count() as i64;
            if opens == 0 && closes == 0 {
                continue;
            }

            balance += opens - closes;
            if balance == 0 {
                end = j + 1;
                break;
            }
        }

        let indent = line.chars().take_while(|c| c.is_whitespace()).count();
        edits.push(Edit {
            span: Span { start: i, end },
            text: reindent(template, indent),
        });

        i = end;
    }

    edits
}

/// Apply planned edits to the document, last edit first.
///
/// Each span collapses into a single stored line carrying the joined
/// replacement text plus a trailing newline.
pub fn apply_edits(doc: &mut Document, edits: &[Edit]) {
    for edit in edits.iter().rev() {
        doc.replace_span(edit.span, format!("{}\n", edit.text));
    }
}

/// Replace every construct matching `target` with the re-indented template.
///
/// Returns the number of replacements made. Zero matches is a silent no-op;
/// callers that need to know whether the patch applied must inspect the
/// count.
pub fn replace_construct(doc: &mut Document, target: &str, template: &str) -> usize {
    let edits = plan_replacements(doc.lines(), target, template);

    for edit in &edits {
        log::info!(
            "Replaced '{}' at line {} (removed {} lines)",
            target,
            edit.span.start + 1,
            edit.span.len()
        );
    }

    apply_edits(doc, &edits);
    edits.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(lines: &[&str]) -> Document {
        Document::from_lines(lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_matches_target_plain_and_async() {
        assert!(matches_target("  connectPM5() {\n", "connectPM5()"));
        assert!(matches_target("  async connectPM5() {\n", "connectPM5()"));
        assert!(!matches_target("  this.connectPM5();\n", "connectPM5()"));
        assert!(!matches_target("  // connectPM5() is flaky\n", "connectPM5()"));
    }

    #[test]
    fn test_reindent_skips_blank_lines() {
        let out = reindent("a {\n\n  b;\n   \n}", 4);
        assert_eq!(out, "    a {\n\n      b;\n   \n    }");
    }

    #[test]
    fn test_replace_whole_document_function() {
        let mut d = doc(&["function f() {\n", "  x = 1;\n", "}\n"]);
        let count = replace_construct(&mut d, "f", "function f() {\n  return 2;\n}");
        assert_eq!(count, 1);
        assert_eq!(d.len(), 1);
        assert_eq!(d.contents(), "function f() {\n  return 2;\n}\n");
    }

    #[test]
    fn test_no_match_returns_zero_and_leaves_document() {
        let mut d = doc(&["function f() {\n", "}\n"]);
        let before = d.contents();
        assert_eq!(replace_construct(&mut d, "g()", "whatever"), 0);
        assert_eq!(d.contents(), before);
    }

    #[test]
    fn test_second_run_is_noop_when_replacement_no_longer_matches() {
        let mut d = doc(&["async connectPM5() {\n", "  old();\n", "}\n"]);
        assert_eq!(
            replace_construct(&mut d, "connectPM5()", "async connectBle() {\n}"),
            1
        );
        assert_eq!(
            replace_construct(&mut d, "connectPM5()", "async connectBle() {\n}"),
            0
        );
    }

    #[test]
    fn test_two_matches_each_use_local_indentation() {
        let mut d = doc(&[
            "  connectPM5() {\n",
            "  }\n",
            "filler\n",
            "        async connectPM5() {\n",
            "        }\n",
        ]);
        let count = replace_construct(&mut d, "connectPM5()", "connected() {\n  ok();\n}");
        assert_eq!(count, 2);
        assert_eq!(d.len(), 3);
        assert_eq!(d.lines()[0], "  connected() {\n    ok();\n  }\n");
        assert_eq!(d.lines()[1], "filler\n");
        assert_eq!(d.lines()[2], "        connected() {\n          ok();\n        }\n");
    }

    #[test]
    fn test_length_law_single_replacement() {
        let mut d = doc(&[
            "header\n",
            "  f() {\n",
            "    a();\n",
            "    b();\n",
            "  }\n",
            "footer\n",
        ]);
        let before = d.len();
        let edits = plan_replacements(d.lines(), "f()", "f() {\n}");
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].span, Span { start: 1, end: 5 });
        apply_edits(&mut d, &edits);
        assert_eq!(d.len(), before - edits[0].span.len() + 1);
    }

    #[test]
    fn test_nested_same_name_is_consumed_by_outer_span() {
        let mut d = doc(&[
            "function a() {\n",
            "  function a() {\n",
            "  }\n",
            "}\n",
        ]);
        assert_eq!(replace_construct(&mut d, "function a()", "function a() { }"), 1);
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn test_unclosed_construct_replaces_matched_line_only() {
        let mut d = doc(&["f() {\n", "  dangling\n"]);
        let count = replace_construct(&mut d, "f()", "g() { }");
        assert_eq!(count, 1);
        assert_eq!(d.contents(), "g() { }\n  dangling\n");
    }

    #[test]
    fn test_brace_walk_activates_on_first_brace_line() {
        // Signature line has no brace; accumulation starts at the '{' line.
        let mut d = doc(&["f()\n", "{\n", "  x;\n", "}\n", "rest\n"]);
        let edits = plan_replacements(d.lines(), "f()", "f() { }");
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].span, Span { start: 0, end: 4 });
        apply_edits(&mut d, &edits);
        assert_eq!(d.contents(), "f() { }\nrest\n");
    }
}
