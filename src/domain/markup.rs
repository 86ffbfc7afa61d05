//! Body well-formedness checks.
//!
//! The core never renders Markdown; it only guarantees the body it hands to
//! the external renderer is structurally sound. The one structural invariant
//! authors break in practice is an unterminated fenced block, so the scan
//! tracks fence open/close pairing and records which kinds of fences appear.

/// Language hints treated as diagram descriptions rather than code samples.
const DIAGRAM_LANGUAGES: &[&str] = &["mermaid", "graphviz", "dot", "plantuml"];

/// Outcome of scanning a post body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BodyScan {
    pub contains_code: bool,
    pub contains_diagram: bool,
    /// Line numbers (1-based, relative to the body) of fences left open at
    /// end of input.
    pub unterminated_fences: Vec<usize>,
}

impl BodyScan {
    pub fn is_well_formed(&self) -> bool {
        self.unterminated_fences.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenFence {
    marker: char,
    length: usize,
    line: usize,
}

/// Scan a Markdown body for fence pairing and content flags.
///
/// A fence opens with three or more backticks or tildes and closes with a
/// run of the same character at least as long, per the CommonMark rule this
/// corpus relies on. Anything between open and close is opaque text.
pub fn scan_body(body: &str) -> BodyScan {
    let mut scan = BodyScan::default();
    let mut open: Option<OpenFence> = None;

    for (index, line) in body.lines().enumerate() {
        let trimmed = line.trim_start();
        let Some((marker, length)) = fence_run(trimmed) else {
            continue;
        };

        match open {
            Some(fence) if marker == fence.marker && length >= fence.length => {
                let rest = trimmed[length..].trim();
                // A closing fence carries no info string.
                if rest.is_empty() {
                    open = None;
                }
            }
            Some(_) => {}
            None => {
                let info = trimmed[length..].trim();
                let language = info.split_whitespace().next().unwrap_or("");
                if DIAGRAM_LANGUAGES.contains(&language.to_ascii_lowercase().as_str()) {
                    scan.contains_diagram = true;
                } else {
                    scan.contains_code = true;
                }
                open = Some(OpenFence {
                    marker,
                    length,
                    line: index + 1,
                });
            }
        }
    }

    if let Some(fence) = open {
        scan.unterminated_fences.push(fence.line);
    }

    scan
}

fn fence_run(line: &str) -> Option<(char, usize)> {
    let marker = match line.chars().next() {
        Some(ch @ ('`' | '~')) => ch,
        _ => return None,
    };
    let length = line.chars().take_while(|&ch| ch == marker).count();
    (length >= 3).then_some((marker, length))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balanced_fences_are_well_formed() {
        let scan = scan_body("intro\n```c\nint x;\n```\noutro\n");
        assert!(scan.is_well_formed());
        assert!(scan.contains_code);
        assert!(!scan.contains_diagram);
    }

    #[test]
    fn diagram_fences_are_flagged_separately() {
        let scan = scan_body("```mermaid\ngraph TD; A-->B;\n```\n");
        assert!(scan.contains_diagram);
        assert!(!scan.contains_code);
    }

    #[test]
    fn unterminated_fence_is_reported_with_line() {
        let scan = scan_body("text\n```cpp\nint main() {}\n");
        assert_eq!(scan.unterminated_fences, [2]);
        assert!(!scan.is_well_formed());
    }

    #[test]
    fn closing_fence_must_match_marker_and_length() {
        // A shorter run or the other marker does not close the block.
        let scan = scan_body("````\ncode\n```\n~~~\n");
        assert_eq!(scan.unterminated_fences, [1]);

        let scan = scan_body("````\ncode\n`````\n");
        assert!(scan.is_well_formed());
    }

    #[test]
    fn backticks_inside_tilde_fence_are_opaque() {
        let scan = scan_body("~~~\n```\n~~~\n");
        assert!(scan.is_well_formed());
    }

    #[test]
    fn plain_prose_has_no_flags() {
        let scan = scan_body("just text\n\nmore text\n");
        assert_eq!(scan, BodyScan::default());
    }
}
