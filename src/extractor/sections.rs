use std::collections::BTreeMap;

const OPEN_PREFIX: &str = "** start of ";
const NAME_TERMINATOR: &str = " **";

/// A delimited block found in a solution export, borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSection<'a> {
    pub name: &'a str,
    pub content: &'a str,
    /// Byte offset just past the closing marker
    pub end: usize,
}

/// Splits an exported solution into `name -> content` pairs.
///
/// A section opens with `** start of <name> **` and closes with the first
/// later `** end of <name> **` carrying the identical name. Names and
/// contents are trimmed. A closing marker with a different name never closes
/// a section. When a name repeats, the last occurrence wins.
///
/// An empty map means the text is not a recognizable solution export.
pub fn extract_sections(text: &str) -> BTreeMap<String, String> {
    scan_sections(text)
        .map(|section| {
            (
                section.name.trim().to_string(),
                section.content.trim().to_string(),
            )
        })
        .collect()
}

/// Iterates over the raw, untrimmed sections in document order.
pub fn scan_sections(text: &str) -> SectionScanner<'_> {
    SectionScanner { text, cursor: 0 }
}

pub struct SectionScanner<'a> {
    text: &'a str,
    cursor: usize,
}

impl<'a> Iterator for SectionScanner<'a> {
    type Item = RawSection<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(offset) = self.text[self.cursor..].find(OPEN_PREFIX) {
            let start = self.cursor + offset;

            match match_section_at(self.text, start) {
                Some(section) => {
                    self.cursor = section.end;
                    return Some(section);
                }
                // The marker starts with an ASCII '*', so one byte is a char boundary
                None => self.cursor = start + 1,
            }
        }

        self.cursor = self.text.len();
        None
    }
}

/// Tries every candidate name for the opening marker at `start`, shortest
/// first, and returns the first one that has a matching closing marker.
fn match_section_at(text: &str, start: usize) -> Option<RawSection<'_>> {
    let name_start = start + OPEN_PREFIX.len();
    let mut search_from = name_start;

    while let Some(offset) = text[search_from..].find(NAME_TERMINATOR) {
        let name_end = search_from + offset;
        let name = &text[name_start..name_end];
        let content_start = name_end + NAME_TERMINATOR.len();
        let closing = format!("** end of {} **", name);

        if let Some(close_offset) = text[content_start..].find(&closing) {
            let content_end = content_start + close_offset;
            return Some(RawSection {
                name,
                content: &text[content_start..content_end],
                end: content_end + closing.len(),
            });
        }

        search_from = name_end + 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_distinct_sections() {
        let text = "\
** start of index.html **

<h1>Hello</h1>

** end of index.html **

** start of styles.css **
h1 { color: red; }
** end of styles.css **

** start of script.js **
console.log(1);
** end of script.js **
";

        let sections = extract_sections(text);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections["index.html"], "<h1>Hello</h1>");
        assert_eq!(sections["styles.css"], "h1 { color: red; }");
        assert_eq!(sections["script.js"], "console.log(1);");
    }

    #[test]
    fn test_no_markers_yields_nothing() {
        assert!(extract_sections("just some notes\nwith no sections").is_empty());
        assert!(extract_sections("").is_empty());
    }

    #[test]
    fn test_mismatched_closing_name_is_not_a_section() {
        let text = "** start of a.html **<p>x</p>** end of b.html **";
        assert!(extract_sections(text).is_empty());
    }

    #[test]
    fn test_mismatched_marker_inside_content_is_kept() {
        let text = "** start of a **one** end of b **two** end of a **";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["a"], "one** end of b **two");
    }

    #[test]
    fn test_content_ends_at_first_matching_close() {
        let text = "** start of a **first** end of a **second** end of a **";
        let sections = extract_sections(text);
        assert_eq!(sections["a"], "first");
    }

    #[test]
    fn test_duplicate_names_last_occurrence_wins() {
        let text = "\
** start of index.html **
old
** end of index.html **
** start of index.html **
new
** end of index.html **
";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["index.html"], "new");
    }

    #[test]
    fn test_unclosed_opening_is_skipped() {
        let text = "\
** start of broken.js **
never closed
** start of ok.css **
body {}
** end of ok.css **
";
        let sections = extract_sections(text);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections["ok.css"], "body {}");
    }

    #[test]
    fn test_raw_sections_are_untrimmed_and_ordered() {
        let text = "** start of b ** x ** end of b **** start of a **y** end of a **";
        let raw: Vec<_> = scan_sections(text).collect();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].name, "b");
        assert_eq!(raw[0].content, " x ");
        assert_eq!(raw[1].name, "a");
        assert_eq!(raw[1].end, text.len());
    }

    #[test]
    fn test_multibyte_content_is_preserved() {
        let text = "** start of notes.txt **\nnaïve café ✓\n** end of notes.txt **";
        assert_eq!(extract_sections(text)["notes.txt"], "naïve café ✓");
    }
}
