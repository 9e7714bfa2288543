use crate::units::Pt;
use log::trace;

const TABSIZE: usize = 4;

/// Replace tabs with spaces and normalize all newlines to `\n`
pub fn normalize_text(text: &str) -> String {
    text.replace('\t', &" ".repeat(TABSIZE))
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// One wrapped line of a paragraph, as byte offsets into the wrapped text
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WrappedLine {
    /// First byte of the line
    pub start: usize,
    /// One past the last byte of the line; trailing break whitespace is excluded
    pub end: usize,
    /// Where the text following this line begins
    pub next: usize,
    /// True when the line ends at a newline or at the end of the text, rather than
    /// because it ran out of width
    pub hard: bool,
}

impl WrappedLine {
    pub fn text<'t>(&self, source: &'t str) -> &'t str {
        &source[self.start..self.end]
    }
}

/// Wraps text into lines no wider than `width`, as measured by `measure`.
///
/// Lines break at the most recent space that fits; the spaces at a break are dropped.
/// A word that doesn't fit on a line by itself is split between characters. Every
/// line holds at least one character, so a width narrower than a single glyph still
/// makes progress. Newlines force a break; a single trailing newline doesn't produce
/// an extra empty line. Empty text is one empty line.
///
/// The text is expected to be normalized with [`normalize_text`] already.
pub fn wrap_lines<F>(text: &str, width: Pt, measure: F) -> Vec<WrappedLine>
where
    F: Fn(&str) -> Pt,
{
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let byte_at = |ci: usize| chars.get(ci).map(|&(b, _)| b).unwrap_or(text.len());
    let skip_spaces = |mut ci: usize| {
        while ci < chars.len() && chars[ci].1 == ' ' {
            ci += 1;
        }
        ci
    };

    let mut lines: Vec<WrappedLine> = Vec::new();
    let mut start = 0usize;
    // char index of the most recent space on the current line
    let mut last_space: Option<usize> = None;
    let mut ci = 0usize;

    while ci < chars.len() {
        let ch = chars[ci].1;

        if ch == '\n' {
            lines.push(WrappedLine {
                start: byte_at(start),
                end: byte_at(ci),
                next: byte_at(ci + 1),
                hard: true,
            });
            ci += 1;
            start = ci;
            last_space = None;
            continue;
        }

        if ch == ' ' {
            last_space = Some(ci);
        }

        if ci > start && measure(&text[byte_at(start)..byte_at(ci + 1)]) > width {
            match last_space {
                Some(space) if space > start => {
                    // rewind to the start of the run of spaces and continue after it
                    let mut end = space;
                    while end > start && chars[end - 1].1 == ' ' {
                        end -= 1;
                    }
                    let resume = skip_spaces(space);
                    lines.push(WrappedLine {
                        start: byte_at(start),
                        end: byte_at(end),
                        next: byte_at(resume),
                        hard: false,
                    });
                    start = resume;
                }
                _ => {
                    // no break point, split the word
                    lines.push(WrappedLine {
                        start: byte_at(start),
                        end: byte_at(ci),
                        next: byte_at(ci),
                        hard: false,
                    });
                    start = ci;
                }
            }
            ci = start;
            last_space = None;
            continue;
        }

        ci += 1;
    }

    if start < chars.len() || lines.is_empty() {
        lines.push(WrappedLine {
            start: byte_at(start),
            end: text.len(),
            next: text.len(),
            hard: true,
        });
    }

    trace!("wrapped {} bytes into {} lines at {width}", text.len(), lines.len());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    /// every character is 1pt wide
    fn mono(s: &str) -> Pt {
        Pt(s.chars().count() as f32)
    }

    fn wrapped(text: &str, width: f32) -> Vec<&str> {
        wrap_lines(text, Pt(width), mono)
            .iter()
            .map(|l| l.text(text))
            .collect()
    }

    #[test]
    fn breaks_at_spaces() {
        assert_eq!(wrapped("the quick brown fox", 10.0), ["the quick", "brown fox"]);
        assert_eq!(wrapped("aaa bbb", 3.0), ["aaa", "bbb"]);
    }

    #[test]
    fn splits_long_words() {
        assert_eq!(wrapped("abcdefgh", 3.0), ["abc", "def", "gh"]);
        assert_eq!(wrapped("ab abcdefgh", 4.0), ["ab", "abcd", "efgh"]);
    }

    #[test]
    fn always_makes_progress() {
        assert_eq!(wrapped("abc", 0.0), ["a", "b", "c"]);
    }

    #[test]
    fn honours_newlines() {
        assert_eq!(wrapped("one\ntwo\n\nthree\n", 20.0), ["one", "two", "", "three"]);
        let lines = wrap_lines("one\ntwo", Pt(20.0), mono);
        assert!(lines.iter().all(|l| l.hard));
    }

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(wrapped("", 10.0), [""]);
    }

    #[test]
    fn next_points_past_the_dropped_spaces() {
        let text = "aaa   bbb ccc";
        let lines = wrap_lines(text, Pt(5.0), mono);
        assert_eq!(lines[0].text(text), "aaa");
        assert_eq!(&text[lines[0].next..], "bbb ccc");
        assert!(!lines[0].hard);
        assert!(lines.last().unwrap().hard);
    }

    #[test]
    fn handles_multibyte_characters() {
        assert_eq!(wrapped("äöü ßéè", 3.0), ["äöü", "ßéè"]);
    }

    #[test]
    fn normalizes_tabs_and_newlines() {
        assert_eq!(normalize_text("a\tb\r\nc\rd"), "a    b\nc\nd");
    }
}
