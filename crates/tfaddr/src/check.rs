//! line based address validation
//!
//! One address per line. Empty lines and lines starting with `#` are skipped, surrounding
//! whitespace is ignored.
use crate::error::SyntaxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineStatus {
    Valid,
    /// Valid, but renders differently than it is written
    NotCanonical { canonical: String },
    Invalid(SyntaxError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedLine<'a> {
    /// 1-based
    pub line_number: usize,
    pub text: &'a str,
    pub status: LineStatus,
}

impl CheckedLine<'_> {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, LineStatus::Invalid(_))
    }
}

pub fn check_line(line: &str) -> LineStatus {
    match crate::parse(line) {
        Ok(address) => {
            let canonical = address.to_string();
            if canonical == line {
                LineStatus::Valid
            } else {
                LineStatus::NotCanonical { canonical }
            }
        }
        Err(error) => LineStatus::Invalid(error),
    }
}

pub fn check_lines(contents: &str) -> Vec<CheckedLine<'_>> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(line_index, line)| {
            let text = line.trim();
            if text.is_empty() || text.starts_with('#') {
                return None;
            }

            Some(CheckedLine {
                line_number: line_index + 1,
                text,
                status: check_line(text),
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::SyntaxErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn skips_blank_and_comment_lines() {
        let checked = check_lines("\n# module.foo.bar\n   \n  foo.bar  \n\t# still a comment\n");

        assert_eq!(
            checked,
            [CheckedLine {
                line_number: 4,
                text: "foo.bar",
                status: LineStatus::Valid,
            }]
        );
    }

    #[test]
    fn not_canonical_is_not_a_failure() {
        let checked = check_lines("foo.bar[007]\nfoo.bar[\"\\a\"]");

        assert_eq!(
            checked[0].status,
            LineStatus::NotCanonical {
                canonical: "foo.bar[7]".into()
            }
        );
        assert_eq!(
            checked[1].status,
            LineStatus::NotCanonical {
                canonical: r#"foo.bar["a"]"#.into()
            }
        );
        assert!(checked.iter().all(|line| !line.is_failure()));
    }

    #[test]
    fn counts_failures() {
        let contents = "foo.bar\nmodule.foo.bar\n\nfoo\ndata.foo.bar[0]\n";
        let checked = check_lines(contents);

        let failures: Vec<usize> = checked
            .iter()
            .filter(|line| line.is_failure())
            .map(|line| line.line_number)
            .collect();
        assert_eq!(failures, [2, 4]);

        assert_eq!(
            checked[1].status,
            LineStatus::Invalid(SyntaxError {
                offset: 14,
                kind: SyntaxErrorKind::ExpectedDot
            })
        );
    }
}
