//! Input tokenizer: one console line → [`ParsedInvocation`].

/// Library used when the command identifier carries no `Library.` qualifier.
pub const DEFAULT_LIBRARY: &str = "DefaultCommands";

/// A tokenized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    /// Library (command group) name.
    pub library: String,
    /// Command name within the library.
    pub command: String,
    /// Raw argument strings, quotes already stripped.
    pub arguments: Vec<String>,
}

impl ParsedInvocation {
    /// Tokenize `line`, resolving unqualified commands to [`DEFAULT_LIBRARY`].
    pub fn parse(line: &str) -> Self {
        Self::parse_with_default(line, DEFAULT_LIBRARY)
    }

    /// Tokenize `line`, resolving unqualified commands to `default_library`.
    ///
    /// Segments are separated by whitespace runs; a double-quoted span keeps
    /// its whitespace and, for arguments, replaces the whole segment with its
    /// unquoted content. The command identifier is split into library and
    /// command only when it contains exactly one `.`.
    pub fn parse_with_default(line: &str, default_library: &str) -> Self {
        let mut segments = split_segments(line).into_iter();

        let identifier = segments.next().map(|s| s.raw).unwrap_or_default();
        let (library, command) = match identifier.split('.').collect::<Vec<_>>().as_slice() {
            [library, command] => (library.to_string(), command.to_string()),
            _ => (default_library.to_string(), identifier.clone()),
        };

        let arguments = segments.map(Segment::into_argument).collect();

        Self {
            library,
            command,
            arguments,
        }
    }

    /// `Library.Command` as typed by the user.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.library, self.command)
    }
}

#[derive(Debug, Default)]
struct Segment {
    /// Segment text including any quote characters.
    raw: String,
    /// Content of the first quoted span, if the segment has one.
    quoted: Option<String>,
}

impl Segment {
    fn into_argument(self) -> String {
        self.quoted.unwrap_or(self.raw)
    }
}

fn split_segments(line: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = Segment::default();
    // Open quoted span being collected.
    let mut span: Option<String> = None;

    for ch in line.chars() {
        if let Some(text) = span.as_mut() {
            current.raw.push(ch);
            if ch == '"' {
                let text = std::mem::take(text);
                span = None;
                current.quoted.get_or_insert(text);
            } else {
                text.push(ch);
            }
        } else if ch == '"' {
            current.raw.push(ch);
            span = Some(String::new());
        } else if ch.is_whitespace() {
            if !current.raw.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.raw.push(ch);
        }
    }

    // unterminated quote runs to end of line
    if let Some(text) = span {
        current.quoted.get_or_insert(text);
    }
    if !current.raw.is_empty() {
        segments.push(current);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_qualified_command() {
        let parsed = ParsedInvocation::parse("Users.Create John Lennon");
        assert_eq!(parsed.library, "Users");
        assert_eq!(parsed.command, "Create");
        assert_eq!(parsed.arguments, vec!["John", "Lennon"]);
    }

    #[test]
    fn test_parse_default_library_with_quoted_argument() {
        let parsed = ParsedInvocation::parse(r#"DoSomething 5 "hello world""#);
        assert_eq!(parsed.library, DEFAULT_LIBRARY);
        assert_eq!(parsed.command, "DoSomething");
        assert_eq!(parsed.arguments, vec!["5", "hello world"]);
    }

    #[test]
    fn test_whitespace_runs_are_single_separators() {
        let parsed = ParsedInvocation::parse("  Cmd\ta   b \t c  ");
        assert_eq!(parsed.command, "Cmd");
        assert_eq!(parsed.arguments, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_whitespace_is_preserved_verbatim() {
        let parsed = ParsedInvocation::parse(r#"Echo "  two  spaces " tail"#);
        assert_eq!(parsed.arguments, vec!["  two  spaces ", "tail"]);
    }

    #[test]
    fn test_empty_quotes_yield_empty_argument() {
        let parsed = ParsedInvocation::parse(r#"Echo "" x"#);
        assert_eq!(parsed.arguments, vec!["", "x"]);
    }

    #[test]
    fn test_segment_with_quoted_span_keeps_only_span() {
        let parsed = ParsedInvocation::parse(r#"Echo name="John Lennon""#);
        assert_eq!(parsed.arguments, vec!["John Lennon"]);
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        let parsed = ParsedInvocation::parse(r#"Echo "open ended  text"#);
        assert_eq!(parsed.arguments, vec!["open ended  text"]);
    }

    #[test]
    fn test_multiple_dots_are_not_split() {
        let parsed = ParsedInvocation::parse("a.b.c 1");
        assert_eq!(parsed.library, DEFAULT_LIBRARY);
        assert_eq!(parsed.command, "a.b.c");
        assert_eq!(parsed.arguments, vec!["1"]);
    }

    #[test]
    fn test_trailing_dot_gives_empty_command() {
        let parsed = ParsedInvocation::parse("Users.");
        assert_eq!(parsed.library, "Users");
        assert_eq!(parsed.command, "");
    }

    #[test]
    fn test_custom_default_library() {
        let parsed = ParsedInvocation::parse_with_default("Get", "Users");
        assert_eq!(parsed.qualified_name(), "Users.Get");
    }

    #[test]
    fn test_empty_line() {
        let parsed = ParsedInvocation::parse("   ");
        assert_eq!(parsed.command, "");
        assert!(parsed.arguments.is_empty());
    }
}
