//! address grammar
//!
//! Recursive descent over the PEG below. Alternatives are ordered, a failed alternative rewinds
//! to where it started. On failure the error reported is the one that got furthest into the input.
//!
//! ```text
//! Address         := ModuleSegment* ResourceSegment EOF
//! ModuleSegment   := "module" "." Identifier Index? "."
//! ResourceSegment := "data" "." Identifier "." Identifier Index?
//!                  / Identifier "." Identifier Index?
//! Index           := "[" ( Integer / QuotedString ) "]"
//! Identifier      := [A-Za-z_] [A-Za-z0-9_-]*
//! Integer         := "-"? [0-9]+
//! QuotedString    := '"' ( "\" any / [^"\] )* '"'
//! ```
use crate::address::{Address, Index, Module, ModulePath, ResourceMode, ResourceSpec};
use crate::error::{SyntaxError, SyntaxErrorKind};

type ParseResult<T> = Result<T, SyntaxError>;

/// Parses a complete address
///
/// ```
/// let address = tfaddr::parse(r#"module.a["x"].data.foo.bar[0]"#).unwrap();
/// assert_eq!(address.module_path[0].name, "a");
/// assert!(address.is_data());
/// ```
#[tracing::instrument(level = "trace")]
pub fn parse(input: &str) -> Result<Address, SyntaxError> {
    Parser::new(input).complete(Parser::address)
}

/// Parses an index payload without its brackets, see [Index]'s `FromStr`
pub(crate) fn parse_index_payload(input: &str) -> Result<Index, SyntaxError> {
    if input.is_empty() {
        return Ok(Index::Absent);
    }

    Parser::new(input).complete(Parser::index_value)
}

struct Parser<'a> {
    input: &'a str,
    position: usize,
    /// furthest error of any rewound alternative
    furthest: Option<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            furthest: None,
        }
    }

    /// Runs `rule` and requires it to consume the whole input
    fn complete<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let result = rule(self).and_then(|value| {
            if self.position < self.input.len() {
                return Err(self.error(SyntaxErrorKind::TrailingInput));
            }
            Ok(value)
        });

        result.map_err(|error| {
            let error = match self.furthest.take() {
                Some(furthest) => furthest.furthest(error),
                None => error,
            };
            tracing::trace!(input = self.input, %error, "rejected");
            error
        })
    }

    /// Runs `rule`, rewinding to the current position if it fails
    fn attempt<T>(&mut self, rule: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        let start = self.position;
        let result = rule(self);

        if let Err(error) = &result {
            self.position = start;
            self.furthest = Some(match self.furthest.take() {
                Some(furthest) => furthest.furthest(error.clone()),
                None => error.clone(),
            });
        }

        result
    }

    fn address(&mut self) -> ParseResult<Address> {
        let mut module_path = ModulePath::default();
        while let Ok(module) = self.attempt(Self::module_segment) {
            module_path.push(module);
        }

        let resource = self.resource_segment()?;
        Ok(Address::new(module_path, resource))
    }

    fn module_segment(&mut self) -> ParseResult<Module> {
        self.keyword("module")?;
        self.dot()?;
        let name = self.identifier()?;
        let index = self.optional_index();
        self.dot()?;

        Ok(Module::indexed(name, index))
    }

    fn resource_segment(&mut self) -> ParseResult<ResourceSpec> {
        let data_resource = self.attempt(|parser| {
            parser.keyword("data")?;
            parser.dot()?;
            parser.resource(ResourceMode::Data)
        });

        match data_resource {
            Ok(resource) => Ok(resource),
            Err(_) => {
                tracing::trace!(position = self.position, "not a data resource");
                self.resource(ResourceMode::Managed)
            }
        }
    }

    fn resource(&mut self, mode: ResourceMode) -> ParseResult<ResourceSpec> {
        let resource_type = self.identifier()?;
        self.dot()?;
        let name = self.identifier()?;
        let index = self.optional_index();

        Ok(ResourceSpec {
            mode,
            resource_type,
            name,
            index,
        })
    }

    fn optional_index(&mut self) -> Index {
        if self.peek() != Some('[') {
            return Index::Absent;
        }

        self.attempt(Self::index).unwrap_or_default()
    }

    fn index(&mut self) -> ParseResult<Index> {
        self.position += 1; // [
        let index = self.index_value()?;

        if !self.eat(']') {
            return Err(self.error(SyntaxErrorKind::ExpectedCloseBracket));
        }

        Ok(index)
    }

    fn index_value(&mut self) -> ParseResult<Index> {
        match self.peek() {
            Some('"') => self.quoted_string().map(Index::String),
            Some('-' | '0'..='9') => self.integer().map(Index::Int),
            _ => Err(self.error(SyntaxErrorKind::ExpectedIndex)),
        }
    }

    fn integer(&mut self) -> ParseResult<i64> {
        let start = self.position;
        self.eat('-');

        let digits = self.take_while(|c| c.is_ascii_digit());
        if digits.is_empty() {
            return Err(self.error(SyntaxErrorKind::ExpectedIndex));
        }

        self.input[start..self.position]
            .parse()
            .map_err(|_| SyntaxError::new(start, SyntaxErrorKind::IntegerOutOfRange))
    }

    /// Any character following a backslash is taken literally
    fn quoted_string(&mut self) -> ParseResult<String> {
        let unterminated = SyntaxError::new(self.input.len(), SyntaxErrorKind::UnterminatedString);

        let mut value = String::new();
        let mut chars = self.rest().char_indices().skip(1);
        while let Some((offset, c)) = chars.next() {
            match c {
                '"' => {
                    self.position += offset + 1;
                    return Ok(value);
                }
                '\\' => {
                    let Some((_, escaped)) = chars.next() else {
                        return Err(unterminated);
                    };
                    value.push(escaped);
                }
                c => value.push(c),
            }
        }

        Err(unterminated)
    }

    fn identifier(&mut self) -> ParseResult<String> {
        if !matches!(self.peek(), Some(c) if c.is_ascii_alphabetic() || c == '_') {
            return Err(self.error(SyntaxErrorKind::ExpectedIdentifier));
        }

        let identifier =
            self.take_while(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        Ok(identifier.to_string())
    }

    /// `module` and `data` sit where an identifier could be as well
    fn keyword(&mut self, keyword: &'static str) -> ParseResult<()> {
        if !self.rest().starts_with(keyword) {
            return Err(self.error(SyntaxErrorKind::ExpectedIdentifier));
        }

        self.position += keyword.len();
        Ok(())
    }

    fn dot(&mut self) -> ParseResult<()> {
        if !self.eat('.') {
            return Err(self.error(SyntaxErrorKind::ExpectedDot));
        }
        Ok(())
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            return true;
        }
        false
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| !predicate(c))
            .unwrap_or(rest.len());

        self.position += len;
        &rest[..len]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    fn error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(self.position, kind)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn managed_addresses() {
        let addresses = [
            "module.module",
            "foo.bar",
            r#"foo.bar["xyz"]"#,
            "module.a.foo.bar",
            r#"module.a.foo.bar["xyz"]"#,
            "module.a.module.b.foo.bar",
            r#"module.a.module.b.foo.bar["xyz"]"#,
            r#"module.a["xyz"].foo.bar"#,
            r#"module.a["xyz"].foo.bar["xyz"]"#,
            r#"module.a["xyz"].module.b.foo.bar"#,
            r#"module.a["xyz"].module.b.foo.bar["xyz"]"#,
            "module.a.foo.bar[0]",
            "module.a.module.b.foo.bar[0]",
            "module.a[0].foo.bar",
            "module.a[0].foo.bar[0]",
            "module.a[0].module.b.foo.bar",
            "module.a[0].module.b.foo.bar[0]",
            "module.data.module.b.data.data",
            "module.a[-1].aws_s3-bucket._b2",
            "module.a[0]",
        ];

        for text in addresses {
            let address = parse(text).unwrap_or_else(|e| panic!("{text}: {e}"));
            assert_eq!(address.resource.mode, ResourceMode::Managed, "{text}");
            assert_eq!(address.to_string(), text);
        }
    }

    #[test]
    fn data_addresses() {
        let addresses = [
            "data.module.module",
            "data.foo.bar",
            r#"data.foo.bar["xyz"]"#,
            "module.a.data.foo.bar",
            r#"module.a.data.foo.bar["xyz"]"#,
            "module.a.module.b.data.foo.bar",
            r#"module.a["xyz"].data.foo.bar"#,
            r#"module.a["xyz"].module.b.data.foo.bar["xyz"]"#,
            "module.a.data.foo.bar[0]",
            "module.a[0].data.foo.bar",
            "module.a[0].module.b.data.foo.bar[0]",
            "module.data.module.b.data.data.data",
        ];

        for text in addresses {
            let address = parse(text).unwrap_or_else(|e| panic!("{text}: {e}"));
            assert_eq!(address.resource.mode, ResourceMode::Data, "{text}");
            assert_eq!(address.to_string(), text);
        }
    }

    #[test]
    fn module_order() {
        let address = parse("module.a.module.b.foo.bar").unwrap();
        assert_eq!(
            address.module_path,
            ModulePath::from(vec![Module::new("a".into()), Module::new("b".into())])
        );
        assert_eq!(address.resource.resource_type, "foo");
        assert_eq!(address.resource.name, "bar");
    }

    #[test]
    fn keywords_as_names() {
        let address = parse("module.data.module.b.data.data").unwrap();
        assert_eq!(address.module_path[0].name, "data");
        assert_eq!(address.module_path[1].name, "b");
        assert_eq!(address.resource.mode, ResourceMode::Managed);
        assert_eq!(address.resource.resource_type, "data");
        assert_eq!(address.resource.name, "data");

        let address = parse("module.module").unwrap();
        assert!(address.module_path.is_root());
        assert_eq!(address.resource.resource_type, "module");
    }

    #[test]
    fn index_variants() {
        let address = parse("module.foo[123].a.b[123]").unwrap();
        assert_eq!(address.module_path[0].index, Index::Int(123));
        assert_eq!(address.resource.index, Index::Int(123));

        let address = parse(r#"module.foo["foo"].a.b["foo"]"#).unwrap();
        assert_eq!(address.module_path[0].index, Index::String("foo".into()));
        assert_eq!(address.resource.index, Index::String("foo".into()));

        let address = parse("a.b[-42]").unwrap();
        assert_eq!(address.resource.index, Index::Int(-42));
    }

    #[test]
    fn escapes_are_taken_literally() {
        let address = parse(r#"a.b["\"\\\n\x"]"#).unwrap();
        assert_eq!(address.resource.index, Index::String(r#""\nx"#.into()));
    }

    #[test]
    fn syntax_errors() {
        use SyntaxErrorKind::*;

        let cases = [
            ("", 0, ExpectedIdentifier),
            ("foo", 3, ExpectedDot),
            (r#"foo["xyz"]"#, 3, ExpectedDot),
            (r#"foo["xyz""#, 3, ExpectedDot),
            (r#"foo.bar["xyz""#, 13, ExpectedCloseBracket),
            (r#"foo.bar["xyz]"#, 13, UnterminatedString),
            ("module.foo.bar", 14, ExpectedDot),
            (r#"module.a.foo.bar["x"yz"]"#, 20, ExpectedCloseBracket),
            ("foo.bar.baz", 7, TrailingInput),
            ("foo.", 4, ExpectedIdentifier),
            ("foo.1bar", 4, ExpectedIdentifier),
            ("foo.bar[]", 8, ExpectedIndex),
            ("foo.bar[-]", 9, ExpectedIndex),
            ("foo.bar[x]", 8, ExpectedIndex),
            ("foo.bar[99999999999999999999]", 8, IntegerOutOfRange),
            ("module.a[0].", 12, ExpectedIdentifier),
        ];

        for (text, offset, kind) in cases {
            assert_eq!(
                parse(text),
                Err(SyntaxError::new(offset, kind)),
                "input: {text}"
            );
        }
    }

    #[test]
    fn index_payload() {
        assert_eq!(parse_index_payload(""), Ok(Index::Absent));
        assert_eq!(parse_index_payload("7"), Ok(Index::Int(7)));
        assert_eq!(
            parse_index_payload(r#""a\"b""#),
            Ok(Index::String(r#"a"b"#.into()))
        );
        assert_eq!(
            parse_index_payload("[7]"),
            Err(SyntaxError::new(0, SyntaxErrorKind::ExpectedIndex))
        );
        assert_eq!(
            parse_index_payload("7 "),
            Err(SyntaxError::new(1, SyntaxErrorKind::TrailingInput))
        );
    }
}
