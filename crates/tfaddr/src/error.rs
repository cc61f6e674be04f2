//! address syntax errors

/// The input does not match the address grammar
///
/// `offset` is the byte offset of the furthest position the parser reached
/// before giving up, `kind` names what it expected to find there.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at offset {offset}: {kind}")]
pub struct SyntaxError {
    pub offset: usize,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub(crate) fn new(offset: usize, kind: SyntaxErrorKind) -> Self {
        Self { offset, kind }
    }

    /// Keeps whichever error got further into the input
    ///
    /// On a tie the newer error wins.
    pub(crate) fn furthest(self, other: SyntaxError) -> SyntaxError {
        if self.offset > other.offset {
            self
        } else {
            other
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    #[error("expected identifier")]
    ExpectedIdentifier,
    #[error("expected `.`")]
    ExpectedDot,
    #[error("expected integer or quoted string index")]
    ExpectedIndex,
    #[error("expected `]`")]
    ExpectedCloseBracket,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("integer index out of range")]
    IntegerOutOfRange,
    #[error("unexpected trailing input")]
    TrailingInput,
}
