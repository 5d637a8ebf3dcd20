use std::fmt;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset into the input.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Location of the first byte of the input.
    pub const START: Self = Self {
        offset: 0,
        line: 1,
        column: 1,
    };
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Run of whitespace between assignments.
    Whitespace,
    /// Comment (`# ...`), optionally preceded by blanks in a value.
    Comment,
    /// The `export` keyword in front of an assignment.
    Export,
    /// Variable name (`[A-Za-z][A-Za-z0-9_.]*`).
    VarName,
    /// Assignment operator `=`.
    Assign,
    /// Single quote `'`.
    SingleQuote,
    /// Double quote `"`.
    DoubleQuote,
    /// Text between quotes, escaped delimiters included.
    RawText,
    /// Unquoted value.
    Value,
    /// Line terminator (`\n` or `\r\n`).
    Eol,
    /// End of input.
    Eos,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Whitespace => "whitespace",
            Self::Comment => "comment",
            Self::Export => "'export'",
            Self::VarName => "variable name",
            Self::Assign => "'='",
            Self::SingleQuote => "single quote",
            Self::DoubleQuote => "double quote",
            Self::RawText => "quoted text",
            Self::Value => "value",
            Self::Eol => "end of line",
            Self::Eos => "end of input",
        };
        f.write_str(name)
    }
}

/// Lexer states. `Main` sits at the bottom of the state stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexState {
    /// Between assignments.
    Main,
    /// After a variable name, up to the end of the line.
    Value,
    /// Inside `'...'`.
    SingleQuoted,
    /// Inside `"..."`.
    DoubleQuoted,
}

/// What the lexer does once a rule of the current state matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop the token.
    Skip,
    /// Emit the token.
    Emit,
    /// Emit the token and enter a nested state.
    Push(LexState),
    /// Emit the token and return to the parent state.
    Pop,
}

impl LexState {
    /// Token rules of this state in the order they are tried.
    #[must_use]
    pub const fn rules(self) -> &'static [TokenKind] {
        match self {
            Self::Main => &[
                TokenKind::Whitespace,
                TokenKind::Comment,
                TokenKind::Export,
                TokenKind::VarName,
            ],
            Self::Value => &[
                TokenKind::Comment,
                TokenKind::Assign,
                TokenKind::SingleQuote,
                TokenKind::DoubleQuote,
                TokenKind::Value,
                TokenKind::Eol,
            ],
            Self::SingleQuoted => &[TokenKind::RawText, TokenKind::SingleQuote],
            Self::DoubleQuoted => &[TokenKind::RawText, TokenKind::DoubleQuote],
        }
    }

    /// Transition fired when `kind` is recognized in this state.
    #[must_use]
    pub const fn action(self, kind: TokenKind) -> Action {
        match (self, kind) {
            (Self::Main, TokenKind::Whitespace | TokenKind::Comment | TokenKind::Export)
            | (Self::Value, TokenKind::Comment) => Action::Skip,
            (Self::Main, TokenKind::VarName) => Action::Push(Self::Value),
            (Self::Value, TokenKind::SingleQuote) => Action::Push(Self::SingleQuoted),
            (Self::Value, TokenKind::DoubleQuote) => Action::Push(Self::DoubleQuoted),
            (Self::Value, TokenKind::Eol)
            | (Self::SingleQuoted, TokenKind::SingleQuote)
            | (Self::DoubleQuoted, TokenKind::DoubleQuote) => Action::Pop,
            _ => Action::Emit,
        }
    }
}

impl fmt::Display for LexState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Main => "main",
            Self::Value => "value",
            Self::SingleQuoted => "single-quoted string",
            Self::DoubleQuoted => "double-quoted string",
        };
        f.write_str(name)
    }
}

/// A single token with its kind, text, and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}
