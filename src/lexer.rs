use std::fmt;

use crate::token::{Action, LexState, Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// No rule of the current state matches the input.
    UnexpectedCharacter { ch: char, state: LexState },
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter { ch, state } => {
                write!(f, "unexpected character {ch:?} in {state} state")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize a dotenv source string.
///
/// Skipped tokens (whitespace, comments, `export`) are not returned.
/// The last token is always [`TokenKind::Eos`].
///
/// # Errors
///
/// Returns `LexError` when the input contains a character that no
/// rule of the current lexer state accepts.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eos;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

/// Pull-based lexer driven by a stack of [`LexState`]s.
///
/// Each state tries its rules in declaration order against the
/// remaining input; the first rule that matches wins and its
/// [`Action`] decides whether the token is emitted and how the state
/// stack changes.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    states: Vec<LexState>,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
            states: vec![LexState::Main],
        }
    }

    /// State on top of the stack.
    #[must_use]
    pub fn state(&self) -> LexState {
        self.states.last().copied().unwrap_or(LexState::Main)
    }

    /// Produce the next emitted token.
    ///
    /// Once the input is exhausted every call returns an
    /// [`TokenKind::Eos`] token, whatever the current state.
    ///
    /// # Errors
    ///
    /// Returns `LexError` if no rule of the current state matches.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        let input = self.input;
        loop {
            let span = self.span();
            if self.pos >= input.len() {
                return Ok(Token {
                    kind: TokenKind::Eos,
                    text: String::new(),
                    span,
                });
            }

            let state = self.state();
            let rest = &input.as_bytes()[self.pos..];
            let Some((kind, len)) = state
                .rules()
                .iter()
                .find_map(|&kind| recognize(state, kind, rest).map(|len| (kind, len)))
            else {
                let ch = input[self.pos..].chars().next().unwrap_or('\0');
                return Err(LexError {
                    kind: LexErrorKind::UnexpectedCharacter { ch, state },
                    span,
                });
            };

            let text = input[self.pos..self.pos + len].to_string();
            self.advance(len);

            match state.action(kind) {
                Action::Skip => continue,
                Action::Emit => {}
                Action::Push(next) => self.states.push(next),
                Action::Pop => {
                    // main is never popped
                    if self.states.len() > 1 {
                        self.states.pop();
                    }
                }
            }

            return Ok(Token { kind, text, span });
        }
    }

    const fn span(&self) -> Span {
        Span {
            offset: self.pos,
            line: self.line,
            column: self.col,
        }
    }

    fn advance(&mut self, len: usize) {
        for &b in &self.input.as_bytes()[self.pos..self.pos + len] {
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if b & 0xC0 != 0x80 {
                // count chars, not UTF-8 continuation bytes
                self.col += 1;
            }
        }
        self.pos += len;
    }
}

pub(crate) const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

const fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Length of the match of `kind`'s pattern in `state` at the start of
/// `rest`, or `None` if it does not match. Matches are never empty.
fn recognize(state: LexState, kind: TokenKind, rest: &[u8]) -> Option<usize> {
    let len = match kind {
        TokenKind::Whitespace => rest.iter().take_while(|&&b| is_space(b)).count(),
        TokenKind::Comment => {
            let indent = if state == LexState::Value {
                rest.iter().take_while(|&&b| b == b' ' || b == b'\t').count()
            } else {
                0
            };
            if rest.get(indent) != Some(&b'#') {
                return None;
            }
            indent
                + rest[indent..]
                    .iter()
                    .take_while(|&&b| b != b'\r' && b != b'\n')
                    .count()
        }
        TokenKind::Export => {
            let keyword = b"export";
            if rest.starts_with(keyword)
                && !rest
                    .get(keyword.len())
                    .is_some_and(|&b| is_word(b) || b == b'.')
            {
                keyword.len()
            } else {
                0
            }
        }
        TokenKind::VarName => {
            if rest.first().is_some_and(u8::is_ascii_alphabetic) {
                1 + rest[1..]
                    .iter()
                    .take_while(|&&b| is_word(b) || b == b'.')
                    .count()
            } else {
                0
            }
        }
        TokenKind::Assign => usize::from(rest.first() == Some(&b'=')),
        TokenKind::SingleQuote => usize::from(rest.first() == Some(&b'\'')),
        TokenKind::DoubleQuote => usize::from(rest.first() == Some(&b'"')),
        TokenKind::Value => {
            let mut i = 0;
            while let Some(&b) = rest.get(i) {
                if b == b'\\' && rest.get(i + 1) == Some(&b' ') {
                    i += 2;
                } else if is_space(b) {
                    break;
                } else {
                    i += 1;
                }
            }
            i
        }
        TokenKind::Eol => match rest {
            [b'\n', ..] => 1,
            [b'\r', b'\n', ..] => 2,
            _ => 0,
        },
        TokenKind::RawText => {
            let delimiter = if state == LexState::SingleQuoted {
                b'\''
            } else {
                b'"'
            };
            let mut i = 0;
            while let Some(&b) = rest.get(i) {
                if b == delimiter {
                    break;
                }
                i += 1;
                // an escaped delimiter belongs to the run
                if b == b'\\' && rest.get(i) == Some(&delimiter) {
                    i += 1;
                }
            }
            i
        }
        TokenKind::Eos => 0,
    };

    (len > 0).then_some(len)
}
