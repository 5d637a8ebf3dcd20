use std::fmt;

use crate::interpret::{ValueForm, interpret};
use crate::lexer::{LexError, LexErrorKind, Lexer};
use crate::token::{Span, Token, TokenKind};
use crate::value::{Constants, EnvMap, EnvValue};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token of kind `expected` was required, `found` came instead.
    Expected {
        expected: TokenKind,
        found: TokenKind,
    },
    /// Input ended before the closing quote.
    UnterminatedString { quote: char },
    /// The lexer rejected the input.
    Lex(LexErrorKind),
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::UnterminatedString { quote } => {
                write!(f, "unterminated quoted string, expected closing {quote}")
            }
            Self::Lex(kind) => write!(f, "{kind}"),
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            kind: ParseErrorKind::Lex(err.kind),
            span: err.span,
        }
    }
}

/// Parse dotenv source into an ordered map.
///
/// # Errors
///
/// Returns `ParseError` on the first syntax error; no partial map is
/// produced.
pub fn parse_str(input: &str) -> Result<EnvMap, ParseError> {
    parse_with_constants(input, &Constants::new())
}

/// Parse dotenv source, substituting bare values that name an entry
/// of `constants`.
///
/// # Errors
///
/// Returns `ParseError` on the first syntax error.
pub fn parse_with_constants(input: &str, constants: &Constants) -> Result<EnvMap, ParseError> {
    Parser::new(input, constants).parse()
}

/// One token of lookahead over a [`Lexer`].
struct Scanner<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Token>,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    fn matches(&mut self, kind: TokenKind) -> Result<bool, ParseError> {
        Ok(self.peek()?.kind == kind)
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Option<Token>, ParseError> {
        if self.matches(kind)? {
            Ok(self.peeked.take())
        } else {
            Ok(None)
        }
    }

    fn demand(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if let Some(token) = self.consume(kind)? {
            return Ok(token);
        }
        let found = self.peek()?;
        Err(ParseError {
            kind: ParseErrorKind::Expected {
                expected: kind,
                found: found.kind,
            },
            span: found.span,
        })
    }
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    constants: &'a Constants,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, constants: &'a Constants) -> Self {
        Self {
            scanner: Scanner::new(input),
            constants,
        }
    }

    fn parse(mut self) -> Result<EnvMap, ParseError> {
        let mut env = EnvMap::new();

        while !self.scanner.matches(TokenKind::Eos)? {
            let name = self.scanner.demand(TokenKind::VarName)?.text;
            self.scanner.demand(TokenKind::Assign)?;

            let value = self.parse_value(&env)?;

            if !self.scanner.matches(TokenKind::Eos)? {
                self.scanner.demand(TokenKind::Eol)?;
            }

            // values may hold secrets, only the type is logged
            tracing::trace!(name = %name, kind = value.type_name(), "parsed entry");
            env.insert(name, value);
        }

        Ok(env)
    }

    fn parse_value(&mut self, env: &EnvMap) -> Result<EnvValue, ParseError> {
        if let Some(token) = self.scanner.consume(TokenKind::Value)? {
            return Ok(interpret(&token.text, ValueForm::Bare, env, self.constants));
        }

        for (quote, form) in [
            (TokenKind::SingleQuote, ValueForm::SingleQuoted),
            (TokenKind::DoubleQuote, ValueForm::DoubleQuoted),
        ] {
            if let Some(open) = self.scanner.consume(quote)? {
                let raw = self.quoted_text(&open)?;
                return Ok(interpret(&raw, form, env, self.constants));
            }
        }

        // `NAME=` with nothing after it
        Ok(EnvValue::Null)
    }

    /// Collect raw text up to and including the quote closing `open`.
    fn quoted_text(&mut self, open: &Token) -> Result<String, ParseError> {
        let mut raw = String::new();
        while let Some(token) = self.scanner.consume(TokenKind::RawText)? {
            raw.push_str(&token.text);
        }

        if self.scanner.matches(TokenKind::Eos)? {
            let quote = if open.kind == TokenKind::SingleQuote {
                '\''
            } else {
                '"'
            };
            return Err(ParseError {
                kind: ParseErrorKind::UnterminatedString { quote },
                span: open.span,
            });
        }

        self.scanner.demand(open.kind)?;
        Ok(raw)
    }
}
