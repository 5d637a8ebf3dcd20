//! Dotenv lexer, parser, and loader.
//!
//! Reads `KEY=value` files into an ordered map of typed values.
//! Unquoted values are cast to null, booleans, integers or floats;
//! quoted values stay strings. Double-quoted and unquoted values may
//! reference earlier entries with `${NAME}`.
//!
//! # Quick start
//!
//! ## Parse a string
//!
//! ```
//! use dotenv_rs::{EnvValue, parse_str};
//!
//! let env = parse_str("HOST=db\nPORT=5432\nURL=\"postgres://${HOST}:${PORT}\"\n").unwrap();
//! assert_eq!(env["PORT"], EnvValue::Int(5432));
//! assert_eq!(env["URL"], EnvValue::from("postgres://db:5432"));
//! ```
//!
//! ## Load files
//!
//! ```no_run
//! let env = dotenv_rs::require(".env")?;
//! let overrides = dotenv_rs::include(".env.local")?;
//! # Ok::<(), dotenv_rs::Error>(())
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use std::io;
use std::path::{Path, PathBuf};

pub mod interpret;
pub mod lexer;
pub mod loader;
pub mod parser;
pub mod token;
pub mod value;

pub use interpret::{ValueForm, interpret};
pub use lexer::{LexError, LexErrorKind, Lexer, tokenize};
pub use loader::Loader;
pub use parser::{ParseError, ParseErrorKind, parse_str, parse_with_constants};
pub use token::{Action, LexState, Span, Token, TokenKind};
pub use value::{Constants, EnvMap, EnvValue};

/// Error raised while loading a dotenv file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The file does not exist or cannot be opened.
    #[error("unable to find dotenv file \"{}\"", path.display())]
    NotFound { path: PathBuf },
    /// The file exists but could not be read as text.
    #[error("failed to read dotenv file \"{}\": {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    /// The file contents are not valid dotenv syntax.
    #[error("failed to parse dotenv file \"{}\"\n{source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
}

/// Load a dotenv file that must exist.
pub fn require(path: impl AsRef<Path>) -> Result<EnvMap, Error> {
    Loader::new().require(path)
}

/// Load a dotenv file if it exists.
pub fn include(path: impl AsRef<Path>) -> Result<Option<EnvMap>, Error> {
    Loader::new().include(path)
}
