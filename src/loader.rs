use std::fs;
use std::io;
use std::path::Path;

use crate::Error;
use crate::parser::parse_with_constants;
use crate::value::{Constants, EnvMap, EnvValue};

/// Loads dotenv files from disk.
///
/// A loader only carries the constants table handed to the parser;
/// every call reads and parses from scratch.
///
/// ```no_run
/// use dotenv_rs::Loader;
///
/// let loader = Loader::new().constant("DEFAULT_PORT", 8080_i64);
/// let env = loader.require(".env")?;
/// let local = loader.include(".env.local")?.unwrap_or_default();
/// # Ok::<(), dotenv_rs::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Loader {
    constants: Constants,
}

impl Loader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named constant.
    #[must_use]
    pub fn constant(mut self, name: impl Into<String>, value: impl Into<EnvValue>) -> Self {
        self.constants.insert(name.into(), value.into());
        self
    }

    /// Add every entry of `constants`, replacing existing names.
    #[must_use]
    pub fn with_constants(mut self, constants: Constants) -> Self {
        self.constants.extend(constants);
        self
    }

    #[must_use]
    pub const fn constants(&self) -> &Constants {
        &self.constants
    }

    /// Load a file that must exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if `path` is not a readable file,
    /// `Error::Read` if it cannot be read as UTF-8 text, and
    /// `Error::Parse` on a syntax error.
    pub fn require(&self, path: impl AsRef<Path>) -> Result<EnvMap, Error> {
        let path = path.as_ref();
        self.load(path)?.ok_or_else(|| Error::NotFound {
            path: path.to_path_buf(),
        })
    }

    /// Load a file that may be absent; a missing or unreadable file
    /// yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Read` if the file cannot be read as UTF-8 text
    /// and `Error::Parse` on a syntax error.
    pub fn include(&self, path: impl AsRef<Path>) -> Result<Option<EnvMap>, Error> {
        let path = path.as_ref();
        let env = self.load(path)?;
        if env.is_none() {
            tracing::debug!(path = %path.display(), "optional dotenv file not found, skipping");
        }
        Ok(env)
    }

    fn load(&self, path: &Path) -> Result<Option<EnvMap>, Error> {
        if !path.is_file() {
            return Ok(None);
        }
        let resolved = match fs::canonicalize(path) {
            Ok(resolved) => resolved,
            Err(err) if is_unavailable(&err) => return Ok(None),
            Err(source) => {
                return Err(Error::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let contents = match fs::read_to_string(&resolved) {
            Ok(contents) => contents,
            Err(err) if is_unavailable(&err) => return Ok(None),
            Err(source) => {
                return Err(Error::Read {
                    path: resolved,
                    source,
                });
            }
        };

        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %resolved.display(), "dotenv file is empty");
            return Ok(Some(EnvMap::new()));
        }

        match parse_with_constants(contents, &self.constants) {
            Ok(env) => {
                tracing::debug!(
                    path = %resolved.display(),
                    entries = env.len(),
                    "loaded dotenv file"
                );
                Ok(Some(env))
            }
            Err(source) => Err(Error::Parse {
                path: resolved,
                source,
            }),
        }
    }
}

fn is_unavailable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
    )
}
