use std::collections::HashSet;

use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::Codec;

static GLOBAL_CODEC: OnceCell<Codec> = OnceCell::new();

/// The 62 character mixed-case alphanumeric alphabet used unless another is configured.
pub const DEFAULT_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Minimum number of unique characters an alphabet must have.
pub const MIN_ALPHABET_LENGTH: usize = 16;

/// Minimum output length of the process-wide default codec when none was configured.
pub(crate) const DEFAULT_GLOBAL_MIN_LENGTH: usize = 4;

/// Configuring a `Codec`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub(crate) alphabet: Vec<char>,
    pub(crate) min_length: usize,
    pub(crate) salt: Vec<char>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Alphabet must contain at least {min} unique characters, got {len}")]
    AlphabetTooShort { len: usize, min: usize },
    #[error("Duplicate character in alphabet: {0:?}")]
    DuplicateCharacter(char),
    #[error("Alphabet may not contain whitespace")]
    WhitespaceInAlphabet,
    #[error("Alphabet may not contain control character {0:?}")]
    ControlCharacter(char),
    #[error("Global codec has already been set")]
    GlobalAlreadySet,
}

impl Config {
    /// Creates a new configuration with the given `salt` and other settings in
    /// default values.
    /// - `alphabet` defaults to [`DEFAULT_ALPHABET`].
    /// - `min_length` defaults to 0, so outputs are as short as the value allows.
    ///
    /// Different salts give different outputs for the same integer.  Keep the salt
    /// private, and do not change it unless it's OK that all exposed identifiers change.
    pub fn new(salt: &str) -> Self {
        Config {
            alphabet: DEFAULT_ALPHABET.chars().collect(),
            min_length: 0,
            salt: salt.chars().collect(),
        }
    }

    /// Sets the alphabet used for all output characters.
    ///
    /// The alphabet must have at least [`MIN_ALPHABET_LENGTH`] characters, all
    /// of them unique and none of them whitespace or control characters.
    pub fn alphabet(mut self, alphabet: &str) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for c in alphabet.chars() {
            if c.is_whitespace() {
                return Err(ConfigError::WhitespaceInAlphabet);
            }
            if c.is_control() {
                return Err(ConfigError::ControlCharacter(c));
            }
            if !seen.insert(c) {
                return Err(ConfigError::DuplicateCharacter(c));
            }
        }
        if seen.len() < MIN_ALPHABET_LENGTH {
            return Err(ConfigError::AlphabetTooShort {
                len: seen.len(),
                min: MIN_ALPHABET_LENGTH,
            });
        }
        self.alphabet = alphabet.chars().collect();
        Ok(self)
    }

    /// Sets the minimum length of encoded strings.  Shorter outputs are padded.
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    /// Builds the codec for this configuration and installs it as the process-wide
    /// default used by the `Field` type.
    ///
    /// This can succeed only once, and should be called at startup before any
    /// identifier is encoded or decoded.  Later calls fail with
    /// `ConfigError::GlobalAlreadySet`, as does a call made after the default
    /// codec was already put to use.
    pub fn set_global(config: Config) -> Result<(), ConfigError> {
        let codec = Codec::new(&config)?;
        GLOBAL_CODEC
            .set(codec)
            .map_err(|_| ConfigError::GlobalAlreadySet)?;
        tracing::info!(min_length = config.min_length, "installed global codec");
        Ok(())
    }

    /// Accesses the process-wide codec, installing the default one (empty salt,
    /// default alphabet, minimum length 4) if none was set.
    pub(crate) fn global_codec() -> &'static Codec {
        GLOBAL_CODEC.get_or_init(|| {
            let config = Config::new("").min_length(DEFAULT_GLOBAL_MIN_LENGTH);
            Codec::new(&config).expect("Default configuration should be valid")
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new("")
    }
}
