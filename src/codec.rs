use std::collections::HashSet;
use std::fmt;

use thiserror::Error as ThisError;

use crate::config::{Config, ConfigError};
use crate::shuffle::consistent_shuffle;

/// Characters reserved as value separators, when present in the alphabet.
const SEPARATORS: &str = "cfhistuCFHISTU";

// Target ratio of working alphabet to separators is 7:2 (3.5).
const SEPARATOR_RATIO_NUM: usize = 7;
const SEPARATOR_RATIO_DEN: usize = 2;

// One guard per 12 working alphabet characters, rounded up.
const GUARD_DIVISOR: usize = 12;

// Added to a value's position when folding it into the checksum seed.
const SEED_OFFSET: u64 = 100;

/// Error returned when encoding fails.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum EncodeError {
    #[error("Encoding an empty list of values is not supported")]
    EmptyInput,
    #[error("Negative value {0} cannot be encoded")]
    NegativeValue(i64),
}

/// Error returned when decoding fails.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Decoding an empty string is not supported")]
    EmptyInput,
    #[error("Character {0:?} is not in the alphabet")]
    UnknownCharacter(char),
    #[error("Malformed segment layout")]
    MalformedSegment,
    #[error("Decoded value does not fit in 63 bits")]
    Overflow,
    #[error("Re-encoding the decoded values does not reproduce the input")]
    Mismatch,
    #[error("Expected exactly one value, decoded {0}")]
    UnexpectedCount(usize),
}

/// Error returned by the identifier adapters, wrapping either direction.
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Core encoder/decoder.
///
/// All tables are derived once in [`Codec::new`] and never mutated afterwards,
/// so a single instance can be shared freely between threads.
pub struct Codec {
    alphabet: Vec<char>,
    separators: Vec<char>,
    guards: Vec<char>,
    charset: HashSet<char>,
    salt: Vec<char>,
    min_length: usize,
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Codec")
            .field("alphabet_len", &self.alphabet.len())
            .field("separators_len", &self.separators.len())
            .field("guards_len", &self.guards.len())
            .field("min_length", &self.min_length)
            .finish_non_exhaustive()
    }
}

impl Codec {
    /// Creates a new `Codec` from the given configuration.
    ///
    /// The configured alphabet is split into a working alphabet used for digits,
    /// a set of separators placed between values, and a few guards used for
    /// padding.  Both the working alphabet and the separators are shuffled with
    /// the salt, so each salt yields a different mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashseq_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new("testing").min_length(4)).unwrap();
    /// ```
    pub fn new(config: &Config) -> Result<Codec, ConfigError> {
        let salt = config.salt.clone();
        let mut alphabet = config.alphabet.clone();

        let mut separators: Vec<char> = SEPARATORS
            .chars()
            .filter(|c| alphabet.contains(c))
            .collect();
        alphabet.retain(|c| !separators.contains(c));
        consistent_shuffle(&mut separators, &salt);

        if separators.is_empty()
            || alphabet.len() * SEPARATOR_RATIO_DEN > separators.len() * SEPARATOR_RATIO_NUM
        {
            let wanted = (alphabet.len() * SEPARATOR_RATIO_DEN)
                .div_ceil(SEPARATOR_RATIO_NUM)
                .max(2);
            if wanted > separators.len() {
                let missing = (wanted - separators.len()).min(alphabet.len());
                separators.extend(alphabet.drain(..missing));
            } else {
                separators.truncate(wanted);
            }
        }
        consistent_shuffle(&mut alphabet, &salt);

        let guard_count = alphabet.len().div_ceil(GUARD_DIVISOR);
        let guards: Vec<char> = if alphabet.len() < 3 {
            let count = guard_count.min(separators.len());
            separators.drain(..count).collect()
        } else {
            alphabet.drain(..guard_count).collect()
        };

        tracing::debug!(
            alphabet_len = alphabet.len(),
            separators_len = separators.len(),
            guards_len = guards.len(),
            min_length = config.min_length,
            "built codec"
        );

        Ok(Codec {
            alphabet,
            separators,
            guards,
            charset: config.alphabet.iter().copied().collect(),
            salt,
            min_length: config.min_length,
        })
    }

    /// Returns the process-wide default codec.
    ///
    /// This is the codec installed with [`Config::set_global`], or the default one
    /// (empty salt, default alphabet, minimum length 4) if none was installed.
    pub fn global() -> &'static Codec {
        Config::global_codec()
    }

    /// Minimum length of encoded strings.
    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Encodes a sequence of non-negative values into a single string.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashseq_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new("this is my salt")).unwrap();
    /// assert_eq!(codec.encode(&[1, 2, 3]).unwrap(), "laHquq");
    /// ```
    pub fn encode(&self, values: &[i64]) -> Result<String, EncodeError> {
        if values.is_empty() {
            return Err(EncodeError::EmptyInput);
        }
        if let Some(&negative) = values.iter().find(|&&v| v < 0) {
            return Err(EncodeError::NegativeValue(negative));
        }
        let values: Vec<u64> = values.iter().map(|&v| v as u64).collect();
        Ok(self.encode_values(&values))
    }

    /// Encodes a single non-negative value.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashseq_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new("testing").min_length(4)).unwrap();
    /// assert_eq!(codec.encode_one(101).unwrap(), "5exA");
    /// assert!(codec.encode_one(-1).is_err());
    /// ```
    pub fn encode_one(&self, value: i64) -> Result<String, EncodeError> {
        self.encode(&[value])
    }

    /// Decodes a previously encoded string back into its values.
    ///
    /// The decoded values are encoded again and compared with the input, so strings
    /// that were truncated, altered, or produced with another salt are rejected
    /// with `DecodeError::Mismatch` rather than decoding to the wrong values.
    pub fn decode(&self, encoded: &str) -> Result<Vec<i64>, DecodeError> {
        if encoded.is_empty() {
            return Err(DecodeError::EmptyInput);
        }
        if let Some(c) = encoded.chars().find(|c| !self.charset.contains(c)) {
            return Err(DecodeError::UnknownCharacter(c));
        }

        let chars: Vec<char> = encoded.chars().collect();
        let parts: Vec<&[char]> = chars.split(|c| self.guards.contains(c)).collect();
        let body = match parts.len() {
            2 | 3 => parts[1],
            _ => parts[0],
        };
        let (&lottery, rest) = body.split_first().ok_or(DecodeError::MalformedSegment)?;

        let mut alphabet = self.alphabet.clone();
        let mut values = Vec::new();
        for segment in rest.split(|c| self.separators.contains(c)) {
            if segment.is_empty() {
                return Err(DecodeError::MalformedSegment);
            }
            reshuffle(&mut alphabet, lottery, &self.salt);
            values.push(from_digits(segment, &alphabet)?);
        }

        // `from_digits` never yields a negative value.
        let unsigned: Vec<u64> = values.iter().map(|&v| v as u64).collect();
        if self.encode_values(&unsigned) != encoded {
            tracing::trace!(len = chars.len(), "decoded values failed re-encode check");
            return Err(DecodeError::Mismatch);
        }
        Ok(values)
    }

    /// Decodes a string that must hold exactly one value.
    ///
    /// # Examples
    ///
    /// ```
    /// use hashseq_rs::{Codec, Config};
    ///
    /// let codec = Codec::new(&Config::new("testing").min_length(4)).unwrap();
    /// assert_eq!(codec.decode_one("5exA").unwrap(), 101);
    /// assert!(codec.decode_one("5exAx").is_err());
    /// ```
    pub fn decode_one(&self, encoded: &str) -> Result<i64, DecodeError> {
        match self.decode(encoded)?.as_slice() {
            [value] => Ok(*value),
            values => Err(DecodeError::UnexpectedCount(values.len())),
        }
    }

    fn encode_values(&self, values: &[u64]) -> String {
        let mut alphabet = self.alphabet.clone();
        let seed: u64 = values
            .iter()
            .enumerate()
            .map(|(i, &v)| v % (i as u64 + SEED_OFFSET))
            .sum();

        let lottery = alphabet[(seed % alphabet.len() as u64) as usize];
        let mut result = vec![lottery];

        for (i, &value) in values.iter().enumerate() {
            reshuffle(&mut alphabet, lottery, &self.salt);
            let digits = to_digits(value, &alphabet);
            result.extend_from_slice(&digits);

            if i + 1 < values.len() {
                let folded = value % (digits[0] as u64 + i as u64);
                let index = (folded % self.separators.len() as u64) as usize;
                result.push(self.separators[index]);
            }
        }

        if result.len() < self.min_length {
            let index = self.guard_index(seed, result[0]);
            result.insert(0, self.guards[index]);

            if result.len() < self.min_length {
                let index = self.guard_index(seed, result[2]);
                result.push(self.guards[index]);
            }
        }

        let half = alphabet.len() / 2;
        while result.len() < self.min_length {
            let key = alphabet.clone();
            consistent_shuffle(&mut alphabet, &key);

            let mut padded = Vec::with_capacity(alphabet.len() + result.len());
            padded.extend_from_slice(&alphabet[half..]);
            padded.extend_from_slice(&result);
            padded.extend_from_slice(&alphabet[..half]);

            let excess = padded.len().saturating_sub(self.min_length);
            if excess > 0 {
                let start = excess / 2;
                padded = padded[start..start + self.min_length].to_vec();
            }
            result = padded;
        }

        result.into_iter().collect()
    }

    fn guard_index(&self, seed: u64, c: char) -> usize {
        ((seed + c as u64) % self.guards.len() as u64) as usize
    }
}

/// Reshuffles the working alphabet before each value, keyed by the lottery
/// character, the salt and the current alphabet order.
fn reshuffle(alphabet: &mut [char], lottery: char, salt: &[char]) {
    let key: Vec<char> = std::iter::once(lottery)
        .chain(salt.iter().copied())
        .chain(alphabet.iter().copied())
        .take(alphabet.len())
        .collect();
    consistent_shuffle(alphabet, &key);
}

// Most significant digit first.
fn to_digits(mut value: u64, alphabet: &[char]) -> Vec<char> {
    let radix = alphabet.len() as u64;
    let mut digits = Vec::new();
    loop {
        digits.push(alphabet[(value % radix) as usize]);
        value /= radix;
        if value == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}

fn from_digits(digits: &[char], alphabet: &[char]) -> Result<i64, DecodeError> {
    let radix = alphabet.len() as i64;
    digits.iter().try_fold(0i64, |acc, c| {
        let position = alphabet
            .iter()
            .position(|a| a == c)
            .ok_or(DecodeError::MalformedSegment)?;
        acc.checked_mul(radix)
            .and_then(|acc| acc.checked_add(position as i64))
            .ok_or(DecodeError::Overflow)
    })
}
