//! `hashseq` turns sequential integer IDs into short, non-sequential strings and back,
//! and offers a generic field type to conveniently manage the process with Serde and Diesel.
//!
//! This library is primarily designed to hide raw database IDs in your API.  Monotonically
//! increasing integers leak record counts and invite enumeration; the obfuscated strings
//! don't make that obvious, while you keep using plain integers as your database keys.
//!
//! The encoding follows the hashids algorithm: the alphabet is shuffled with a secret
//! salt, the number is written in that shuffled alphabet, and short outputs are padded to
//! a minimum length.  Decoding re-encodes the result and compares, so truncated or
//! tampered strings, and strings made with another salt, are almost always rejected.
//!
//! Please note that this is **not** encryption.  Anyone who can query the encoder can
//! learn the mapping, so never rely on it for access control.  You also cannot change the
//! salt, unless it's OK that all exposed object identifiers change.
//!
//! # Usage
//!
//! ##  Generic `Field` API (recommended)
//!
//! Use the generic `Field` type to define a type for each type of object you're exposing
//! in your public APIs.  The `Field` type supports automatic encoding and decoding with
//! Diesel and Serde.
//!
//! ```
//! use hashseq_rs;
//! use serde::{Serialize, Deserialize};
//! use serde_json;
//!
//! // Define the ExampleId field type.  By default it uses the global codec.
//! #[derive(Debug)]
//! pub struct ExampleIdMarker;
//! impl hashseq_rs::TypeMarker for ExampleIdMarker {
//!     fn name() -> &'static str { "example" }
//! }
//!
//! type ExampleId = hashseq_rs::Field<ExampleIdMarker>;
//!
//! // The field can then be used in structs, and works automatically with Serde and Diesel.
//! #[derive(serde::Serialize)]
//! struct Example {
//!     pub id: ExampleId,
//! }
//!
//! // Install the global codec once, at startup.
//! hashseq_rs::Config::set_global(hashseq_rs::Config::new("testing").min_length(4)).unwrap();
//! let obj = Example {id: ExampleId::new(101)};
//! let obj_str = serde_json::to_string(&obj).unwrap();
//! assert_eq!(obj_str, "{\"id\":\"5exA\"}");
//! ```
//!
//! ## Low level API
//!
//! `Codec` provides a simple API to encode and decode integers.  A codec is immutable
//! and can be shared between threads, so you can also construct one and pass it around
//! instead of using the global one.
//!
//! ```
//! use hashseq_rs::{Codec, Config};
//!
//! let codec = Codec::new(&Config::new("testing").min_length(4)).unwrap();
//! let encoded = codec.encode_one(101).unwrap();
//! let decoded = codec.decode_one(&encoded).unwrap();
//! assert_eq!(encoded, "5exA");
//! assert_eq!(decoded, 101);
//!
//! assert!(codec.decode_one("5exAx").is_err());
//! ```
//!

mod codec;
mod config;
mod field;
mod shuffle;
mod traits;

pub use codec::{Codec, DecodeError, EncodeError, Error};
pub use config::{Config, ConfigError, DEFAULT_ALPHABET, MIN_ALPHABET_LENGTH};
pub use field::{DefaultMarker, Field, Id, TypeMarker};
pub use traits::{ColumnTypeError, ColumnValue, SqlValue, TextCodec};
