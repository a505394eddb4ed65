use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use diesel::deserialize::{self, FromSql, Queryable};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::BigInt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::traits::{ColumnTypeError, ColumnValue, SqlValue, TextCodec};
use crate::{Codec, DecodeError, Error};

/// Names a kind of identifier and selects the codec used for it.
///
/// `codec()` defaults to the process-wide [`Codec::global`].  Override it to give
/// an identifier kind its own codec instance.
pub trait TypeMarker: fmt::Debug {
    fn name() -> &'static str;

    fn codec() -> &'static Codec {
        Codec::global()
    }
}

/// Marker for the plain [`Id`] type, bound to the global codec.
#[derive(Debug)]
pub struct DefaultMarker;

impl TypeMarker for DefaultMarker {
    fn name() -> &'static str {
        "id"
    }
}

/// An identifier using the process-wide codec.
pub type Id = Field<DefaultMarker>;

/// A generic type-safe object ID field (a wrapped `i64`).
///
/// When serialized with Serde, the number is automatically obfuscated into a
/// short string.  Deserialization decodes the string back to an integer, and
/// fails with a Serde error for strings that don't decode.
///
/// Traits are also provided for Diesel compatibility with Postgres BigInt fields.
/// The raw integer is what gets stored; obfuscation only happens at presentation
/// boundaries.
///
/// # Examples
///
/// ```
/// use hashseq_rs;
/// use serde::{Serialize, Deserialize};
/// use serde_json;
///
/// #[derive(Debug)]
/// pub struct ExampleIdMarker;
/// impl hashseq_rs::TypeMarker for ExampleIdMarker {
///     fn name() -> &'static str { "example" }
/// }
///
/// type ExampleId = hashseq_rs::Field<ExampleIdMarker>;
///
/// #[derive(serde::Serialize)]
/// struct Example {
///     pub id: ExampleId,
/// }
///
/// hashseq_rs::Config::set_global(hashseq_rs::Config::new("testing").min_length(4)).unwrap();
/// let obj = Example {id: ExampleId::new(101)};
/// let obj_str = serde_json::to_string(&obj).unwrap();
/// assert_eq!(obj_str, "{\"id\":\"5exA\"}");
/// ```
#[derive(AsExpression, Debug)]
#[diesel(sql_type = BigInt)]
pub struct Field<T: TypeMarker> {
    id: i64,
    _marker: std::marker::PhantomData<T>,
}

impl<T: TypeMarker> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: TypeMarker> Copy for Field<T> {}

impl<T: TypeMarker> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: TypeMarker> Eq for Field<T> {}

impl<T: TypeMarker> Hash for Field<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: TypeMarker> From<i64> for Field<T> {
    fn from(id: i64) -> Self {
        Field::new(id)
    }
}

impl<T: TypeMarker> From<Field<T>> for i64 {
    /// Returns the raw `i64` value.
    fn from(field: Field<T>) -> Self {
        field.id
    }
}

impl<T: TypeMarker> Field<T> {
    /// Creates a `Field<T>` value from a raw `i64`.
    pub fn new(id: i64) -> Self {
        Field {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the raw `i64` value.
    pub fn get(self) -> i64 {
        self.id
    }

    /// Returns the raw value as an `i64`, same as [`Field::get`].
    pub fn as_int(self) -> i64 {
        self.id
    }

    /// Obfuscates the ID with the marker's codec.  Fails for negative IDs.
    pub fn encode(&self) -> Result<String, Error> {
        Ok(T::codec().encode_one(self.id)?)
    }

    /// Decodes an obfuscated string holding exactly one ID.
    pub fn decode(encoded: &str) -> Result<Self, Error> {
        Ok(Field::new(T::codec().decode_one(encoded)?))
    }

    /// Decodes an obfuscated ID from raw bytes.  Invalid UTF-8 is rejected as an
    /// unknown `U+FFFD` character, even if the alphabet contains `U+FFFD`.
    pub fn decode_bytes(encoded: &[u8]) -> Result<Self, Error> {
        let encoded = std::str::from_utf8(encoded)
            .map_err(|_| DecodeError::UnknownCharacter(char::REPLACEMENT_CHARACTER))?;
        Field::decode(encoded)
    }
}

/// Writes the obfuscated string.
///
/// Writes nothing if the ID cannot be encoded (a negative value); use
/// [`Field::encode`] where that case must be told apart.
impl<T: TypeMarker> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.encode() {
            Ok(encoded) => f.write_str(&encoded),
            Err(_) => Ok(()),
        }
    }
}

impl<T: TypeMarker> FromStr for Field<T> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::decode(s)
    }
}

impl<T: TypeMarker> TextCodec for Field<T> {
    type Error = Error;

    fn to_text(&self) -> Result<String, Error> {
        self.encode()
    }

    fn from_text(text: &str) -> Result<Self, Error> {
        Field::decode(text)
    }
}

impl<T: TypeMarker> ColumnValue for Field<T> {
    fn to_column(&self) -> SqlValue {
        SqlValue::BigInt(self.id)
    }

    fn from_column(value: SqlValue) -> Result<Option<Self>, ColumnTypeError> {
        match value {
            SqlValue::BigInt(id) => Ok(Some(Field::new(id))),
            SqlValue::Null => Ok(None),
            other => Err(ColumnTypeError { kind: other.kind() }),
        }
    }
}

impl<T: TypeMarker> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = self.encode().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de, T: TypeMarker> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        Field::decode(&encoded).map_err(|err| {
            serde::de::Error::custom(format!("invalid {} identifier: {}", T::name(), err))
        })
    }
}

impl<T: TypeMarker> ToSql<BigInt, Pg> for Field<T> {
    fn to_sql(&self, out: &mut Output<'_, '_, Pg>) -> serialize::Result {
        <i64 as ToSql<BigInt, Pg>>::to_sql(&self.id, &mut out.reborrow())
    }
}

impl<T: TypeMarker> FromSql<BigInt, Pg> for Field<T> {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let id = <i64 as FromSql<BigInt, Pg>>::from_sql(bytes)?;
        Ok(Field::new(id))
    }
}

impl<T> Queryable<BigInt, Pg> for Field<T>
where
    T: TypeMarker,
{
    type Row = <i64 as Queryable<BigInt, Pg>>::Row;

    fn build(row: Self::Row) -> deserialize::Result<Self> {
        let id = i64::build(row)?;
        Ok(Field::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, DEFAULT_ALPHABET, EncodeError};
    use once_cell::sync::Lazy;
    use serde_json;

    #[derive(Debug)]
    struct TestMarker;

    impl TypeMarker for TestMarker {
        fn name() -> &'static str {
            "test"
        }

        fn codec() -> &'static Codec {
            static CODEC: Lazy<Codec> =
                Lazy::new(|| Codec::new(&Config::new("testing").min_length(4)).unwrap());
            &CODEC
        }
    }

    type TestId = Field<TestMarker>;

    #[derive(Debug)]
    struct ReplacementMarker;

    impl TypeMarker for ReplacementMarker {
        fn name() -> &'static str {
            "replacement"
        }

        fn codec() -> &'static Codec {
            static CODEC: Lazy<Codec> = Lazy::new(|| {
                let alphabet = format!("\u{fffd}{}", DEFAULT_ALPHABET);
                let config = Config::new("testing")
                    .alphabet(&alphabet)
                    .unwrap()
                    .min_length(4);
                Codec::new(&config).unwrap()
            });
            &CODEC
        }
    }

    type ReplacementId = Field<ReplacementMarker>;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Blob {
        key: TestId,
    }

    #[test]
    fn test_encode() {
        let id = TestId::new(101);
        assert_eq!(id.encode().unwrap(), "5exA");
        assert_eq!(id.to_string(), "5exA");
        assert_eq!(id.to_text().unwrap(), "5exA");
        assert_eq!(i64::from(id), 101);
        assert_eq!(id.get(), 101);
        assert_eq!(id.as_int(), 101);
    }

    #[test]
    fn test_bad_encode() {
        let id = TestId::new(-1);
        assert_eq!(
            id.encode(),
            Err(Error::Encode(EncodeError::NegativeValue(-1)))
        );
        assert_eq!(id.to_string(), "");
    }

    #[test]
    fn test_decode() {
        assert_eq!("5exA".parse::<TestId>().unwrap(), TestId::new(101));
        assert_eq!(TestId::from_text("5exA").unwrap(), TestId::from(101));
        assert_eq!(TestId::decode_bytes(b"5exA").unwrap(), TestId::new(101));
        assert_eq!(
            TestId::decode_bytes(&[0x35, 0xff, 0x78, 0x41]),
            Err(Error::Decode(DecodeError::UnknownCharacter('\u{fffd}')))
        );
        assert_eq!(
            "5exAx".parse::<TestId>(),
            Err(Error::Decode(DecodeError::Mismatch))
        );
    }

    #[test]
    fn test_decode_bytes_requires_utf8() {
        let id: ReplacementId = "K\u{fffd}RA".parse().unwrap();
        assert_eq!(id.get(), 6);
        assert_eq!(
            ReplacementId::decode_bytes("K\u{fffd}RA".as_bytes())
                .unwrap()
                .get(),
            6
        );
        // Same string with the U+FFFD bytes replaced by an invalid one.
        assert_eq!(
            ReplacementId::decode_bytes(b"K\xffRA"),
            Err(Error::Decode(DecodeError::UnknownCharacter('\u{fffd}')))
        );
    }

    #[test]
    fn test_json_encode() {
        let blob = Blob {
            key: TestId::new(101),
        };
        assert_eq!(serde_json::to_string(&blob).unwrap(), r#"{"key":"5exA"}"#);

        let negative = Blob {
            key: TestId::new(-1),
        };
        assert!(serde_json::to_string(&negative).is_err());
    }

    #[test]
    fn test_json_decode() {
        let blob: Blob = serde_json::from_str(r#"{"key":"5exA"}"#).unwrap();
        assert_eq!(blob.key.get(), 101);

        let err = serde_json::from_str::<Blob>(r#"{"key":"!!!!"}"#).unwrap_err();
        assert!(err.to_string().starts_with("invalid test identifier"));

        assert!(serde_json::from_str::<Blob>(r#"{"key":101}"#).is_err());
    }

    #[test]
    fn test_column_value() {
        let id = TestId::new(101);
        assert_eq!(id.to_column(), SqlValue::BigInt(101));
        assert_eq!(
            TestId::from_column(SqlValue::BigInt(101)).unwrap(),
            Some(id)
        );
        assert_eq!(TestId::from_column(SqlValue::Null).unwrap(), None);
        assert_eq!(
            TestId::from_column(SqlValue::Text("5exA".to_string())),
            Err(ColumnTypeError { kind: "text" })
        );
        assert_eq!(
            TestId::from_column(SqlValue::Double(1.0)),
            Err(ColumnTypeError { kind: "double" })
        );
    }

    #[test]
    fn test_default_marker_uses_global_codec() {
        // Nothing in this test binary installs a global codec, so the default applies.
        assert_eq!(Id::new(101).to_string(), "ej25");
        assert_eq!("egYb".parse::<Id>().unwrap().get(), 0);
    }
}
