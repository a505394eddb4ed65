use hashseq_rs::{Codec, Config, ConfigError, DecodeError, Id};
use serde::{Deserialize, Serialize};

fn init() {
    match Config::set_global(Config::new("testing").min_length(4)) {
        Ok(()) | Err(ConfigError::GlobalAlreadySet) => {}
        Err(err) => panic!("unexpected config error: {}", err),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Blob {
    key: Id,
}

#[test]
fn test_encode() {
    init();
    assert_eq!(Id::new(101).to_string(), "5exA");
}

#[test]
fn test_bad_encode() {
    init();
    assert_eq!(Id::new(-1).to_string(), "");
    assert!(Id::new(-1).encode().is_err());
}

#[test]
fn test_json_encode() {
    init();
    let blob = Blob { key: Id::new(101) };
    assert_eq!(serde_json::to_string(&blob).unwrap(), r#"{"key":"5exA"}"#);
}

#[test]
fn test_json_decode() {
    init();
    let blob: Blob = serde_json::from_str(r#"{"key":"5exA"}"#).unwrap();
    assert_eq!(blob.key.get(), 101);
    assert!(serde_json::from_str::<Blob>(r#"{"key":"5exAx"}"#).is_err());
}

#[test]
fn test_global_cannot_be_reconfigured() {
    init();
    assert_eq!(
        Config::set_global(Config::new("other")),
        Err(ConfigError::GlobalAlreadySet)
    );
    assert_eq!(Codec::global().encode_one(101).unwrap(), "5exA");
    assert_eq!(Codec::global().min_length(), 4);
}

#[test]
fn test_global_rejects_foreign_strings() {
    init();
    assert_eq!(
        Codec::global().decode_one("!!!!"),
        Err(DecodeError::UnknownCharacter('!'))
    );
    assert_eq!(
        Codec::global().decode_one("5ex"),
        Err(DecodeError::Mismatch)
    );
}
