use super::*;
use crate::wire::{Path, PathElement};

// Encodings are fixed by the shared backend protocol; other runtimes
// produce exactly these strings for the same keys.
const SINGLE_INT_ID: &str = "agFhcgcLEgFLGAEM";
const NAMESPACED_CHAIN: &str = "agVzfmFwcHIYCxIGUGFyZW50IgFwDAsSBUNoaWxkGAcMogECbnM";
const STRING_ID: &str = "agVzfmFwcHIRCxIGUGVyc29uIgVhbGljZQw";
const INCOMPLETE: &str = "agNhcHByCAsSBFRhc2sM";
const NEGATIVE_ID: &str = "agNhcHByEgsSA05lZxj___________8BDA";

fn namespaced_chain() -> Key {
    let parent = Key::from_parts("s~app", "ns", "Parent", "p", 0, None);
    Key::from_parts("s~app", "ns", "Child", "", 7, Some(parent))
}

fn element(kind: &str, id: Option<i64>, name: Option<&str>) -> PathElement {
    PathElement {
        r#type: kind.to_string(),
        id,
        name: name.map(str::to_string),
    }
}

//
// Byte compatibility
//

#[test]
fn encode_matches_cross_runtime_fixtures() {
    let cases = [
        (Key::from_parts("a", "", "K", "", 1, None), SINGLE_INT_ID),
        (namespaced_chain(), NAMESPACED_CHAIN),
        (Key::from_parts("s~app", "", "Person", "alice", 0, None), STRING_ID),
        (Key::from_parts("app", "", "Task", "", 0, None), INCOMPLETE),
        (Key::from_parts("app", "", "Neg", "", -1, None), NEGATIVE_ID),
    ];

    for (key, expected) in cases {
        assert_eq!(key.encode(), expected, "encoding of {key}");
        assert_eq!(
            Key::decode(expected).expect("fixture should decode"),
            key,
            "decoding of {expected}"
        );
    }
}

#[test]
fn reference_bytes_are_root_first() {
    let reference = key_to_reference(&namespaced_chain()).expect("valid key");

    assert_eq!(reference.app, "s~app");
    assert_eq!(reference.name_space.as_deref(), Some("ns"));
    assert_eq!(
        reference.path.element,
        vec![
            element("Parent", None, Some("p")),
            element("Child", Some(7), None),
        ]
    );

    let bytes = key_to_reference(&Key::from_parts("a", "", "K", "", 1, None))
        .expect("valid key")
        .encode_to_vec();
    assert_eq!(
        bytes,
        vec![0x6a, 0x01, 0x61, 0x72, 0x07, 0x0b, 0x12, 0x01, 0x4b, 0x18, 0x01, 0x0c]
    );
}

#[test]
fn default_namespace_is_omitted() {
    let reference =
        key_to_reference(&Key::from_parts("app", "", "Task", "t", 0, None)).expect("valid key");

    assert_eq!(reference.name_space, None);
}

#[test]
fn key_to_reference_rejects_invalid_keys() {
    let key = Key::from_parts("app", "", "Task", "t", 9, None);

    assert!(matches!(
        key_to_reference(&key),
        Err(KeyError::ConflictingIds { depth: 0, .. })
    ));
}

#[test]
fn reference_value_mirrors_reference() {
    let value = key_to_reference_value(&namespaced_chain()).expect("valid key");

    assert_eq!(value.app, "s~app");
    assert_eq!(value.name_space.as_deref(), Some("ns"));
    assert_eq!(value.path_element.len(), 2);
    assert_eq!(value.path_element[0].r#type, "Parent");
    assert_eq!(value.path_element[0].name.as_deref(), Some("p"));
    assert_eq!(value.path_element[1].id, Some(7));
}

//
// Decode failures
//

#[test]
fn decode_rejects_characters_outside_url_alphabet() {
    let mut corrupted = SINGLE_INT_ID.to_string();
    corrupted.replace_range(3..4, "!");

    assert!(matches!(
        Key::decode(&corrupted),
        Err(DecodeError::Base64(_))
    ));

    // standard-alphabet characters are not part of the URL-safe form
    let mut corrupted = SINGLE_INT_ID.to_string();
    corrupted.replace_range(5..6, "+");
    assert!(matches!(
        Key::decode(&corrupted),
        Err(DecodeError::Base64(_))
    ));
}

// The text form carries no checksum: altering one character to another
// character of the URL-safe alphabet can still decode to a well-formed but
// different key. Only out-of-alphabet characters, truncation and impossible
// lengths are guaranteed to be rejected.
#[test]
fn in_alphabet_substitution_can_yield_a_different_key() {
    let mut altered = STRING_ID.to_string();
    assert_eq!(&altered[31..32], "j");
    altered.replace_range(31..32, "b");

    let key = Key::decode(&altered).expect("altered token still decodes");
    assert_eq!(key.string_id(), "ali[e");
    assert_ne!(key, Key::decode(STRING_ID).expect("fixture should decode"));
}

#[test]
fn decode_rejects_truncated_reference() {
    let truncated = &SINGLE_INT_ID[..SINGLE_INT_ID.len() - 1];

    assert!(matches!(Key::decode(truncated), Err(DecodeError::Wire(_))));
}

#[test]
fn decode_rejects_impossible_length() {
    // a single leftover character can never be valid base64
    assert!(matches!(
        Key::decode("agFhc"),
        Err(DecodeError::Base64(_))
    ));
}

#[test]
fn decode_rejects_empty_path() {
    assert_eq!(Key::decode(""), Err(DecodeError::EmptyPath));
}

#[test]
fn decode_rejects_oversized_input() {
    let oversized = "A".repeat(MAX_ENCODED_TOKEN_LEN + 4);

    assert_eq!(
        Key::decode(&oversized),
        Err(DecodeError::TooLong {
            len: MAX_ENCODED_TOKEN_LEN + 4,
            max: MAX_ENCODED_TOKEN_LEN,
        })
    );
}

#[test]
fn reference_to_key_checks_each_level() {
    let reference = Reference {
        app: "app".to_string(),
        path: Path {
            element: vec![
                element("Org", None, None),
                element("Team", None, Some("t")),
            ],
        },
        name_space: None,
    };

    assert_eq!(
        reference_to_key(reference),
        Err(DecodeError::Key(KeyError::IncompleteParent {
            depth: 0,
            kind: "Team".to_string(),
        }))
    );

    let reference = Reference {
        app: "app".to_string(),
        path: Path {
            element: vec![
                element("Org", Some(3), Some("o")),
                element("Team", None, Some("t")),
            ],
        },
        name_space: None,
    };

    assert_eq!(
        reference_to_key(reference),
        Err(DecodeError::Key(KeyError::ConflictingIds {
            depth: 1,
            kind: "Org".to_string(),
        }))
    );
}

#[test]
fn reference_to_key_rejects_missing_owner() {
    let reference = Reference {
        app: String::new(),
        path: Path {
            element: vec![element("Org", Some(3), None)],
        },
        name_space: None,
    };

    assert!(matches!(
        reference_to_key(reference),
        Err(DecodeError::Key(KeyError::EmptyOwner { depth: 0, .. }))
    ));
}
