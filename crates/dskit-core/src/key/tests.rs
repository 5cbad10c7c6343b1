use super::*;
use proptest::prelude::*;

struct TestContext {
    owner: &'static str,
    namespace: &'static str,
}

impl Context for TestContext {
    fn owner_id(&self) -> &str {
        self.owner
    }

    fn namespace(&self) -> &str {
        self.namespace
    }
}

const CTX: TestContext = TestContext {
    owner: "s~app",
    namespace: "",
};

fn person(id: i64) -> Key {
    Key::new(&CTX, "Person", "", id, None)
}

//
// Completeness
//

#[test]
fn incomplete_iff_both_ids_are_zero() {
    assert!(Key::new_incomplete(&CTX, "Task", None).is_incomplete());
    assert!(!person(1).is_incomplete());
    assert!(!Key::new(&CTX, "Person", "alice", 0, None).is_incomplete());
    assert!(!Key::new(&CTX, "Person", "", -4, None).is_incomplete());
}

#[test]
fn incomplete_leaf_is_valid_but_incomplete_ancestor_is_not() {
    let leaf = Key::new_incomplete(&CTX, "Task", Some(person(7)));
    assert!(leaf.is_valid());

    let parent = Key::new_incomplete(&CTX, "Person", None);
    let child = Key::new(&CTX, "Task", "t1", 0, Some(parent));
    assert!(!child.is_valid());
    assert_eq!(
        child.validate(),
        Err(KeyError::IncompleteParent {
            depth: 0,
            kind: "Task".to_string(),
        })
    );
}

//
// Structural validation
//

#[test]
fn validate_rejects_empty_kind_and_owner() {
    let key = Key::from_parts("s~app", "", "", "x", 0, None);
    assert_eq!(key.validate(), Err(KeyError::EmptyKind { depth: 0 }));

    let key = Key::from_parts("", "", "Person", "x", 0, None);
    assert_eq!(
        key.validate(),
        Err(KeyError::EmptyOwner {
            depth: 0,
            kind: "Person".to_string(),
        })
    );
}

#[test]
fn validate_rejects_both_ids_set() {
    let key = Key::new(&CTX, "Person", "alice", 3, None);

    assert_eq!(
        key.validate(),
        Err(KeyError::ConflictingIds {
            depth: 0,
            kind: "Person".to_string(),
        })
    );
}

#[test]
fn validate_reports_depth_of_failing_ancestor() {
    let root = Key::from_parts("s~app", "", "Org", "", 0, None);
    let middle = Key::from_parts("s~app", "", "Team", "", 0, Some(root));
    let leaf = Key::from_parts("s~app", "", "Member", "m", 0, Some(middle));

    // the leaf's own parent is incomplete first
    assert_eq!(
        leaf.validate(),
        Err(KeyError::IncompleteParent {
            depth: 0,
            kind: "Member".to_string(),
        })
    );

    let root = Key::from_parts("s~app", "", "", "org", 0, None);
    let middle = Key::from_parts("s~app", "", "Team", "t", 0, Some(root));
    let leaf = Key::from_parts("s~app", "", "Member", "m", 0, Some(middle));
    assert_eq!(leaf.validate(), Err(KeyError::EmptyKind { depth: 2 }));
}

#[test]
fn validate_rejects_owner_and_namespace_mismatch() {
    let parent = Key::from_parts("s~other", "", "Org", "o", 0, None);
    let child = Key::from_parts("s~app", "", "Team", "t", 0, Some(parent));
    assert_eq!(
        child.validate(),
        Err(KeyError::OwnerMismatch {
            depth: 0,
            kind: "Team".to_string(),
        })
    );

    let parent = Key::from_parts("s~app", "eu", "Org", "o", 0, None);
    let child = Key::from_parts("s~app", "us", "Team", "t", 0, Some(parent));
    assert_eq!(
        child.validate(),
        Err(KeyError::NamespaceMismatch {
            depth: 0,
            kind: "Team".to_string(),
        })
    );
}

#[test]
fn validate_keys_fills_one_slot_per_invalid_key() {
    let keys = vec![
        person(1),
        Key::from_parts("", "", "Person", "", 2, None),
        person(3),
        Key::new(&CTX, "Person", "x", 4, None),
    ];

    let errors = validate_keys(&keys).expect_err("two keys are invalid");
    assert_eq!(errors.slots(), 4);
    assert_eq!(errors.len(), 2);
    assert!(errors.get(0).is_none());
    assert!(matches!(
        errors.get(1),
        Some(crate::error::Error::Key(KeyError::EmptyOwner { .. }))
    ));
    assert!(errors.get(2).is_none());
    assert!(matches!(
        errors.get(3),
        Some(crate::error::Error::Key(KeyError::ConflictingIds { .. }))
    ));

    validate_keys(&[person(1), person(2)]).expect("valid keys should pass");
    validate_keys(&[]).expect("empty batch should pass");
}

//
// Construction
//

#[test]
fn namespaced_keys_inherit_from_nearest_ancestor() {
    let ctx = TestContext {
        owner: "s~app",
        namespace: "default-ns",
    };

    let root = Key::new_namespaced(&ctx, "Org", "o", 0, None, "tenant-a");
    let child = Key::new(&ctx, "Team", "t", 0, Some(root));
    assert_eq!(child.namespace(), "tenant-a");
    assert!(child.is_valid());

    let orphan = Key::new(&ctx, "Org", "o", 0, None);
    assert_eq!(orphan.namespace(), "default-ns");

    let explicit = Key::new_namespaced(&ctx, "Team", "t", 0, Some(orphan), "other");
    assert_eq!(explicit.namespace(), "other");
    assert!(!explicit.is_valid());
}

#[test]
fn chain_navigation() {
    let root = Key::new(&CTX, "Org", "o", 0, None);
    let middle = Key::new(&CTX, "Team", "", 5, Some(root.clone()));
    let leaf = Key::new(&CTX, "Member", "m", 0, Some(middle));

    assert_eq!(leaf.depth(), 3);
    assert_eq!(leaf.root(), &root);
    assert_eq!(root.root(), &root);
    assert_eq!(
        leaf.ancestors().map(Key::kind).collect::<Vec<_>>(),
        vec!["Member", "Team", "Org"]
    );
    assert_eq!(leaf.parent().map(Key::int_id), Some(5));
}

//
// Equality + display
//

#[test]
fn keys_from_different_owners_are_not_equal() {
    let a = Key::from_parts("s~one", "", "Person", "", 1, None);
    let b = Key::from_parts("s~two", "", "Person", "", 1, None);

    assert_ne!(a, b);
    assert_eq!(a, Key::from_parts("s~one", "", "Person", "", 1, None));
}

#[test]
fn chains_of_different_length_are_not_equal() {
    let parent = Key::new(&CTX, "Org", "o", 0, None);
    let nested = Key::new(&CTX, "Person", "", 1, Some(parent));

    assert_ne!(nested, person(1));
}

#[test]
fn display_is_root_first_path() {
    let ctx = TestContext {
        owner: "s~app",
        namespace: "ns",
    };
    let parent = Key::new(&ctx, "Parent", "p", 0, None);
    let child = Key::new(&ctx, "Child", "", 7, Some(parent));

    assert_eq!(child.to_string(), "ns/Parent,p/Child,7");
    assert_eq!(person(42).to_string(), "/Person,42");
    assert_eq!(Key::new_incomplete(&CTX, "Task", None).to_string(), "/Task,0");
}

#[test]
fn is_valid_namespace_matches_allowed_alphabet() {
    assert!(is_valid_namespace(""));
    assert!(is_valid_namespace("tenant-a.b_c9"));
    assert!(is_valid_namespace(&"n".repeat(MAX_NAMESPACE_LEN)));
    assert!(!is_valid_namespace(&"n".repeat(MAX_NAMESPACE_LEN + 1)));
    assert!(!is_valid_namespace("has space"));
    assert!(!is_valid_namespace("slash/ns"));
}

//
// Encoding
//

#[test]
#[should_panic(expected = "cannot encode invalid key")]
fn encode_panics_on_invalid_key() {
    let _ = Key::new(&CTX, "Person", "alice", 1, None).encode();
}

#[test]
fn try_encode_reports_structural_error() {
    let err = Key::new(&CTX, "", "x", 0, None)
        .try_encode()
        .expect_err("empty kind should not encode");

    assert_eq!(err, KeyError::EmptyKind { depth: 0 });
}

#[test]
fn json_form_is_quoted_encoded_key() {
    let key = Key::new(&CTX, "Person", "alice", 0, None);

    let json = serde_json::to_string(&key).expect("valid key should serialize");
    assert_eq!(json, format!("\"{}\"", key.encode()));

    let back: Key = serde_json::from_str(&json).expect("encoded key should deserialize");
    assert_eq!(back, key);
}

#[test]
fn json_rejects_non_string_and_corrupt_values() {
    serde_json::from_str::<Key>("42").expect_err("numbers are not keys");
    serde_json::from_str::<Key>("\"!!!\"").expect_err("bad base64 is not a key");

    let invalid = Key::new(&CTX, "Person", "alice", 1, None);
    serde_json::to_string(&invalid).expect_err("invalid key should not serialize");
}

#[test]
fn persisted_form_restores_full_chain() {
    let ctx = TestContext {
        owner: "s~app",
        namespace: "ns",
    };
    let root = Key::new(&ctx, "Org", "o", 0, None);
    let leaf = Key::new_incomplete(&ctx, "Task", Some(root));

    let bytes = leaf.to_persisted().expect("persist should succeed");
    let restored = Key::from_persisted(&bytes).expect("restore should succeed");

    assert_eq!(restored, leaf);
    assert_eq!(restored.parent().map(Key::kind), Some("Org"));
}

#[test]
fn persisted_form_rejects_garbage() {
    assert!(matches!(
        Key::from_persisted(&[0xff, 0x00, 0x13]),
        Err(PersistError::Decode(_))
    ));

    let bytes = person(9).to_persisted().expect("persist should succeed");
    assert!(matches!(
        Key::from_persisted(&bytes[..bytes.len() - 1]),
        Err(PersistError::Decode(_))
    ));
}

#[test]
fn persisted_form_rejects_oversized_record() {
    let oversized = vec![0_u8; MAX_PERSISTED_KEY_BYTES + 1];

    assert_eq!(
        Key::from_persisted(&oversized),
        Err(PersistError::TooLarge {
            len: MAX_PERSISTED_KEY_BYTES + 1,
            max: MAX_PERSISTED_KEY_BYTES,
        })
    );
}

#[test]
fn persisted_record_uses_field_names() {
    let bytes = person(9).to_persisted().expect("persist should succeed");
    let record = PersistedKey::from_bytes(&bytes).expect("record should decode");

    assert_eq!(record.kind, "Person");
    assert_eq!(record.int_id, 9);
    assert_eq!(record.owner_id, "s~app");
    assert!(record.parent.is_none());
    assert!(bytes.windows(8).any(|w| w == b"owner_id"));
}

//
// Properties
//

fn arb_id() -> impl Strategy<Value = (String, i64)> {
    prop_oneof![
        "[a-zA-Z0-9_-]{1,12}".prop_map(|name| (name, 0)),
        any::<i64>()
            .prop_filter("non-zero id", |id| *id != 0)
            .prop_map(|id| (String::new(), id)),
    ]
}

fn arb_chain() -> impl Strategy<Value = Key> {
    (
        "[a-z~]{1,10}",
        "[a-z._-]{0,8}",
        prop::collection::vec(("[A-Z][a-zA-Z]{0,10}", arb_id()), 1..5),
        any::<bool>(),
    )
        .prop_map(|(owner, namespace, levels, incomplete_leaf)| {
            let mut key: Option<Key> = None;
            for (kind, (name, id)) in levels {
                key = Some(Key::from_parts(
                    owner.as_str(),
                    namespace.as_str(),
                    kind,
                    name,
                    id,
                    key.take(),
                ));
            }
            let key = key.expect("at least one level");
            if incomplete_leaf {
                Key::from_parts(owner, namespace, "Leaf", "", 0, Some(key))
            } else {
                key
            }
        })
}

proptest! {
    #[test]
    fn decode_inverts_encode(key in arb_chain()) {
        prop_assert!(key.is_valid());

        let encoded = key.encode();
        prop_assert!(!encoded.contains('='));
        prop_assert!(!encoded.contains('+') && !encoded.contains('/'));

        let decoded = Key::decode(&encoded).expect("encoded key should decode");
        prop_assert_eq!(decoded, key);
    }

    #[test]
    fn persisted_form_inverts(key in arb_chain()) {
        let bytes = key.to_persisted().expect("persist should succeed");
        let restored = Key::from_persisted(&bytes).expect("restore should succeed");
        prop_assert_eq!(restored, key);
    }
}
