use phonebook_core::{
    decode, encode, BirthDate, Contact, ContactId, ContactRepository, ContactService, Directory,
    DirectoryStore, JsonFileStore, Phone, StoreError, WireContact,
};
use serde_json::json;

fn id(name: &str, surname: &str) -> ContactId {
    ContactId::new(name, surname).unwrap()
}

fn sample_directory() -> Directory {
    [
        (
            id("Ivan", "Petrov"),
            Contact::new(
                Phone::parse("89991234567").unwrap(),
                Some(BirthDate::parse("01.02.1990").unwrap()),
            ),
        ),
        (
            id("Anna", "Smirnova"),
            Contact::new(Phone::parse("89997654321").unwrap(), None),
        ),
    ]
    .into_iter()
    .collect()
}

#[test]
fn encode_uses_space_joined_keys_and_empty_unknown_dob() {
    let wire = encode(&sample_directory());

    assert_eq!(
        wire.get("Ivan Petrov"),
        Some(&WireContact {
            phone: "89991234567".to_string(),
            dob: "01.02.1990".to_string(),
        })
    );
    assert_eq!(wire["Anna Smirnova"].dob, "");
}

#[test]
fn decode_inverts_encode() {
    let directory = sample_directory();
    assert_eq!(decode(encode(&directory)).unwrap(), directory);
    assert_eq!(decode(encode(&Directory::new())).unwrap(), Directory::new());
}

#[test]
fn decode_splits_key_at_first_space() {
    let wire = serde_json::from_value(json!({
        "Mary Ann Smith": {"phone": "89991234567", "dob": ""}
    }))
    .unwrap();

    let directory = decode(wire).unwrap();
    let (decoded_id, _) = directory.all().remove(0);
    assert_eq!(decoded_id.name(), "Mary");
    assert_eq!(decoded_id.surname(), "Ann smith");
}

#[test]
fn decode_normalizes_legacy_international_phones() {
    let wire = serde_json::from_value(json!({
        "Ivan Petrov": {"phone": "+79991234567", "dob": "01.02.1990"}
    }))
    .unwrap();

    let directory = decode(wire).unwrap();
    assert_eq!(
        directory.get(&id("Ivan", "Petrov")).unwrap().phone.as_str(),
        "89991234567"
    );
}

#[test]
fn decode_rejects_invalid_entries() {
    let cases = [
        json!({"IvanPetrov": {"phone": "89991234567", "dob": ""}}),
        json!({"Ivan Petrov": {"phone": "123", "dob": ""}}),
        json!({"Ivan Petrov": {"phone": "89991234567", "dob": "31.02.2020"}}),
        json!({"Iv@n Petrov": {"phone": "89991234567", "dob": ""}}),
    ];

    for case in cases {
        let wire = serde_json::from_value(case.clone()).unwrap();
        let err = decode(wire).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)), "{case} should be corrupt");
    }
}

#[test]
fn decode_keeps_later_key_when_identities_collide() {
    let wire = serde_json::from_value(json!({
        "Ivan Petrov": {"phone": "89991234567", "dob": ""},
        "ivan petrov": {"phone": "89997654321", "dob": ""}
    }))
    .unwrap();

    let directory = decode(wire).unwrap();
    assert_eq!(directory.len(), 1);
    assert_eq!(
        directory.get(&id("Ivan", "Petrov")).unwrap().phone.as_str(),
        "89997654321"
    );
}

#[test]
fn names_with_spaces_that_share_a_key_split_still_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.json");
    let mut service = ContactService::open(JsonFileStore::new(&path)).unwrap();
    service
        .add(
            id("Mary ann", "Smith"),
            Contact::new(Phone::parse("89991111111").unwrap(), None),
        )
        .unwrap();
    service
        .add(
            id("Mary", "Ann smith"),
            Contact::new(Phone::parse("89992222222").unwrap(), None),
        )
        .unwrap();
    assert_eq!(service.directory().len(), 2);

    let reloaded = JsonFileStore::new(&path).load().unwrap();

    assert_eq!(reloaded.len(), 1);
    assert_eq!(
        reloaded.get(&id("Mary", "Ann smith")).unwrap().phone.as_str(),
        "89991111111"
    );
    assert!(ContactService::open(JsonFileStore::new(&path)).is_ok());
}

#[test]
fn missing_file_loads_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("phonebook.json"));

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn malformed_file_is_corrupt_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phonebook.json");
    std::fs::write(&path, "{\"Ivan Petrov\": ").unwrap();

    let err = JsonFileStore::new(&path).load().unwrap_err();
    assert!(matches!(err, StoreError::Corrupt(_)));
    assert!(err.to_string().starts_with("corrupt contact store"));
}

#[test]
fn save_then_load_round_trips_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("phonebook.json"));
    let directory = sample_directory();

    store.save(&directory).unwrap();
    assert_eq!(store.load().unwrap(), directory);
}

#[test]
fn saved_file_is_pretty_printed_with_four_spaces() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("phonebook.json"));
    store.save(&sample_directory()).unwrap();

    let text = std::fs::read_to_string(store.path()).unwrap();
    let expected = "{\n    \"Anna Smirnova\": {\n        \"phone\": \"89997654321\",\n        \"dob\": \"\"\n    },\n    \"Ivan Petrov\": {\n        \"phone\": \"89991234567\",\n        \"dob\": \"01.02.1990\"\n    }\n}\n";
    assert_eq!(text, expected);
}

#[test]
fn save_overwrites_previous_contents() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("phonebook.json"));
    store.save(&sample_directory()).unwrap();
    store.save(&Directory::new()).unwrap();

    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "{}\n");
    assert!(store.load().unwrap().is_empty());
}
