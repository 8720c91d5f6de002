use json_mend_path::{
    format_path, get, get_mut, is_root, parse_path, resolve, validate_path,
};
use serde_json::json;

#[test]
fn parse_format_matrix() {
    let cases = [
        ("$", "$"),
        ("", "$"),
        ("$.a", "$.a"),
        ("$.a[0].b", "$.a[0].b"),
        ("a.b", "$.a.b"),
        ("$.items[12]", "$.items[12]"),
    ];
    for (input, formatted) in cases {
        let steps = parse_path(input);
        assert_eq!(format_path(&steps), formatted, "input: {input}");
    }
}

#[test]
fn resolution_matrix() {
    let doc = json!({
        "items": ["x", "y"],
        "empty": [],
        "user": {"name": "ada", "tags": null},
        "0": "top-level-numeric-key"
    });

    let r = resolve(&doc, "$.items[0]");
    assert!(r.exists);
    assert_eq!(r.value, Some(json!("x")));
    assert!(r.in_array());
    assert_eq!(r.index(), Some(0));

    let r = resolve(&doc, "$.empty[0]");
    assert!(!r.exists);
    assert_eq!(r.value, None);
    assert!(r.in_array());

    let r = resolve(&doc, "$.user.name");
    assert!(r.exists);
    assert_eq!(r.value, Some(json!("ada")));
    assert!(r.in_object());

    // A present key with a null value exists.
    let r = resolve(&doc, "$.user.tags");
    assert!(r.exists);
    assert_eq!(r.value, Some(json!(null)));

    // A numeric segment against an object is a literal property name.
    let r = resolve(&doc, "$[0]");
    assert!(r.exists);
    assert_eq!(r.value, Some(json!("top-level-numeric-key")));
}

#[test]
fn equivalent_spellings_for_array_indices() {
    let doc = json!({"a": [{"b": 1}]});
    assert_eq!(get(&doc, &parse_path("$.a[0].b")), Some(&json!(1)));
    assert_eq!(get(&doc, &parse_path("$.a.0.b")), Some(&json!(1)));
}

#[test]
fn short_circuit_keeps_last_reached_location() {
    let doc = json!({"a": {"b": 1}});

    let r = resolve(&doc, "$.a.x.y");
    assert!(!r.exists);
    assert_eq!(r.parent, Some(json!({"b": 1})));
    assert_eq!(r.key, Some("x".to_string()));

    // A scalar in the middle of the path is a dead end too.
    let r = resolve(&doc, "$.a.b.c");
    assert!(!r.exists);
    assert_eq!(r.key, Some("b".to_string()));
}

#[test]
fn get_mut_allows_in_place_edits() {
    let mut doc = json!({"a": [1, 2, 3]});
    if let Some(v) = get_mut(&mut doc, &parse_path("$.a[1]")) {
        *v = json!(99);
    }
    assert_eq!(doc, json!({"a": [1, 99, 3]}));
}

#[test]
fn root_detection_and_validation() {
    assert!(is_root(&parse_path("$")));
    assert!(is_root(&parse_path("")));
    assert!(!is_root(&parse_path("$.a")));

    assert!(validate_path("$.a[0]").is_ok());
    assert!(validate_path("$.a[zero]").is_err());
}
