use crate::cli::commands::read_value;
use lodge_core::Value;

#[test]
fn plain_json_input() {
    let value = read_value(r#"{"a": [1, 2.5, "x"]}"#, false).unwrap();
    match value {
        Value::Map(map) => assert!(matches!(map.get("a"), Some(Value::List(items)) if items.len() == 3)),
        other => panic!("expected map, got {}", other),
    }
}

#[test]
fn array_input() {
    match read_value("[[1, 2, 3], [4, 5, 6]]", true).unwrap() {
        Value::Array(array) => assert_eq!(array.shape(), &[2, 3]),
        other => panic!("expected array, got {}", other),
    }
}

#[test]
fn ragged_array_input_is_rejected() {
    assert!(read_value("[[1, 2], [3]]", true).is_err());
    assert!(read_value("not json", false).is_err());
}
