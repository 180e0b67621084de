use mdkanban_core::{extract, Board};
use serde_json::json;

#[test]
fn board_serializes_as_section_array_with_expected_wire_fields() {
    let board = extract("# To Do\n- [ ] Buy milk\n- [x] Pay bills\n# Done\n- [x] Ship release");

    let value = serde_json::to_value(&board).unwrap();
    assert_eq!(
        value,
        json!([
            {
                "heading": "To Do",
                "line": 1,
                "tasks": [
                    {"raw": "- [ ] Buy milk", "checked": false, "line": 2},
                    {"raw": "- [x] Pay bills", "checked": true, "line": 3}
                ]
            },
            {
                "heading": "Done",
                "line": 4,
                "tasks": [
                    {"raw": "- [x] Ship release", "checked": true, "line": 5}
                ]
            }
        ])
    );

    let decoded: Board = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, board);
}

#[test]
fn empty_board_serializes_as_empty_array() {
    assert_eq!(serde_json::to_string(&extract("")).unwrap(), "[]");
}

#[test]
fn implicit_section_serializes_with_empty_heading_and_null_line() {
    let value = serde_json::to_value(extract("stray\n- [ ] task")).unwrap();
    assert_eq!(value[0]["heading"], "");
    assert!(value[0]["line"].is_null());
    assert_eq!(value[0]["tasks"][0]["raw"], "- [ ] task");
}
