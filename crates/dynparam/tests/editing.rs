//! Snapshot, edit, commit cycles driven through the Editor

use dynparam::{diff, Change, DynamicParameters, EditError, Editor, Kind, ValueType, Widget};

#[derive(DynamicParameters, Debug, Default, Clone, PartialEq)]
struct SubRequest {
    name: String,
    success: bool,
}

#[derive(DynamicParameters, Debug, Clone, PartialEq)]
struct Request {
    command: String,
    duration: i64,
    level: Option<u8>,
    tags: Vec<String>,
    sub_request: SubRequest,
    requests: Vec<SubRequest>,
}

fn request() -> Request {
    Request {
        command: "start".to_string(),
        duration: 30,
        level: None,
        tags: vec!["a".to_string()],
        sub_request: SubRequest {
            name: "n".to_string(),
            success: false,
        },
        requests: vec![SubRequest::default(), SubRequest::default()],
    }
}

#[test]
fn test_edit_and_commit() {
    let mut target = request();
    let mut editor = Editor::from_object(&target);

    editor.set_scalar("duration", 45i64).unwrap();
    editor.set_optional("level", Some(2i64)).unwrap();
    editor.set_scalar("sub_request.success", true).unwrap();
    editor.set_scalar("requests.1.name", "second".to_string()).unwrap();

    let report = editor.commit(&mut target);
    assert!(report.is_clean());
    assert_eq!(target.duration, 45);
    assert_eq!(target.level, Some(2));
    assert!(target.sub_request.success);
    assert_eq!(target.requests[1].name, "second");
    assert_eq!(target.command, "start");
}

#[test]
fn test_commit_without_edits_changes_nothing() {
    let mut target = request();
    let editor = Editor::from_object(&target);
    assert!(!editor.is_modified());
    assert!(editor.changes().is_empty());
    assert!(editor.commit(&mut target).is_clean());
    assert_eq!(target, request());
}

#[test]
fn test_out_of_range_edit_is_reported_on_commit() {
    let mut target = request();
    let mut editor = Editor::from_object(&target);
    editor.set_optional("level", Some(1000i64)).unwrap();

    let report = editor.commit(&mut target);
    assert_eq!(report.rejected()[0].key, "level");
    assert_eq!(target.level, None);
}

#[test]
fn test_edit_keeps_case() {
    let mut editor = Editor::from_object(&request());
    let err = editor.set_scalar("sub_request.name", 1i64).unwrap_err();
    assert_eq!(
        err,
        EditError::KindMismatch {
            path: "sub_request.name".to_string(),
            expected: Kind::String,
            found: Kind::Int,
        }
    );
}

#[test]
fn test_array_edit_must_stay_homogeneous() {
    let mut editor = Editor::from_object(&request());
    let err = editor
        .set(
            "tags",
            ValueType::array(vec![ValueType::scalar("x".to_string()), ValueType::scalar(true)]),
        )
        .unwrap_err();
    assert!(matches!(err, EditError::HeterogeneousArray { .. }));

    editor
        .set(
            "tags",
            ValueType::array(vec![
                ValueType::scalar("x".to_string()),
                ValueType::scalar("y".to_string()),
            ]),
        )
        .unwrap();
    let mut target = request();
    editor.commit(&mut target);
    assert_eq!(target.tags, ["x", "y"]);
}

#[test]
fn test_changes_and_reset() {
    let mut editor = Editor::from_object(&request());
    editor.set_scalar("command", "stop".to_string()).unwrap();
    editor.set_scalar("requests.0.success", true).unwrap();

    let changes = editor.changes();
    assert_eq!(changes.len(), 2);
    assert_eq!(
        changes[0],
        Change::Modified {
            path: "command".to_string(),
            before: ValueType::scalar("start".to_string()),
            after: ValueType::String {
                current: "stop".to_string(),
                default: "start".to_string(),
            },
        }
    );
    assert_eq!(changes[1].path(), "requests.0.success");

    editor.reset("command").unwrap();
    assert_eq!(editor.changes().len(), 1);
    editor.reset_all();
    assert!(!editor.is_modified());
}

#[test]
fn test_diff_between_objects() {
    let before = request();
    let mut after = request();
    after.tags.push("b".to_string());
    after.requests.pop();

    let changes = diff(&before.snapshot(), &after.snapshot());
    let paths: Vec<&str> = changes.iter().map(Change::path).collect();
    assert_eq!(paths, ["tags.1", "requests.1"]);
    assert!(matches!(changes[0], Change::Added { .. }));
    assert!(matches!(changes[1], Change::Removed { .. }));
}

#[test]
fn test_form_rows_for_object() {
    let editor = Editor::from_object(&request());
    let rows = editor.fields();

    let top: Vec<&str> = rows
        .iter()
        .filter(|r| r.depth == 0)
        .map(|r| r.label.as_str())
        .collect();
    assert_eq!(
        top,
        ["command", "duration", "level", "tags", "sub_request", "requests"]
    );

    let level = rows.iter().find(|r| r.path == "level").unwrap();
    assert_eq!(level.widget, Widget::Optional(Box::new(Widget::Integer)));
    assert_eq!(level.text.as_deref(), Some("none"));

    let requests = rows.iter().find(|r| r.path == "requests").unwrap();
    assert_eq!(requests.widget, Widget::List { len: 2 });
    assert!(rows.iter().any(|r| r.path == "requests.1.success" && r.depth == 2));
}
