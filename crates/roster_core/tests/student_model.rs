use roster_core::{MarksBand, Student, StudentFields};
use serde_json::json;

#[test]
fn new_student_gets_a_fresh_identifier() {
    let a = Student::new(StudentFields::new("Ann", "ann@x.io", "Math", 70));
    let b = Student::new(StudentFields::new("Ann", "ann@x.io", "Math", 70));

    assert!(!a.id.is_empty());
    assert_ne!(a.id, b.id);
    assert_eq!(a.fields(), b.fields());
}

#[test]
fn serialization_uses_record_wire_shape() {
    let student = Student::with_id("abc", StudentFields::new("Ann", "ann@x.io", "Math", 70));

    let value = serde_json::to_value(&student).unwrap();
    assert_eq!(
        value,
        json!({
            "id": "abc",
            "name": "Ann",
            "email": "ann@x.io",
            "subject": "Math",
            "marks": 70
        })
    );

    let decoded: Student = serde_json::from_value(value).unwrap();
    assert_eq!(decoded, student);
}

#[test]
fn deserialization_accepts_legacy_underscore_id() {
    let decoded: Student = serde_json::from_value(json!({
        "_id": "65f0c0ffee",
        "name": "Ann",
        "email": "ann@x.io",
        "subject": "Math",
        "marks": 70
    }))
    .unwrap();

    assert_eq!(decoded.id, "65f0c0ffee");
}

#[test]
fn band_uses_student_marks() {
    let student = Student::new(StudentFields::new("Ann", "ann@x.io", "Math", 61));
    assert_eq!(student.band(), MarksBand::Good);
    assert_eq!(student.band().label(), "good");
}
