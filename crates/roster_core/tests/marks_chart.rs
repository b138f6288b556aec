use roster_core::{aggregate_by_marks, average_marks, Student, StudentFields};
use std::collections::BTreeSet;

fn student(name: &str, marks: i64) -> Student {
    Student::new(StudentFields::new(name, "x@y.io", "Math", marks))
}

#[test]
fn groups_by_exact_marks_in_first_seen_order() {
    let records = vec![
        student("Ann", 80),
        student("Bea", 60),
        student("Cid", 80),
        student("Dee", 81),
        student("Eve", 60),
        student("Fay", 80),
    ];

    let summary = aggregate_by_marks(&records);

    let bars = summary
        .groups
        .iter()
        .map(|g| (g.marks, g.count))
        .collect::<Vec<_>>();
    assert_eq!(bars, vec![(80, 3), (60, 2), (81, 1)]);
    assert_eq!(summary.groups[0].names, vec!["Ann", "Cid", "Fay"]);
    assert_eq!(summary.groups[1].names, vec!["Bea", "Eve"]);
    assert_eq!(summary.total_count, 6);
    assert_eq!(summary.average_marks, 73.5);
}

#[test]
fn counts_sum_to_input_and_names_cover_input() {
    let records = (0..40)
        .map(|i| student(&format!("student-{i}"), (i * 7) % 11))
        .collect::<Vec<_>>();

    let summary = aggregate_by_marks(&records);

    let counted: usize = summary.groups.iter().map(|g| g.count).sum();
    assert_eq!(counted, records.len());

    let grouped_names = summary
        .groups
        .iter()
        .flat_map(|g| g.names.iter().cloned())
        .collect::<BTreeSet<_>>();
    let input_names = records.iter().map(|s| s.name.clone()).collect::<BTreeSet<_>>();
    assert_eq!(grouped_names, input_names);
}

#[test]
fn average_of_empty_set_is_zero() {
    let summary = aggregate_by_marks(&[]);
    assert!(summary.groups.is_empty());
    assert_eq!(summary.total_count, 0);
    assert_eq!(summary.average_marks, 0.0);
    assert_eq!(average_marks(&[]), 0.0);
}

#[test]
fn average_is_rounded_to_one_decimal() {
    assert_eq!(average_marks(&[student("a", 80), student("b", 60)]), 70.0);
    assert_eq!(
        average_marks(&[student("a", 90), student("b", 85), student("c", 70)]),
        81.7
    );
}

#[test]
fn summary_serializes_with_camel_case_totals() {
    let summary = aggregate_by_marks(&[student("Ann", 75)]);
    let value = serde_json::to_value(&summary).unwrap();

    assert_eq!(value["totalCount"], 1);
    assert_eq!(value["averageMarks"], 75.0);
    assert_eq!(value["groups"][0]["names"][0], "Ann");
}
