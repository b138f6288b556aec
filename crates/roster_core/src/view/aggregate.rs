//! Marks histogram for the chart view.

use crate::model::student::Student;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One bar: every record with exactly this `marks` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarksGroup {
    pub marks: i64,
    pub count: usize,
    /// Member names in input order, shown on hover.
    pub names: Vec<String>,
}

/// Chart data plus the two summary cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarksSummary {
    /// Bars in order of first appearance in the input.
    pub groups: Vec<MarksGroup>,
    pub total_count: usize,
    /// Mean marks rounded to one decimal; 0 for an empty input.
    pub average_marks: f64,
}

/// Groups `records` by exact marks value in one pass.
///
/// Expects the filtered, pre-pagination set.
pub fn aggregate_by_marks(records: &[Student]) -> MarksSummary {
    let mut groups: Vec<MarksGroup> = Vec::new();
    let mut slot_by_marks: HashMap<i64, usize> = HashMap::new();
    let mut marks_sum: i128 = 0;

    for student in records {
        marks_sum += i128::from(student.marks);
        match slot_by_marks.get(&student.marks) {
            Some(&slot) => {
                let group = &mut groups[slot];
                group.count += 1;
                group.names.push(student.name.clone());
            }
            None => {
                slot_by_marks.insert(student.marks, groups.len());
                groups.push(MarksGroup {
                    marks: student.marks,
                    count: 1,
                    names: vec![student.name.clone()],
                });
            }
        }
    }

    MarksSummary {
        groups,
        total_count: records.len(),
        average_marks: rounded_mean(marks_sum, records.len()),
    }
}

/// Mean marks of `records`, rounded to one decimal place.
pub fn average_marks(records: &[Student]) -> f64 {
    let sum = records.iter().map(|s| i128::from(s.marks)).sum();
    rounded_mean(sum, records.len())
}

fn rounded_mean(sum: i128, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let mean = sum as f64 / count as f64;
    // `f64::round` sends halves away from zero: 2.25 shows as 2.3.
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::rounded_mean;

    #[test]
    fn rounded_mean_keeps_one_decimal() {
        assert_eq!(rounded_mean(0, 0), 0.0);
        assert_eq!(rounded_mean(140, 2), 70.0);
        assert_eq!(rounded_mean(200, 3), 66.7);
        assert_eq!(rounded_mean(10, 3), 3.3);
    }

    #[test]
    fn rounded_mean_sends_halves_away_from_zero() {
        assert_eq!(rounded_mean(9, 4), 2.3);
        assert_eq!(rounded_mean(-9, 4), -2.3);
    }
}
