use roster_core::view::listing::{filter_students, sort_students, sorted_and_filtered};
use roster_core::{
    run_listing, ListingQuery, Pagination, SortConfig, SortDirection, SortKey, Student,
    StudentFields,
};

fn student(id: &str, name: &str, email: &str, subject: &str, marks: i64) -> Student {
    Student::with_id(id, StudentFields::new(name, email, subject, marks))
}

fn roster() -> Vec<Student> {
    vec![
        student("s01", "maria", "maria@uni.edu", "Biology", 72),
        student("s02", "Ahmed", "ahmed@uni.edu", "Math", 91),
        student("s03", "chen", "chen@school.org", "Physics", 72),
        student("s04", "Bruno", "bruno@uni.edu", "Math", 45),
        student("s05", "Ana", "ana@school.org", "History", 91),
        student("s06", "zoe", "zoe@uni.edu", "Chemistry", 30),
        student("s07", "Liam", "liam@school.org", "math", 66),
        student("s08", "Ana", "ana.b@uni.edu", "Art", 58),
        student("s09", "Omar", "omar@uni.edu", "Biology", 100),
        student("s10", "Priya", "priya@school.org", "Physics", 0),
        student("s11", "Yuki", "yuki@uni.edu", "Math", 77),
        student("s12", "Elena", "elena@school.org", "History", 84),
    ]
}

fn ids(records: &[Student]) -> Vec<&str> {
    records.iter().map(|s| s.id.as_str()).collect()
}

#[test]
fn reversing_direction_reverses_the_sequence_for_every_key() {
    let records = roster();
    for key in [SortKey::Name, SortKey::Email, SortKey::Subject, SortKey::Marks] {
        let ascending = sort_students(&records, SortConfig::new(key, SortDirection::Ascending));
        let mut descending =
            sort_students(&ascending, SortConfig::new(key, SortDirection::Descending));
        descending.reverse();
        assert_eq!(ids(&ascending), ids(&descending), "key {}", key.as_str());
    }
}

#[test]
fn marks_sort_is_numeric() {
    let sorted = sort_students(
        &roster(),
        SortConfig::new(SortKey::Marks, SortDirection::Ascending),
    );
    let marks = sorted.iter().map(|s| s.marks).collect::<Vec<_>>();
    assert_eq!(marks, vec![0, 30, 45, 58, 66, 72, 72, 77, 84, 91, 91, 100]);
}

#[test]
fn name_sort_ignores_case() {
    let sorted = sort_students(
        &roster(),
        SortConfig::new(SortKey::Name, SortDirection::Ascending),
    );
    let names = sorted.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "Ahmed", "Ana", "Ana", "Bruno", "chen", "Elena", "Liam", "maria", "Omar", "Priya",
            "Yuki", "zoe"
        ]
    );
}

#[test]
fn filter_matches_name_email_or_subject_without_case() {
    let records = roster();

    let by_subject = filter_students(records.clone(), "MATH");
    assert_eq!(ids(&by_subject), vec!["s02", "s04", "s07", "s11"]);

    let by_domain = filter_students(records.clone(), "school.org");
    assert_eq!(by_domain.len(), 5);

    let by_name = filter_students(records.clone(), "an");
    assert!(by_name.iter().all(|s| {
        s.name.to_lowercase().contains("an")
            || s.email.contains("an")
            || s.subject.to_lowercase().contains("an")
    }));

    assert_eq!(filter_students(records.clone(), "").len(), records.len());
    assert!(filter_students(records, "nobody-here").is_empty());
}

#[test]
fn filtering_is_idempotent() {
    let once = filter_students(roster(), "uni");
    let twice = filter_students(once.clone(), "uni");
    assert_eq!(once, twice);
}

#[test]
fn filter_preserves_sort_order() {
    let sort = SortConfig::new(SortKey::Marks, SortDirection::Descending);
    let sorted = sort_students(&roster(), sort);
    let filtered = sorted_and_filtered(&roster(), sort, "math");

    let positions = filtered
        .iter()
        .map(|s| sorted.iter().position(|t| t.id == s.id).unwrap())
        .collect::<Vec<_>>();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn pages_cover_the_filtered_sequence_exactly_once() {
    let records = roster();
    for page_size in [1, 3, 5, 7, 12, 20] {
        let mut query = ListingQuery {
            search: "u".to_string(),
            page_size,
            ..ListingQuery::default()
        };
        let expected = sorted_and_filtered(&records, query.sort, &query.search);
        let total_pages = Pagination::new(page_size).total_pages(expected.len());

        let mut collected = Vec::new();
        for page in 1..=total_pages {
            query.page = page;
            let listing = run_listing(&records, &query);
            assert!(!listing.items.is_empty());
            assert!(listing.items.len() <= page_size);
            collected.extend(listing.items);
        }

        assert_eq!(ids(&collected), ids(&expected), "page size {page_size}");
    }
}

#[test]
fn default_listing_sorts_by_marks_descending_before_filtering() {
    let records = vec![
        student("b", "B", "b@x.io", "Math", 50),
        student("a", "A", "a@x.io", "Math", 90),
    ];

    let listing = run_listing(&records, &ListingQuery::default());

    let names = listing.items.iter().map(|s| s.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(listing.info.total_items, 2);
    assert_eq!(listing.info.total_pages, 1);
}

#[test]
fn listing_metadata_describes_the_current_page() {
    let query = ListingQuery {
        page: 3,
        ..ListingQuery::default()
    };

    let listing = run_listing(&roster(), &query);

    assert_eq!(listing.items.len(), 2);
    assert_eq!(listing.info.total_pages, 3);
    assert_eq!(listing.info.range_label(), "Showing 11-12 of 12");
    assert_eq!(listing.info.window(), vec![1, 2, 3]);
    assert!(!listing.info.has_next());
    assert_eq!(listing.info.next_page(), 3);
}

#[test]
fn page_beyond_range_is_empty_not_an_error() {
    let query = ListingQuery {
        page: 9,
        ..ListingQuery::default()
    };

    let listing = run_listing(&roster(), &query);

    assert!(listing.items.is_empty());
    assert_eq!(listing.info.total_items, 12);
    assert_eq!(listing.info.previous_page(), 3);
}

#[test]
fn empty_message_depends_on_search() {
    let none = run_listing(&[], &ListingQuery::default());
    assert_eq!(none.empty_message(""), Some("No students available"));

    let query = ListingQuery {
        search: "zzz".to_string(),
        ..ListingQuery::default()
    };
    let unmatched = run_listing(&roster(), &query);
    assert_eq!(
        unmatched.empty_message(&query.search),
        Some("No matching students found")
    );

    let some = run_listing(&roster(), &ListingQuery::default());
    assert_eq!(some.empty_message(""), None);
}
