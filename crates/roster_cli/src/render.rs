//! Plain-text rendering of the listing table and the marks chart.

use roster_core::{ListingPage, MarksSummary, SortKey, Student, ViewState};

const COLUMNS: [(Option<SortKey>, &str); 6] = [
    (None, "#"),
    (Some(SortKey::Name), "Name"),
    (Some(SortKey::Email), "Email"),
    (Some(SortKey::Subject), "Subject"),
    (Some(SortKey::Marks), "Marks"),
    (None, "Band"),
];
const MAX_BAR_WIDTH: usize = 40;

/// Table page with sort arrow, footer range and page window.
pub fn render_table(listing: &ListingPage, view: &ViewState) -> String {
    let header: Vec<String> = COLUMNS
        .iter()
        .map(|(key, title)| match key {
            Some(key) if *key == view.sort.key => format!("{title} {}", view.sort.direction.arrow()),
            _ => (*title).to_string(),
        })
        .collect();

    let offset = listing.info.first_item.max(1);
    let rows: Vec<Vec<String>> = listing
        .items
        .iter()
        .enumerate()
        .map(|(index, student)| row(offset + index, student))
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|cell| cell.chars().count()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&line(&header, &widths));
    out.push_str(&line(
        &widths.iter().map(|width| "-".repeat(*width)).collect::<Vec<_>>(),
        &widths,
    ));
    for cells in &rows {
        out.push_str(&line(cells, &widths));
    }
    if let Some(message) = listing.empty_message(&view.search) {
        out.push_str(message);
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&footer(listing));
    out
}

fn row(position: usize, student: &Student) -> Vec<String> {
    vec![
        position.to_string(),
        student.name.clone(),
        student.email.clone(),
        student.subject.clone(),
        student.marks.to_string(),
        student.band().label().to_string(),
    ]
}

fn line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", padded.join(" | ").trim_end())
}

fn footer(listing: &ListingPage) -> String {
    let info = &listing.info;
    if info.total_items == 0 {
        return String::new();
    }
    let window = info
        .window()
        .into_iter()
        .map(|page| {
            if page == info.page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let previous = if info.has_previous() { "<" } else { " " };
    let next = if info.has_next() { ">" } else { " " };
    format!("{}\n{previous} {window} {next}\n", info.range_label())
}

/// Summary cards followed by one bar per distinct marks value.
pub fn render_chart(summary: &MarksSummary) -> String {
    let mut out = format!(
        "Total students: {}\nAverage marks: {:.1}\n",
        summary.total_count, summary.average_marks
    );
    if summary.groups.is_empty() {
        out.push_str("No students available\n");
        return out;
    }

    let widest = summary
        .groups
        .iter()
        .map(|group| group.count)
        .max()
        .unwrap_or(1);
    out.push('\n');
    for group in &summary.groups {
        let bar_width = (group.count * MAX_BAR_WIDTH).div_ceil(widest);
        out.push_str(&format!(
            "{:>4} | {} {} ({})\n",
            group.marks,
            "#".repeat(bar_width),
            group.count,
            group.names.join(", ")
        ));
    }
    out
}
