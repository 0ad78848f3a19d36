use colored::*;
use retrocat_listing::{Align, DataTable, FilterPackage, FilterValue, TableStatus};

const MAX_CELL_WIDTH: usize = 40;

fn truncate(cell: &str) -> String {
    if cell.chars().count() <= MAX_CELL_WIDTH {
        return cell.to_string();
    }
    let mut cut: String = cell.chars().take(MAX_CELL_WIDTH - 1).collect();
    cut.push('…');
    cut
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    let len = cell.chars().count();
    let gap = width.saturating_sub(len);
    match align {
        Align::Left => format!("{cell}{}", " ".repeat(gap)),
        Align::Right => format!("{}{cell}", " ".repeat(gap)),
        Align::Center => {
            let left = gap / 2;
            format!("{}{cell}{}", " ".repeat(left), " ".repeat(gap - left))
        }
    }
}

/// Lays out headers and rows as aligned text lines, headers first.
pub fn layout(headers: &[String], aligns: &[Align], rows: &[Vec<String>]) -> Vec<String> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .map(|row| row.iter().map(|cell| truncate(cell)).collect())
        .collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| pad(cell, *width, aligns.get(i).copied().unwrap_or(Align::Left)))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    std::iter::once(line(headers))
        .chain(rows.iter().map(|row| line(row)))
        .collect()
}

pub fn print_table(table: &DataTable) {
    let columns = table.columns();
    let headers = columns.headers();
    let aligns: Vec<Align> = columns.columns().iter().map(|column| column.align).collect();
    let lines = layout(&headers, &aligns, &table.rendered_rows());

    let (sort_field, sort_order) = table.sort();
    println!(
        "{} {}",
        table.entity().display_name().bold(),
        match sort_field {
            Some(field) => format!("(sorted by {field} {sort_order})"),
            None => String::new(),
        }
        .dimmed()
    );

    if let Some((header, body)) = lines.split_first() {
        println!("{}", header.bold().underline());
        for line in body {
            println!("{line}");
        }
    }
    if table.rows().is_empty() {
        println!("{}", "  no rows".dimmed());
    }

    let range = match table.row_range() {
        Some((first, last)) => format!("rows {first}–{last} of {}", table.total_items()),
        None => format!("0 of {}", table.total_items()),
    };
    println!(
        "{}",
        format!(
            "page {} of {} · {range}",
            table.shown_page(),
            table.total_pages().max(1)
        )
        .dimmed()
    );

    match table.status() {
        TableStatus::Error(message) => println!("{} {}", "✘".red().bold(), message.red()),
        TableStatus::Loading => println!("{}", "loading…".yellow()),
        TableStatus::Loaded => {}
    }
}

pub fn describe_value(value: &FilterValue) -> String {
    let bound = |value: Option<String>| value.unwrap_or_default();
    match value {
        FilterValue::Text(text) | FilterValue::Status(text) => text.clone(),
        FilterValue::Ids(ids) => ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(","),
        FilterValue::NumberRange { min, max } => format!(
            "{}..{}",
            bound(min.map(|v| v.to_string())),
            bound(max.map(|v| v.to_string()))
        ),
        FilterValue::DateRange { from, to } => format!(
            "{}..{}",
            bound(from.map(|d| d.to_string())),
            bound(to.map(|d| d.to_string()))
        ),
    }
}

pub fn print_filter_package(package: &FilterPackage) {
    println!("{} {}", "Filters for".bold(), package.entity().to_string().bold());
    let defaults = package.default_filters();
    let rows: Vec<Vec<String>> = package
        .fields()
        .iter()
        .map(|field| {
            vec![
                field.key.to_string(),
                field.label.to_string(),
                field.kind.syntax(),
                defaults.get(field.key).map(describe_value).unwrap_or_default(),
            ]
        })
        .collect();
    let headers = ["Key", "Label", "Syntax", "Default"].map(String::from);
    let lines = layout(&headers, &[], &rows);
    if let Some((header, body)) = lines.split_first() {
        println!("{}", header.bold().underline());
        for line in body {
            println!("{line}");
        }
    }
}

pub fn print_active_filters(table: &DataTable) {
    if table.filters().is_empty() {
        println!("{}", "no filters".dimmed());
        return;
    }
    for (key, value) in table.filters().iter() {
        println!("  {} = {}", key.cyan(), describe_value(value));
    }
}

pub fn print_success(message: &str) {
    println!("{} {}", "✔".green().bold(), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_pads_columns_by_alignment() {
        let headers = vec!["ID".to_string(), "Title".to_string()];
        let rows = vec![
            vec!["7".to_string(), "Zelda".to_string()],
            vec!["120".to_string(), "F-Zero".to_string()],
        ];
        let lines = layout(&headers, &[Align::Right, Align::Left], &rows);
        assert_eq!(lines, vec![" ID  Title", "  7  Zelda", "120  F-Zero"]);
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(60);
        let lines = layout(&["Name".to_string()], &[], &[vec![long]]);
        assert_eq!(lines[1].chars().count(), MAX_CELL_WIDTH);
        assert!(lines[1].ends_with('…'));
    }

    #[test]
    fn describes_open_ranges() {
        let value = FilterValue::NumberRange {
            min: Some(1990.0),
            max: None,
        };
        assert_eq!(describe_value(&value), "1990..");
    }
}
