//! Plain-text rendering for the terminal.

use std::io::{self, BufRead, Write};

use klinik_core::screen::{ChartPoint, ChartRenderer, FieldKind, FieldView, RowView};

const BAR_WIDTH: u64 = 40;

/// Format rows as an aligned table with a header line.
pub fn table(columns: &[&str], rows: &[RowView]) -> String {
    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|row| row.cells.iter().map(String::as_str).collect())
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for line in &cells {
        for (i, cell) in line.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, columns, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths);
    for line in &cells {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[&str], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

/// Describe a form's fields, one per line.
pub fn fields(fields: &[FieldView]) -> String {
    let mut out = String::new();
    for field in fields {
        let marker = if field.required { "*" } else { " " };
        let hint = match field.kind {
            FieldKind::Text => "teks".to_string(),
            FieldKind::Date => "YYYY-MM-DD".to_string(),
            FieldKind::Choice(choices) => choices.join(" | "),
            FieldKind::Reference(_) => field
                .options
                .iter()
                .map(|o| format!("{}={}", o.id, o.name))
                .collect::<Vec<_>>()
                .join(", "),
        };
        out.push_str(&format!("{}{:<16} {:<14} {}\n", marker, field.name, field.label, hint));
    }
    out
}

/// Horizontal bar chart drawn with `#`.
#[derive(Debug, Default)]
pub struct TextChart {
    pub output: String,
}

impl TextChart {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChartRenderer for TextChart {
    fn render(&mut self, title: &str, points: &[ChartPoint]) {
        self.output.push_str(title);
        self.output.push('\n');
        if points.is_empty() {
            self.output.push_str("(belum ada data)\n");
            return;
        }
        let max = points.iter().map(|p| u64::from(p.value)).max().unwrap_or(1).max(1);
        let label_width = points.iter().map(|p| p.category.chars().count()).max().unwrap_or(0);
        for point in points {
            let len = (u64::from(point.value) * BAR_WIDTH).div_ceil(max) as usize;
            self.output.push_str(&format!(
                "{:<width$} | {} {}\n",
                point.category,
                "#".repeat(len),
                point.value,
                width = label_width
            ));
        }
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`ya` is a no.
pub fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "ya" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_aligns_columns() {
        let rows = vec![
            RowView {
                id: 1,
                code: "1".into(),
                cells: vec!["1".into(), "Aloysia".into(), "0887".into()],
            },
            RowView {
                id: 12,
                code: "12".into(),
                cells: vec!["12".into(), "Budi".into(), "08123456".into()],
            },
        ];
        let text = table(&["ID", "Nama", "Telepon"], &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID  Nama     Telepon");
        assert_eq!(lines[1], "--  -------  --------");
        assert_eq!(lines[2], "1   Aloysia  0887");
        assert_eq!(lines[3], "12  Budi     08123456");
    }

    #[test]
    fn test_chart_scales_to_longest_bar() {
        let mut chart = TextChart::new();
        chart.render(
            "GRAFIK PASIEN",
            &[
                ChartPoint { category: "Jan".into(), value: 4 },
                ChartPoint { category: "Feb".into(), value: 1 },
            ],
        );
        let lines: Vec<&str> = chart.output.lines().collect();
        assert_eq!(lines[0], "GRAFIK PASIEN");
        assert_eq!(lines[1], format!("Jan | {} 4", "#".repeat(40)));
        assert_eq!(lines[2], format!("Feb | {} 1", "#".repeat(10)));
    }

    #[test]
    fn test_chart_handles_huge_counts() {
        let mut chart = TextChart::new();
        chart.render(
            "GRAFIK PASIEN",
            &[
                ChartPoint { category: "Jan".into(), value: u32::MAX },
                ChartPoint { category: "Feb".into(), value: u32::MAX / 2 },
            ],
        );
        let lines: Vec<&str> = chart.output.lines().collect();
        assert_eq!(lines[1], format!("Jan | {} {}", "#".repeat(40), u32::MAX));
        assert!(lines[2].starts_with(&format!("Feb | {} ", "#".repeat(20))));
    }

    #[test]
    fn test_empty_chart() {
        let mut chart = TextChart::new();
        chart.render("GRAFIK PASIEN", &[]);
        assert!(chart.output.ends_with("(belum ada data)\n"));
    }
}
