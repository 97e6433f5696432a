//! Rendering decision for conversation turns.
//!
//! Assistant replies that contain an exercise table header are parsed into a
//! [`Table`]; everything else is shown as markdown. Table detection is a
//! heuristic: when parsing fails the content falls back to markdown and no
//! error is raised.

use std::fmt;

use serde::Serialize;

use crate::turn::{Role, Turn};

/// Header that marks a reply as carrying an exercise table.
pub const EXERCISE_TABLE_HEADER: &str = "| Exercise | Sets | Reps |";

/// A parsed pipe-delimited table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// How a turn should be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Rendered {
    /// User text, shown as typed.
    Plain(String),
    /// Assistant text rendered as markdown.
    Markdown(String),
    /// Assistant text carrying an exercise table.
    Table(Table),
}

/// Rendering decision for one turn.
pub fn render_turn(turn: &Turn) -> Rendered {
    match turn.role {
        Role::User => Rendered::Plain(turn.content.clone()),
        Role::Assistant => render(&turn.content),
    }
}

/// Rendering decision for assistant content.
pub fn render(content: &str) -> Rendered {
    match parse_exercise_table(content) {
        Some(table) => Rendered::Table(table),
        None => Rendered::Markdown(content.to_string()),
    }
}

/// Parses the exercise table in `content`, if there is a well-formed one.
///
/// Starts at the line holding [`EXERCISE_TABLE_HEADER`] and reads
/// consecutive lines containing `|`. The first row gives the headers, the
/// second must be a `---` separator row, and the rest are data rows.
pub fn parse_exercise_table(content: &str) -> Option<Table> {
    let start = content.find(EXERCISE_TABLE_HEADER)?;
    let line_start = content[..start].rfind('\n').map_or(0, |i| i + 1);

    let mut rows = content[line_start..]
        .lines()
        .take_while(|line| line.contains('|'))
        .map(split_row)
        .filter(|cells| !cells.is_empty());

    let headers = rows.next()?;
    let separator = rows.next()?;
    if !is_separator(&separator) {
        return None;
    }

    Some(Table {
        headers,
        rows: rows.collect(),
    })
}

fn split_row(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_separator(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| c.contains('-') && c.chars().all(|ch| ch == '-' || ch == ':'))
}

impl fmt::Display for Table {
    /// Aligned plain-text layout, one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);

        let mut widths = vec![0usize; columns];
        for row in std::iter::once(&self.headers).chain(&self.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let write_row = |f: &mut fmt::Formatter<'_>, row: &[String]| -> fmt::Result {
            let line: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, &w)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{cell:<w$}")
                })
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())
        };

        write_row(f, &self.headers)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("  "))?;
        for row in &self.rows {
            write_row(f, row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn parses_minimal_exercise_table() {
        let table = parse_exercise_table("| Exercise | Sets | Reps |\n|---|---|---|\n| Squats | 3 | 10 |")
            .expect("table");
        assert_eq!(table.headers, strings(&["Exercise", "Sets", "Reps"]));
        assert_eq!(table.rows, vec![strings(&["Squats", "3", "10"])]);
    }

    #[test]
    fn markdown_without_header_is_not_a_table() {
        let content = "## Workout\nDo 10 pushups.";
        assert_eq!(render(content), Rendered::Markdown(content.to_string()));
    }

    #[test]
    fn table_inside_prose_is_found() {
        let content = "## Leg day\n\n\
            | Exercise | Sets | Reps | Rest |\n\
            |----------|------|------|------|\n\
            | Squats   | 3    | 10   | 60s  |\n\
            | Lunges   | 3    | 12   | 45s\n\
            \n\
            Stretch afterwards.";
        let table = parse_exercise_table(content).expect("table");
        assert_eq!(table.headers, strings(&["Exercise", "Sets", "Reps", "Rest"]));
        assert_eq!(
            table.rows,
            vec![
                strings(&["Squats", "3", "10", "60s"]),
                strings(&["Lunges", "3", "12", "45s"]),
            ]
        );
    }

    #[test]
    fn missing_separator_falls_back_to_markdown() {
        let content = "| Exercise | Sets | Reps |\n| Squats | 3 | 10 |";
        assert_eq!(parse_exercise_table(content), None);
        assert!(matches!(render(content), Rendered::Markdown(_)));
    }

    #[test]
    fn header_only_falls_back_to_markdown() {
        assert_eq!(parse_exercise_table("| Exercise | Sets | Reps |"), None);
    }

    #[test]
    fn other_tables_are_markdown() {
        let content = "| Calories | Protein |\n|---|---|\n| 450 | 35g |";
        assert!(matches!(render(content), Rendered::Markdown(_)));
    }

    #[test]
    fn separator_accepts_alignment_colons() {
        let content = "| Exercise | Sets | Reps |\n|:---|:---:|---:|\n| Plank | 3 | 30s |";
        let table = parse_exercise_table(content).expect("table");
        assert_eq!(table.rows, vec![strings(&["Plank", "3", "30s"])]);
    }

    #[test]
    fn user_turns_render_plain() {
        let turn = Turn::user("| Exercise | Sets | Reps |\n|---|---|---|");
        assert!(matches!(render_turn(&turn), Rendered::Plain(_)));
    }

    #[test]
    fn rendered_serializes_with_kind_tag() {
        let json = serde_json::to_value(render("hello")).unwrap();
        assert_eq!(json["kind"], "markdown");
        assert_eq!(json["value"], "hello");
    }

    #[test]
    fn table_display_aligns_columns() {
        let table = Table {
            headers: strings(&["Exercise", "Sets"]),
            rows: vec![strings(&["Push-ups", "3"]), strings(&["Plank", "2"])],
        };
        assert_eq!(
            table.to_string(),
            "Exercise  Sets\n--------  ----\nPush-ups  3\nPlank     2\n"
        );
    }
}
