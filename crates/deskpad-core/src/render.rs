use std::io::{self, IsTerminal, Write};

use anyhow::anyhow;
use chrono::Local;
use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::item::TodoItem;

pub const EMPTY_MESSAGE: &str = "No tasks.";

pub fn status_label(active_count: usize) -> String {
    format!("{active_count} task(s) pending")
}

#[derive(Debug, Clone)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let color_cfg = cfg.get("color").unwrap_or_else(|| "on".to_string());
        let color = match color_cfg.to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => true,
            "off" | "no" | "false" | "0" => false,
            other => return Err(anyhow!("invalid color setting: {other}")),
        };

        Ok(Self { color })
    }

    #[tracing::instrument(skip(self, items))]
    pub fn print_todo_list(
        &mut self,
        items: &[&TodoItem],
        active_count: usize,
    ) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();

        if items.is_empty() {
            writeln!(out, "{EMPTY_MESSAGE}")?;
            writeln!(out, "{}", status_label(active_count))?;
            return Ok(());
        }

        let headers = ["ID", "Done", "Created", "Description"];
        let mut rows = Vec::with_capacity(items.len());

        for item in items {
            let id = self.paint(&item.id.to_string(), "33");
            let done = if item.completed {
                self.paint("[x]", "32")
            } else {
                "[ ]".to_string()
            };
            let created = item
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string();

            rows.push(vec![id, done, created, item.text.clone()]);
        }

        write_table(&mut out, &headers, rows)?;
        writeln!(out, "{}", status_label(active_count))?;
        Ok(())
    }

    pub fn print_calc_display(&mut self, display: &str) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{display}")?;
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color || !io::stdout().is_terminal() {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_table<W: Write>(
    mut writer: W,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| UnicodeWidthStr::width(*header))
        .collect();

    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    for (&width, header) in widths.iter().zip(headers) {
        write!(writer, "{header:width$} ")?;
    }
    writeln!(writer)?;

    for &width in &widths {
        write!(writer, "{:-<width$} ", "")?;
    }
    writeln!(writer)?;

    for row in rows {
        for (width, cell) in widths.iter().zip(&row) {
            let visible = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            let padding = width.saturating_sub(visible);
            write!(writer, "{}{} ", cell, " ".repeat(padding))?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' {
            for skipped in chars.by_ref() {
                if skipped == 'm' {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_label_counts_pending_items() {
        assert_eq!(status_label(0), "0 task(s) pending");
        assert_eq!(status_label(3), "3 task(s) pending");
    }

    #[test]
    fn strip_ansi_removes_color_codes() {
        let painted = "\x1b[33m123\x1b[0m";
        assert_eq!(strip_ansi(painted), "123");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    fn table_columns_align_on_visible_width() {
        let headers = ["ID", "Description"];
        let rows = vec![
            vec!["\x1b[33m1\x1b[0m".to_string(), "short".to_string()],
            vec!["12345".to_string(), "a longer description".to_string()],
        ];

        let mut buf = Vec::new();
        write_table(&mut buf, &headers, rows).expect("table should render");
        let rendered = String::from_utf8(buf).expect("table output is utf-8");

        let stripped: Vec<String> = rendered.lines().map(strip_ansi).collect();
        assert!(stripped[0].starts_with("ID    "));
        assert!(stripped[2].starts_with("1     short"));
        assert!(stripped[3].starts_with("12345 a longer description"));
    }
}
