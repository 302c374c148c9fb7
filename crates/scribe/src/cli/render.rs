use super::styles;
use chrono::{DateTime, Utc};
use console::Style;
use scribeapp::config::{ScribeConfig, ScribePaths};
use scribeapp::markup::{preview, strip_markup};
use scribeapp::model::{Note, TrashedNote};
use scribeapp::workspace::{Notice, NoticeLevel};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 80;
const INDEX_WIDTH: usize = 5;
const TIME_WIDTH: usize = 16;
const PREVIEW_CHARS: usize = 72;
const UNTITLED: &str = "(untitled)";
const TRUNCATION: char = '…';

pub fn render_note_list(notes: &[&Note], now: DateTime<Utc>, peek: bool) -> String {
    if notes.is_empty() {
        return "No notes found.\n".to_string();
    }
    let mut out = String::new();
    for (i, note) in notes.iter().enumerate() {
        out.push_str(&list_row(
            i + 1,
            &styles::INDEX,
            &note.title,
            &format_time_ago(note.updated_at, now),
        ));
        if peek {
            let text = preview(&note.content, PREVIEW_CHARS);
            if !text.is_empty() {
                out.push_str(&format!(
                    "{}{}\n",
                    " ".repeat(INDEX_WIDTH),
                    styles::MUTED.apply_to(text)
                ));
            }
        }
    }
    out
}

pub fn render_trash_list(trashed: &[&TrashedNote], now: DateTime<Utc>) -> String {
    if trashed.is_empty() {
        return "Trash is empty.\n".to_string();
    }
    trashed
        .iter()
        .enumerate()
        .map(|(i, note)| {
            list_row(
                i + 1,
                &styles::DELETED_INDEX,
                &note.title,
                &format_time_ago(note.trashed_at, now),
            )
        })
        .collect()
}

fn list_row(index: usize, index_style: &Style, title: &str, time: &str) -> String {
    let index_col = format!("{:>width$}", format!("{}. ", index), width = INDEX_WIDTH);
    let title_width = LINE_WIDTH - INDEX_WIDTH - TIME_WIDTH;
    let title = truncate_to_width(display_title(title), title_width);
    let padding = title_width.saturating_sub(title.width());
    format!(
        "{}{}{}{}\n",
        index_style.apply_to(index_col),
        title,
        " ".repeat(padding),
        styles::TIME.apply_to(format!("{:>width$}", time, width = TIME_WIDTH))
    )
}

pub fn render_full_note(note: &Note, now: DateTime<Utc>) -> String {
    format!(
        "{}\n{}\n{}\n{}\n",
        styles::TITLE.apply_to(display_title(&note.title)),
        styles::TIME.apply_to(format!("updated {}", format_time_ago(note.updated_at, now))),
        styles::MUTED.apply_to("-".repeat(32)),
        note_text(&note.content)
    )
}

/// Markup as readable text: one line per block, blank blocks dropped.
pub fn note_text(markup: &str) -> String {
    strip_markup(markup)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|notice| {
            let style = match notice.level {
                NoticeLevel::Info => &*styles::INFO,
                NoticeLevel::Success => &*styles::SUCCESS,
                NoticeLevel::Warning => &*styles::WARNING,
                NoticeLevel::Error => &*styles::ERROR,
            };
            format!("{}\n", style.apply_to(&notice.content))
        })
        .collect()
}

pub fn render_config(config: &ScribeConfig, paths: &ScribePaths) -> String {
    format!(
        "notes_url = {}\nusers_url = {}\nautosave_ms = {}\nrequest_timeout_secs = {}\n{}\n",
        config.notes_url,
        config.users_url,
        config.autosave_ms,
        config.request_timeout_secs,
        styles::MUTED.apply_to(format!("# config file: {}", paths.config_file().display()))
    )
}

fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        UNTITLED
    } else {
        title
    }
}

pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now
        .signed_duration_since(timestamp)
        .to_std()
        .unwrap_or_default();
    timeago::Formatter::new().convert(elapsed)
}

/// Cuts `text` to at most `max` terminal columns, marking the cut.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(TRUNCATION.width().unwrap_or(1));
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push(TRUNCATION);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use scribeapp::model::{NoteId, TrashedId};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn note(id: i64, title: &str, content: &str, minutes_ago: i64) -> Note {
        Note {
            id: NoteId(id),
            owner_id: 1,
            title: title.to_string(),
            content: content.to_string(),
            updated_at: now() - Duration::minutes(minutes_ago),
        }
    }

    #[test]
    fn list_rows_are_numbered_and_aligned() {
        console::set_colors_enabled(false);
        let a = note(1, "Groceries", "<p>milk</p>", 3);
        let b = note(2, "日本語のタイトル", "<p>x</p>", 120);
        let out = render_note_list(&[&a, &b], now(), false);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. Groceries"));
        assert!(lines[0].ends_with("3 minutes ago"));
        assert!(lines[1].starts_with("  2. 日本語"));
        assert_eq!(lines[0].width(), LINE_WIDTH);
        assert_eq!(lines[1].width(), LINE_WIDTH);
    }

    #[test]
    fn empty_list_says_so() {
        assert_eq!(render_note_list(&[], now(), false), "No notes found.\n");
        assert_eq!(render_trash_list(&[], now()), "Trash is empty.\n");
    }

    #[test]
    fn peek_adds_preview_line() {
        console::set_colors_enabled(false);
        let a = note(1, "Plan", "<p>step one</p><p>step two</p>", 1);
        let out = render_note_list(&[&a], now(), true);
        assert!(out.contains("step one step two"));
    }

    #[test]
    fn blank_title_renders_placeholder() {
        console::set_colors_enabled(false);
        let a = note(1, "", "<p>x</p>", 1);
        assert!(render_note_list(&[&a], now(), false).contains(UNTITLED));
    }

    #[test]
    fn trash_rows_use_trashed_at() {
        console::set_colors_enabled(false);
        let t = TrashedNote {
            id: TrashedId(4),
            note_id: Some(NoteId(9)),
            owner_id: 1,
            title: "Old idea".into(),
            content: "<p>meh</p>".into(),
            trashed_at: now() - Duration::days(2),
            original_updated_at: None,
        };
        let out = render_trash_list(&[&t], now());
        assert!(out.starts_with("  1. Old idea"));
        assert!(out.trim_end().ends_with("2 days ago"));
    }

    #[test]
    fn full_note_shows_blocks_as_lines() {
        console::set_colors_enabled(false);
        let n = note(1, "Shopping", "<p>Milk</p><p></p><ul><li>Eggs</li></ul>", 0);
        let out = render_full_note(&n, now());
        assert!(out.starts_with("Shopping\n"));
        assert!(out.ends_with("Milk\nEggs\n"));
    }

    #[test]
    fn notices_render_one_per_line() {
        console::set_colors_enabled(false);
        let out = render_notices(&[Notice::success("Saved"), Notice::error("Transport error: timeout")]);
        assert_eq!(out, "Saved\nTransport error: timeout\n");
    }

    #[test]
    fn truncation_respects_wide_chars() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let cut = truncate_to_width("日本語日本語", 7);
        assert!(cut.width() <= 7);
        assert!(cut.ends_with(TRUNCATION));
    }
}
