//! Interactive editing loop.
//!
//! Stdin is read on a helper thread and forwarded over a channel. The main
//! thread waits on that channel with a timeout equal to the time left before
//! the autosave deadline, so a save happens after the quiet period even while
//! the user is idle.

use super::commands::with_hint;
use super::handlers::resolve_note;
use super::render;
use super::styles;
use anyhow::{anyhow, Result};
use chrono::Utc;
use scribeapp::editor::BufferEditor;
use scribeapp::filter::NoteFilter;
use scribeapp::model::NoteId;
use scribeapp::session::{CommitOutcome, SessionState};
use scribeapp::store::NoteStore;
use scribeapp::workspace::Workspace;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

const IDLE_WAIT: Duration = Duration::from_secs(3600);

const HELP: &str = "\
Type text to append a paragraph. Commands:
  :title <text>   set the title (stops automatic titles)
  :clear          empty the note (it moves to the trash when you leave it)
  :save           save now
  :new            start a new note
  :open <n>       open note n from the list
  :list           show the list
  :delete         move the current note to the trash
  :show           show the current draft
  :q, :quit       save and exit
  :q!             exit without saving
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    Append(String),
    Title(String),
    Clear,
    Save,
    New,
    Open(usize),
    List,
    Delete,
    Show,
    Help,
    Quit,
    ForceQuit,
    Invalid(String),
}

impl EditCommand {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix(':') else {
            return EditCommand::Append(line.trim_end().to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (rest, ""),
        };
        match name {
            "title" => EditCommand::Title(arg.to_string()),
            "clear" => EditCommand::Clear,
            "save" | "w" => EditCommand::Save,
            "new" => EditCommand::New,
            "open" => match arg.parse() {
                Ok(n) => EditCommand::Open(n),
                Err(_) => EditCommand::Invalid(format!("`:open` needs a list index, got \"{}\"", arg)),
            },
            "list" | "ls" => EditCommand::List,
            "delete" | "rm" => EditCommand::Delete,
            "show" => EditCommand::Show,
            "help" | "h" => EditCommand::Help,
            "q" | "quit" => EditCommand::Quit,
            "q!" | "quit!" => EditCommand::ForceQuit,
            other => EditCommand::Invalid(format!("Unknown command `:{}`", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_session<S: NoteStore>(
    ws: &mut Workspace<S, BufferEditor>,
    start: Option<NoteId>,
) -> Result<()> {
    let mut out = io::stdout();
    let opened = match start {
        Some(id) => ws.open_note(id),
        None => ws.new_note(),
    }
    .map_err(with_hint)?;
    if !opened {
        print_notices(ws, &mut out)?;
    }
    show_draft(ws, &mut out)?;
    writeln!(out, "{}", styles::MUTED.apply_to("Type :help for commands."))?;

    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    loop {
        let now = Instant::now();
        let wait = ws
            .autosave_deadline()
            .map(|deadline| deadline.saturating_duration_since(now))
            .unwrap_or(IDLE_WAIT);
        match rx.recv_timeout(wait) {
            Ok(line) => {
                if apply(ws, EditCommand::parse(&line), Instant::now(), &mut out)? == Flow::Quit {
                    return Ok(());
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("stdin closed, leaving editor");
                break;
            }
        }
        if let Some(outcome) = ws.tick(Instant::now()).map_err(with_hint)? {
            report(&outcome, &mut out)?;
        }
        print_notices(ws, &mut out)?;
    }

    // Input is gone, so an unsaved draft can only be shown.
    let flushed = ws.new_note().map_err(with_hint)?;
    print_notices(ws, &mut out)?;
    if !flushed {
        writeln!(out, "{}", styles::WARNING.apply_to("Unsaved draft:"))?;
        writeln!(out, "{}", render::note_text(&ws.session().draft_content))?;
        return Err(anyhow!("Your draft could not be saved"));
    }
    Ok(())
}

pub fn apply<S: NoteStore, W: Write>(
    ws: &mut Workspace<S, BufferEditor>,
    command: EditCommand,
    now: Instant,
    out: &mut W,
) -> Result<Flow> {
    match command {
        EditCommand::Append(text) => {
            if !text.trim().is_empty() {
                ws.editor_mut().append_paragraph(&text);
                ws.editor_changed(now);
            }
        }
        EditCommand::Title(title) => ws.rename(&title, now),
        EditCommand::Clear => {
            ws.editor_mut().clear();
            ws.editor_changed(now);
            if ws.state() == SessionState::PendingTrash {
                writeln!(
                    out,
                    "{}",
                    styles::INFO.apply_to("Note emptied. It moves to the trash when you leave it.")
                )?;
            }
        }
        EditCommand::Save => {
            if let Some(outcome) = ws.save().map_err(with_hint)? {
                report(&outcome, out)?;
            }
        }
        EditCommand::New => {
            if ws.new_note().map_err(with_hint)? {
                writeln!(out, "{}", styles::INFO.apply_to("New note."))?;
            }
        }
        EditCommand::Open(index) => match resolve_note(ws, index) {
            Ok(id) => {
                if ws.open_note(id).map_err(with_hint)? {
                    show_draft(ws, out)?;
                }
            }
            Err(err) => writeln!(out, "{}", styles::ERROR.apply_to(err))?,
        },
        EditCommand::List => write!(
            out,
            "{}",
            render::render_note_list(&ws.list(&NoteFilter::default()), Utc::now(), false)
        )?,
        EditCommand::Delete => match ws.selected() {
            Some(id) => {
                ws.delete(id).map_err(with_hint)?;
            }
            None => writeln!(out, "{}", styles::INFO.apply_to("No saved note is open."))?,
        },
        EditCommand::Show => show_draft(ws, out)?,
        EditCommand::Help => write!(out, "{}", HELP)?,
        EditCommand::Quit => {
            if ws.new_note().map_err(with_hint)? {
                print_notices(ws, out)?;
                return Ok(Flow::Quit);
            }
            writeln!(
                out,
                "{}",
                styles::WARNING.apply_to("Use :save to try again, or :q! to quit without saving.")
            )?;
        }
        EditCommand::ForceQuit => return Ok(Flow::Quit),
        EditCommand::Invalid(message) => writeln!(out, "{}", styles::ERROR.apply_to(message))?,
    }
    Ok(Flow::Continue)
}

fn report<W: Write>(outcome: &CommitOutcome, out: &mut W) -> io::Result<()> {
    let message = match outcome {
        CommitOutcome::Created(note) => format!("Saved new note \"{}\"", note.title),
        CommitOutcome::Updated(note) => format!("Saved \"{}\"", note.title),
        CommitOutcome::Discarded(_) => {
            "Emptied note discarded. It moves to the trash when you leave it.".to_string()
        }
        CommitOutcome::Unchanged | CommitOutcome::Queued | CommitOutcome::Stale(_) => {
            return Ok(())
        }
    };
    writeln!(out, "{}", styles::SUCCESS.apply_to(message))
}

fn show_draft<S: NoteStore, W: Write>(ws: &Workspace<S, BufferEditor>, out: &mut W) -> io::Result<()> {
    let session = ws.session();
    let title = session.title_for_save();
    let heading = if title.is_empty() { "(new note)".to_string() } else { title };
    writeln!(out, "{}", styles::TITLE.apply_to(heading))?;
    let body = render::note_text(&session.draft_content);
    if !body.is_empty() {
        writeln!(out, "{}", body)?;
    }
    Ok(())
}

fn print_notices<S: NoteStore, W: Write>(
    ws: &mut Workspace<S, BufferEditor>,
    out: &mut W,
) -> io::Result<()> {
    let notices = ws.drain_notices();
    if !notices.is_empty() {
        write!(out, "{}", render::render_notices(&notices))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribeapp::store::memory::{InMemoryStore, SimulatedFailure, StoreCall};

    fn workspace(seed: &[(&str, &str)]) -> Workspace<InMemoryStore, BufferEditor> {
        let mut store = InMemoryStore::new();
        for (title, content) in seed {
            store.create(title, content).unwrap();
        }
        store.clear_calls();
        let mut ws = Workspace::new(store, BufferEditor::new(), Duration::from_millis(2000));
        ws.refresh().unwrap();
        ws
    }

    fn run(ws: &mut Workspace<InMemoryStore, BufferEditor>, line: &str) -> (Flow, String) {
        console::set_colors_enabled(false);
        let mut out = Vec::new();
        let flow = apply(ws, EditCommand::parse(line), Instant::now(), &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parse_plain_lines_as_text() {
        assert_eq!(EditCommand::parse("hello there"), EditCommand::Append("hello there".into()));
        assert_eq!(EditCommand::parse("  :q "), EditCommand::Quit);
        assert_eq!(EditCommand::parse(":title  Weekly plan "), EditCommand::Title("Weekly plan".into()));
        assert_eq!(EditCommand::parse(":open 3"), EditCommand::Open(3));
        assert_eq!(EditCommand::parse(":q!"), EditCommand::ForceQuit);
    }

    #[test]
    fn parse_rejects_bad_commands() {
        assert!(matches!(EditCommand::parse(":open x"), EditCommand::Invalid(_)));
        assert!(matches!(EditCommand::parse(":frobnicate"), EditCommand::Invalid(_)));
    }

    #[test]
    fn typed_lines_are_saved_on_save() {
        let mut ws = workspace(&[]);
        ws.new_note().unwrap();
        run(&mut ws, "Hello world");
        let (_, out) = run(&mut ws, ":save");

        assert_eq!(out, "Saved new note \"Hello world\"\n");
        assert_eq!(
            ws.store().write_calls(),
            vec![StoreCall::Create {
                title: "Hello world".into(),
                content: "<p>Hello world</p>".into(),
            }]
        );
    }

    #[test]
    fn title_command_overrides_auto_title() {
        let mut ws = workspace(&[]);
        run(&mut ws, "some text here");
        run(&mut ws, ":title Groceries");
        run(&mut ws, ":save");
        assert_eq!(ws.list(&NoteFilter::default())[0].title, "Groceries");
    }

    #[test]
    fn clear_holds_note_until_leaving() {
        let mut ws = workspace(&[("Foo", "<p>Foo</p>")]);
        run(&mut ws, ":open 1");
        let (_, out) = run(&mut ws, ":clear");
        assert!(out.contains("moves to the trash"));
        assert!(ws.store().write_calls().is_empty());

        run(&mut ws, ":new");
        assert_eq!(ws.store().write_calls(), vec![StoreCall::SoftDelete(NoteId(1))]);
    }

    #[test]
    fn open_bad_index_reports_error() {
        let mut ws = workspace(&[("Foo", "<p>Foo</p>")]);
        let (flow, out) = run(&mut ws, ":open 9");
        assert_eq!(flow, Flow::Continue);
        assert!(out.contains("No note at index 9"));
    }

    #[test]
    fn quit_ends_the_loop() {
        let mut ws = workspace(&[]);
        assert_eq!(run(&mut ws, ":quit").0, Flow::Quit);
    }

    #[test]
    fn quit_keeps_draft_when_save_fails() {
        let mut ws = workspace(&[]);
        run(&mut ws, "precious words");
        ws.store().set_simulate_failure(Some(SimulatedFailure::Transport));

        let (flow, out) = run(&mut ws, ":q");

        assert_eq!(flow, Flow::Continue);
        assert!(out.contains(":q!"));
        assert_eq!(ws.session().draft_content, "<p>precious words</p>");
        assert_eq!(run(&mut ws, ":q!").0, Flow::Quit);
    }

    #[test]
    fn delete_without_saved_note_is_harmless() {
        let mut ws = workspace(&[]);
        let (_, out) = run(&mut ws, ":delete");
        assert!(out.contains("No saved note is open"));
        assert!(ws.store().write_calls().is_empty());
    }
}
