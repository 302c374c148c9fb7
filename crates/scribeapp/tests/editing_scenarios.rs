use scribeapp::editor::{BufferEditor, EditorAdapter};
use scribeapp::filter::NoteFilter;
use scribeapp::model::NoteId;
use scribeapp::session::{CommitOutcome, SessionState};
use scribeapp::store::memory::{InMemoryStore, SimulatedFailure, StoreCall};
use scribeapp::store::NoteStore;
use scribeapp::workspace::{NoticeLevel, Workspace};
use std::time::{Duration, Instant};

const QUIET: Duration = Duration::from_millis(2000);

struct Clock(Instant);

impl Clock {
    fn new() -> Self {
        Self(Instant::now())
    }

    fn advance(&mut self, ms: u64) -> Instant {
        self.0 += Duration::from_millis(ms);
        self.0
    }
}

fn setup(seed: &[(&str, &str)]) -> Workspace<InMemoryStore, BufferEditor> {
    let mut store = InMemoryStore::new();
    for (title, content) in seed {
        store.create(title, content).unwrap();
    }
    store.clear_calls();
    let mut ws = Workspace::new(store, BufferEditor::new(), QUIET);
    ws.refresh().unwrap();
    ws
}

fn type_text(ws: &mut Workspace<InMemoryStore, BufferEditor>, clock: &mut Clock, markup: &str) {
    let now = clock.advance(150);
    ws.editor_mut().replace_all(markup);
    ws.editor_changed(now);
}

fn writes(ws: &Workspace<InMemoryStore, BufferEditor>) -> Vec<StoreCall> {
    ws.store().write_calls()
}

#[test]
fn typing_hello_world_creates_exactly_one_note() {
    let mut clock = Clock::new();
    let mut ws = setup(&[]);
    ws.new_note().unwrap();

    type_text(&mut ws, &mut clock, "<p>Hello</p>");
    type_text(&mut ws, &mut clock, "<p>Hello world</p>");
    assert_eq!(ws.tick(clock.advance(100)).unwrap(), None);

    let outcome = ws.tick(clock.advance(QUIET.as_millis() as u64)).unwrap();
    let created = match outcome {
        Some(CommitOutcome::Created(note)) => note,
        other => panic!("Expected Created, got {other:?}"),
    };

    assert_eq!(
        writes(&ws),
        vec![StoreCall::Create {
            title: "Hello world".into(),
            content: "<p>Hello world</p>".into(),
        }]
    );
    assert_eq!(ws.session().selected_note_id, Some(created.id));
    assert_eq!(ws.list(&NoteFilter::default())[0].id, created.id);
}

#[test]
fn many_quick_edits_save_once() {
    let mut clock = Clock::new();
    let mut ws = setup(&[("Log", "<p>day 0</p>")]);
    ws.open_note(NoteId(1)).unwrap();

    for day in 1..=25 {
        type_text(&mut ws, &mut clock, &format!("<p>day {}</p>", day));
        assert_eq!(ws.tick(clock.0).unwrap(), None);
    }
    assert!(ws.tick(clock.advance(2000)).unwrap().is_some());
    assert_eq!(ws.tick(clock.advance(5000)).unwrap(), None);

    assert_eq!(
        writes(&ws),
        vec![StoreCall::Update {
            id: NoteId(1),
            title: "day 25".into(),
            content: "<p>day 25</p>".into(),
        }]
    );
}

#[test]
fn clean_note_saves_nothing() {
    let mut ws = setup(&[("Foo", "<p>Foo</p>")]);
    ws.open_note(NoteId(1)).unwrap();
    assert_eq!(ws.state(), SessionState::Clean);

    assert_eq!(ws.save().unwrap(), Some(CommitOutcome::Unchanged));
    assert_eq!(ws.save().unwrap(), Some(CommitOutcome::Unchanged));
    assert!(ws.store().calls().is_empty());
}

#[test]
fn clear_then_retype_composes_new_content() {
    let mut clock = Clock::new();
    let mut ws = setup(&[("Foo", "<p>Foo</p>")]);
    ws.open_note(NoteId(1)).unwrap();

    type_text(&mut ws, &mut clock, "<p><br></p>");
    assert_eq!(ws.state(), SessionState::PendingTrash);
    assert!(ws.list(&NoteFilter::default()).is_empty());
    assert!(ws.trash().is_empty());
    assert!(writes(&ws).is_empty());

    type_text(&mut ws, &mut clock, "<p>Bar</p>");
    assert_eq!(ws.state(), SessionState::Composing);
    assert!(ws.session().pending_trash.is_none());
    assert!(ws.list(&NoteFilter::default()).is_empty());
    assert!(writes(&ws).is_empty());

    ws.tick(clock.advance(2500)).unwrap();
    assert_eq!(
        writes(&ws),
        vec![StoreCall::Create {
            title: "Bar".into(),
            content: "<p>Bar</p>".into(),
        }]
    );
}

#[test]
fn emptied_note_reaches_trash_only_on_navigation() {
    let mut clock = Clock::new();
    let mut ws = setup(&[("Foo", "<p>Foo</p>"), ("Other", "<p>other</p>")]);
    ws.open_note(NoteId(1)).unwrap();
    type_text(&mut ws, &mut clock, "");

    for _ in 0..3 {
        ws.tick(clock.advance(3000)).unwrap();
        assert!(!ws.list(&NoteFilter::default()).iter().any(|n| n.id == NoteId(1)));
        assert!(ws.trash().is_empty());
    }
    assert!(writes(&ws).is_empty());

    ws.open_note(NoteId(2)).unwrap();

    assert_eq!(writes(&ws), vec![StoreCall::SoftDelete(NoteId(1))]);
    assert_eq!(ws.trash().len(), 1);
    assert_eq!(ws.trash()[0].note_id, Some(NoteId(1)));
    assert_eq!(ws.editor().get_content(), "<p>other</p>");
}

#[test]
fn failed_update_is_retried_with_same_payload() {
    let mut clock = Clock::new();
    let mut ws = setup(&[("Foo", "<p>Foo</p>")]);
    ws.open_note(NoteId(1)).unwrap();
    type_text(&mut ws, &mut clock, "<p>Foo, revised</p>");
    let listed_before: Vec<_> = ws.notes().active().to_vec();

    ws.store().set_simulate_failure(Some(SimulatedFailure::Transport));
    assert_eq!(ws.tick(clock.advance(2500)).unwrap(), None);

    assert_eq!(ws.state(), SessionState::Editing);
    assert_eq!(ws.notes().active(), listed_before.as_slice());
    let notices = ws.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);

    ws.store().set_simulate_failure(None);
    assert!(matches!(ws.save().unwrap(), Some(CommitOutcome::Updated(_))));
    assert_eq!(ws.state(), SessionState::Clean);

    let calls = writes(&ws);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[test]
fn manual_title_is_kept_across_saves() {
    let mut clock = Clock::new();
    let mut ws = setup(&[]);
    type_text(&mut ws, &mut clock, "<p>a b c d e f g</p>");
    ws.rename("Alphabet", clock.advance(10));
    ws.tick(clock.advance(2500)).unwrap();

    type_text(&mut ws, &mut clock, "<p>a b c d e f g h</p>");
    ws.tick(clock.advance(2500)).unwrap();

    let titles: Vec<String> = writes(&ws)
        .into_iter()
        .map(|call| match call {
            StoreCall::Create { title, .. } | StoreCall::Update { title, .. } => title,
            other => panic!("unexpected call {other:?}"),
        })
        .collect();
    assert_eq!(titles, vec!["Alphabet", "Alphabet"]);
}

#[test]
fn long_content_gets_truncated_auto_title() {
    let mut clock = Clock::new();
    let mut ws = setup(&[]);
    type_text(
        &mut ws,
        &mut clock,
        "<h1>Meeting notes</h1><p>with the whole team today</p>",
    );
    ws.tick(clock.advance(2500)).unwrap();
    assert_eq!(ws.list(&NoteFilter::default())[0].title, "Meeting notes with the whole...");
}

#[test]
fn trash_round_trip_keeps_list_position() {
    let mut ws = setup(&[("First", "<p>1</p>"), ("Second", "<p>2</p>")]);
    let first_updated = ws.notes().get(NoteId(1)).unwrap().updated_at;

    assert!(ws.delete(NoteId(1)).unwrap());
    let trashed_id = ws.trash()[0].id;
    let restored = ws.restore(trashed_id).unwrap().unwrap();

    assert_ne!(restored.id, NoteId(1));
    assert_eq!(restored.updated_at, first_updated);
    let order: Vec<&str> = ws
        .list(&NoteFilter::default())
        .iter()
        .map(|n| n.title.as_str())
        .collect();
    assert_eq!(order, vec!["Second", "First"]);
    assert!(ws.trash().is_empty());
}

#[test]
fn expired_token_surfaces_to_caller() {
    let mut clock = Clock::new();
    let mut ws = setup(&[("Foo", "<p>Foo</p>")]);
    ws.open_note(NoteId(1)).unwrap();
    type_text(&mut ws, &mut clock, "<p>Foo!</p>");

    ws.store().set_simulate_failure(Some(SimulatedFailure::Auth));
    let err = ws.tick(clock.advance(2500)).unwrap_err();
    assert!(err.is_auth());
    assert_eq!(ws.session().draft_content, "<p>Foo!</p>");
}
