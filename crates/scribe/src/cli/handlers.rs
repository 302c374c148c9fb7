use super::commands::{with_hint, AppContext};
use super::edit;
use super::render;
use super::setup::ConfigCommands;
use super::styles;
use anyhow::{anyhow, Result};
use chrono::Utc;
use console::Term;
use scribeapp::auth::{clear_token, save_token, validate_username, AuthClient};
use scribeapp::config::ScribeConfig;
use scribeapp::editor::EditorAdapter;
use scribeapp::filter::NoteFilter;
use scribeapp::model::{NoteId, TrashedId};
use scribeapp::store::NoteStore;
use scribeapp::workspace::Workspace;

pub fn register(ctx: &AppContext, username: &str) -> Result<()> {
    let username = validate_username(username)?;
    let password = prompt_password()?;
    let client = AuthClient::new(&ctx.config.users_url, ctx.config.request_timeout())?;
    let user = client.register(username, &password)?;
    println!(
        "{}",
        styles::SUCCESS.apply_to(format!("{} (id {})", user.message, user.id))
    );
    println!("Run `scribe login {}` to start.", username);
    Ok(())
}

pub fn login(ctx: &AppContext, username: &str) -> Result<()> {
    let username = validate_username(username)?;
    let password = prompt_password()?;
    let client = AuthClient::new(&ctx.config.users_url, ctx.config.request_timeout())?;
    let token = client.login(username, &password)?;
    save_token(&ctx.paths.token_file(), &token)?;
    println!("{}", styles::SUCCESS.apply_to(format!("Logged in as {}", username)));
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    if clear_token(&ctx.paths.token_file())? {
        println!("{}", styles::SUCCESS.apply_to("Logged out."));
    } else {
        println!("{}", styles::INFO.apply_to("Not logged in."));
    }
    Ok(())
}

pub fn list(ctx: &AppContext, search: Option<String>, peek: bool) -> Result<()> {
    let ws = ctx.workspace()?;
    let filter = search.map(NoteFilter::search).unwrap_or_default();
    print!(
        "{}",
        render::render_note_list(&ws.list(&filter), Utc::now(), peek)
    );
    Ok(())
}

pub fn view(ctx: &AppContext, index: usize) -> Result<()> {
    let ws = ctx.workspace()?;
    let id = resolve_note(&ws, index)?;
    let note = ws
        .notes()
        .get(id)
        .ok_or_else(|| anyhow!("No note at index {}", index))?;
    print!("{}", render::render_full_note(note, Utc::now()));
    Ok(())
}

pub fn edit(ctx: &AppContext, index: Option<usize>) -> Result<()> {
    let mut ws = ctx.workspace()?;
    let start = index.map(|i| resolve_note(&ws, i)).transpose()?;
    edit::run_session(&mut ws, start)
}

pub fn delete(ctx: &AppContext, indexes: &[usize]) -> Result<()> {
    let mut ws = ctx.workspace()?;
    let ids = resolve_notes(&ws, indexes)?;
    for id in ids {
        ws.delete(id).map_err(with_hint)?;
    }
    print!("{}", render::render_notices(&ws.drain_notices()));
    Ok(())
}

pub fn trash(ctx: &AppContext) -> Result<()> {
    let ws = ctx.workspace()?;
    print!("{}", render::render_trash_list(&ws.trash(), Utc::now()));
    Ok(())
}

pub fn restore(ctx: &AppContext, indexes: &[usize]) -> Result<()> {
    let mut ws = ctx.workspace()?;
    let ids = resolve_trashed(&ws, indexes)?;
    for id in ids {
        ws.restore(id).map_err(with_hint)?;
    }
    print!("{}", render::render_notices(&ws.drain_notices()));
    Ok(())
}

pub fn purge(ctx: &AppContext, indexes: &[usize], yes: bool) -> Result<()> {
    let mut ws = ctx.workspace()?;
    let ids = resolve_trashed(&ws, indexes)?;
    if !yes && !confirm(&format!("Permanently delete {} note(s)?", ids.len()))? {
        println!("{}", styles::INFO.apply_to("Nothing deleted."));
        return Ok(());
    }
    for id in ids {
        ws.purge(id).map_err(with_hint)?;
    }
    print!("{}", render::render_notices(&ws.drain_notices()));
    Ok(())
}

pub fn config(ctx: &AppContext, action: Option<ConfigCommands>) -> Result<()> {
    match action {
        None => print!("{}", render::render_config(&ctx.config, &ctx.paths)),
        Some(ConfigCommands::Gen) => print!("{}", ScribeConfig::template()),
        Some(ConfigCommands::Path) => println!("{}", ctx.paths.config_file().display()),
    }
    Ok(())
}

/// Maps a 1-based `scribe list` index to a note id.
pub fn resolve_note<S: NoteStore, E: EditorAdapter>(
    ws: &Workspace<S, E>,
    index: usize,
) -> Result<NoteId> {
    let listed = ws.list(&NoteFilter::default());
    index
        .checked_sub(1)
        .and_then(|i| listed.get(i))
        .map(|note| note.id)
        .ok_or_else(|| anyhow!("No note at index {} (there are {})", index, listed.len()))
}

fn resolve_notes<S: NoteStore, E: EditorAdapter>(
    ws: &Workspace<S, E>,
    indexes: &[usize],
) -> Result<Vec<NoteId>> {
    let mut ids = Vec::new();
    for &index in indexes {
        let id = resolve_note(ws, index)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn resolve_trashed<S: NoteStore, E: EditorAdapter>(
    ws: &Workspace<S, E>,
    indexes: &[usize],
) -> Result<Vec<TrashedId>> {
    let trashed = ws.trash();
    let mut ids = Vec::new();
    for &index in indexes {
        let id = index
            .checked_sub(1)
            .and_then(|i| trashed.get(i))
            .map(|note| note.id)
            .ok_or_else(|| anyhow!("No trashed note at index {} (there are {})", index, trashed.len()))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn prompt_password() -> Result<String> {
    let term = Term::stderr();
    term.write_str("Password: ")?;
    Ok(term.read_secure_line()?)
}

fn confirm(question: &str) -> Result<bool> {
    let term = Term::stderr();
    term.write_str(&format!("{} [y/N] ", question))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribeapp::editor::BufferEditor;
    use scribeapp::store::memory::InMemoryStore;
    use std::time::Duration;

    fn workspace() -> Workspace<InMemoryStore, BufferEditor> {
        let mut store = InMemoryStore::new();
        store.create("Oldest", "<p>1</p>").unwrap();
        store.create("Middle", "<p>2</p>").unwrap();
        store.create("Newest", "<p>3</p>").unwrap();
        let binned = store.create("Binned", "<p>4</p>").unwrap();
        store.soft_delete(binned.id).unwrap();
        let mut ws = Workspace::new(store, BufferEditor::new(), Duration::from_millis(10));
        ws.refresh().unwrap();
        ws
    }

    #[test]
    fn index_one_is_most_recent() {
        let ws = workspace();
        assert_eq!(resolve_note(&ws, 1).unwrap(), NoteId(3));
        assert_eq!(resolve_note(&ws, 3).unwrap(), NoteId(1));
    }

    #[test]
    fn out_of_range_indexes_fail() {
        let ws = workspace();
        assert!(resolve_note(&ws, 0).is_err());
        let err = resolve_note(&ws, 4).unwrap_err();
        assert!(err.to_string().contains("there are 3"));
    }

    #[test]
    fn duplicate_indexes_collapse() {
        let ws = workspace();
        assert_eq!(resolve_notes(&ws, &[2, 2, 1]).unwrap(), vec![NoteId(2), NoteId(3)]);
    }

    #[test]
    fn trash_indexes_resolve_against_trash() {
        let ws = workspace();
        assert_eq!(resolve_trashed(&ws, &[1]).unwrap().len(), 1);
        assert!(resolve_trashed(&ws, &[2]).is_err());
    }
}
