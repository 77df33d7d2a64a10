//! `notes`: command line front-end for the notes API.
//!
//! Default API: http://127.0.0.1:8080 (override with --url or NOTES_API_URL)

use clap::{Parser, Subcommand};
use notes_client::NotesClient;
use notes_client::autosave::{AUTOSAVE_DELAY, AutosaveSession};
use notes_client::client::DEFAULT_API_URL;
use notes_client::editor::{NewNoteForm, NoteEditor};
use notes_client::list_view::{LoadState, NoteListView};
use notes_types::{NOTE_NOT_FOUND, Note, SortOrder};
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const PREVIEW_CHARS: usize = 80;
const DELETE_PROMPT: &str =
    "Are you sure you want to delete this note? This action cannot be undone.";

const EDIT_HELP: &str = "\
Type lines to append them to the note. Commands:
  :title TEXT   set the title
  :clear        empty the content
  :show         print the note as edited so far
  :w            save and exit
  :q            exit (refused while there are unsaved changes)
  :q!           discard changes and exit
  :delete       delete the note
A line starting with '::' is added with one ':' removed.";

#[derive(Parser, Debug)]
#[command(name = "notes", version, about = "Create, browse, edit and delete notes")]
struct Cli {
    /// Base URL of the notes API
    #[arg(long, global = true, env = "NOTES_API_URL", default_value = DEFAULT_API_URL)]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List notes
    List {
        /// Only show notes whose title or content contains this text
        #[arg(long, short)]
        search: Option<String>,
        /// latest or oldest
        #[arg(long, default_value = "latest")]
        sort: SortOrder,
    },
    /// Print one note
    Show { id: String },
    /// Create a note
    New {
        #[arg(long, short)]
        title: String,
        #[arg(long, short)]
        content: Option<String>,
    },
    /// Edit a note interactively, autosaving after a pause in typing
    Edit {
        id: String,
        #[arg(long, env = "NOTES_AUTOSAVE_SECS", default_value_t = AUTOSAVE_DELAY.as_secs())]
        autosave_secs: u64,
    },
    /// Delete a note
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let client = NotesClient::new(&cli.url);
    log::debug!("Using notes API at {}", client.base_url());

    let result = match cli.command {
        Command::List { search, sort } => list(&client, search, sort).await,
        Command::Show { id } => show(&client, &id).await,
        Command::New { title, content } => create(&client, title, content).await,
        Command::Edit { id, autosave_secs } => {
            edit(client, &id, Duration::from_secs(autosave_secs)).await
        }
        Command::Delete { id, yes } => delete(&client, &id, yes).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(banner) => {
            eprintln!("{}", banner);
            ExitCode::FAILURE
        }
    }
}

// =====================================================
// Commands
// =====================================================

async fn list(client: &NotesClient, search: Option<String>, sort: SortOrder) -> Result<(), String> {
    let mut view = NoteListView::new();
    view.search = search.unwrap_or_default();
    view.sort = sort;
    view.load(client).await;

    if let LoadState::Failed(msg) = view.state() {
        return Err(msg.clone());
    }

    let visible = view.visible();
    if visible.is_empty() {
        if view.total() == 0 {
            println!("No notes yet. Create one with `notes new --title TITLE`.");
        } else {
            println!("No notes match '{}'.", view.search);
        }
        return Ok(());
    }

    for note in &visible {
        println!("{}  {}  {}", note.created_at.format("%Y-%m-%d %H:%M"), note.id, note.title);
        if let Some(preview) = preview(&note.content) {
            println!("    {}", preview);
        }
    }
    println!("\n{} of {} notes ({})", visible.len(), view.total(), view.sort.as_str());
    Ok(())
}

async fn show(client: &NotesClient, id: &str) -> Result<(), String> {
    match client.get_note(id).await {
        Ok(note) => {
            print_note(&note);
            Ok(())
        }
        Err(e) if e.is_not_found() => Err(NOTE_NOT_FOUND.to_string()),
        Err(e) => {
            log::error!("Error fetching note: {}", e);
            Err(notes_client::editor::LOAD_FAILED.to_string())
        }
    }
}

async fn create(
    client: &NotesClient,
    title: String,
    content: Option<String>,
) -> Result<(), String> {
    let mut form = NewNoteForm::new();
    form.title = title;
    form.content = content.unwrap_or_default();

    match form.submit(client).await {
        Ok(note) => {
            println!("Created note {}", note.id);
            Ok(())
        }
        Err(e) => Err(form.error().map(str::to_string).unwrap_or_else(|| e.to_string())),
    }
}

async fn delete(client: &NotesClient, id: &str, yes: bool) -> Result<(), String> {
    if !yes {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        if !confirm(&mut lines, DELETE_PROMPT).await {
            println!("Cancelled.");
            return Ok(());
        }
    }

    match client.delete_note(id).await {
        Ok(message) => {
            println!("{}", message);
            Ok(())
        }
        Err(e) if e.is_not_found() => Err(NOTE_NOT_FOUND.to_string()),
        Err(e) => {
            log::error!("Error deleting note: {}", e);
            Err(notes_client::list_view::DELETE_FAILED.to_string())
        }
    }
}

async fn edit(client: NotesClient, id: &str, autosave: Duration) -> Result<(), String> {
    let client = Arc::new(client);
    let editor = NoteEditor::load(&client, id).await?;
    let session = AutosaveSession::new(editor, Arc::clone(&client), autosave);

    session.with_editor(print_editor);
    eprintln!("{}", EDIT_HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(format!("Failed to read input: {}", e)),
        };

        match parse_edit_command(&line) {
            EditCommand::Title(title) => session.set_title(title),
            EditCommand::Clear => session.set_content(""),
            EditCommand::Show => session.with_editor(print_editor),
            EditCommand::Line(text) => session.append_line(text),
            EditCommand::Save => return save_and_exit(&session).await,
            EditCommand::Quit { force } => {
                if !force && session.with_editor(NoteEditor::needs_confirm_on_cancel) {
                    eprintln!("You have unsaved changes. Use :w to save or :q! to discard them.");
                    continue;
                }
                session.cancel();
                return Ok(());
            }
            EditCommand::Delete => {
                if !confirm(&mut lines, DELETE_PROMPT).await {
                    continue;
                }
                return match session.delete().await {
                    Ok(()) => {
                        println!("Note deleted.");
                        Ok(())
                    }
                    Err(e) => Err(editor_banner(&session, e)),
                };
            }
        }
    }

    // end of input keeps what was typed, if it can be stored
    if session.with_editor(NoteEditor::has_unsaved_changes) {
        return save_and_exit(&session).await;
    }
    session.cancel();
    Ok(())
}

async fn save_and_exit(session: &AutosaveSession) -> Result<(), String> {
    match session.save().await {
        Ok(note) => {
            println!("Saved '{}' at {}", note.title, note.updated_at.format("%H:%M:%S"));
            Ok(())
        }
        Err(e) => Err(editor_banner(session, e)),
    }
}

fn editor_banner(session: &AutosaveSession, err: impl std::fmt::Display) -> String {
    session
        .with_editor(|e| e.error().map(str::to_string))
        .unwrap_or_else(|| err.to_string())
}

// =====================================================
// Edit commands
// =====================================================

#[derive(Debug, PartialEq, Eq)]
enum EditCommand<'a> {
    Title(&'a str),
    Clear,
    Show,
    Save,
    Quit { force: bool },
    Delete,
    Line(&'a str),
}

fn parse_edit_command(line: &str) -> EditCommand<'_> {
    if line.starts_with("::") {
        return EditCommand::Line(&line[1..]);
    }
    match line.trim_end() {
        ":w" | ":wq" => EditCommand::Save,
        ":q" => EditCommand::Quit { force: false },
        ":q!" => EditCommand::Quit { force: true },
        ":clear" => EditCommand::Clear,
        ":show" => EditCommand::Show,
        ":delete" => EditCommand::Delete,
        ":title" => EditCommand::Title(""),
        trimmed => match trimmed.strip_prefix(":title ") {
            Some(title) => EditCommand::Title(title),
            None => EditCommand::Line(line),
        },
    }
}

// =====================================================
// Output helpers
// =====================================================

async fn confirm(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    let _ = std::io::stdout().flush();
    match lines.next_line().await {
        Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

/// First non-blank line of `content`, shortened for list output
fn preview(content: &str) -> Option<String> {
    let line = content.lines().map(str::trim).find(|l| !l.is_empty())?;
    let mut out: String = line.chars().take(PREVIEW_CHARS).collect();
    if line.chars().count() > PREVIEW_CHARS {
        out.push_str("...");
    }
    Some(out)
}

fn print_note(note: &Note) {
    println!("{}", note.title);
    println!("id: {}", note.id);
    println!("created: {}", note.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("updated: {}", note.updated_at.format("%Y-%m-%d %H:%M:%S"));
    if !note.content.is_empty() {
        println!("\n{}", note.content);
    }
}

fn print_editor(editor: &NoteEditor) {
    println!("{}", editor.title);
    if let Some(at) = editor.last_saved() {
        println!("last saved {}", at.format("%Y-%m-%d %H:%M:%S"));
    }
    if editor.has_unsaved_changes() {
        println!("(unsaved changes)");
    }
    if !editor.content.is_empty() {
        println!("\n{}", editor.content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_edit_command(":w"), EditCommand::Save);
        assert_eq!(parse_edit_command(":wq  "), EditCommand::Save);
        assert_eq!(parse_edit_command(":q"), EditCommand::Quit { force: false });
        assert_eq!(parse_edit_command(":q!"), EditCommand::Quit { force: true });
        assert_eq!(parse_edit_command(":title Weekly plan"), EditCommand::Title("Weekly plan"));
        assert_eq!(parse_edit_command(":delete"), EditCommand::Delete);
    }

    #[test]
    fn test_plain_and_escaped_lines() {
        assert_eq!(parse_edit_command("buy milk"), EditCommand::Line("buy milk"));
        assert_eq!(parse_edit_command(""), EditCommand::Line(""));
        assert_eq!(parse_edit_command("::w"), EditCommand::Line(":w"));
        assert_eq!(parse_edit_command(":unknown"), EditCommand::Line(":unknown"));
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview(""), None);
        assert_eq!(preview("\n  \nsecond line\nthird").as_deref(), Some("second line"));

        let long = "x".repeat(PREVIEW_CHARS + 5);
        let shown = preview(&long).unwrap();
        assert!(shown.ends_with("..."));
        assert_eq!(shown.chars().count(), PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_cli_parses_sort_and_url() {
        let args = ["notes", "--url", "http://notes.local", "list", "--sort", "oldest"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.url, "http://notes.local");
        assert!(matches!(cli.command, Command::List { sort: SortOrder::Oldest, search: None }));

        assert!(Cli::try_parse_from(["notes", "list", "--sort", "sideways"]).is_err());
    }
}
