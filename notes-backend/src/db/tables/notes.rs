//! Notes collection database operations

use rusqlite::{OptionalExtension, Result as SqliteResult, Row, params};
use uuid::Uuid;

use super::super::Database;
use super::super::sqlite::{format_timestamp, now, parse_timestamp};
use crate::error::NoteError;
use crate::models::{NewNote, Note, NoteChanges};

const NOTE_COLUMNS: &str = "id, title, content, created_at, updated_at";

fn row_to_note(row: &Row) -> SqliteResult<Note> {
    let created_at_str: String = row.get(3)?;
    let updated_at_str: String = row.get(4)?;

    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created_at: parse_timestamp(3, &created_at_str)?,
        updated_at: parse_timestamp(4, &updated_at_str)?,
    })
}

/// Canonical form of a client-supplied id.
fn parse_note_id(id: &str) -> Result<String, NoteError> {
    Uuid::parse_str(id.trim())
        .map(|uuid| uuid.to_string())
        .map_err(|_| NoteError::MalformedId(id.to_string()))
}

impl Database {
    /// Every note, in the order they were inserted
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes ORDER BY rowid",
            NOTE_COLUMNS
        ))?;

        let notes = stmt
            .query_map([], row_to_note)?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(notes)
    }

    /// Insert a note under a fresh id with both timestamps set to now
    pub fn create_note(&self, new_note: NewNote) -> Result<Note, NoteError> {
        let conn = self.conn()?;
        let now = now();
        let note = Note {
            id: Uuid::new_v4().to_string(),
            title: new_note.title,
            content: new_note.content,
            created_at: now,
            updated_at: now,
        };

        conn.execute(
            "INSERT INTO notes (id, title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![note.id, note.title, note.content, format_timestamp(&now)],
        )?;

        log::debug!("[NOTES] Created note {}", note.id);
        Ok(note)
    }

    pub fn get_note(&self, id: &str) -> Result<Note, NoteError> {
        let id = parse_note_id(id)?;
        let conn = self.conn()?;

        conn.query_row(
            &format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS),
            params![id],
            row_to_note,
        )
        .optional()?
        .ok_or(NoteError::NotFound)
    }

    /// Overwrite the supplied fields and refresh `updated_at`.
    ///
    /// A missing note is reported before a rejected title. `updated_at` never
    /// moves behind `created_at`, even if the clock steps backwards.
    pub fn update_note(&self, id: &str, changes: NoteChanges) -> Result<Note, NoteError> {
        let id = parse_note_id(id)?;
        let conn = self.conn()?;

        let changes = match changes.validated() {
            Ok(changes) => changes,
            Err(e) => {
                let exists: bool = conn.query_row(
                    "SELECT EXISTS(SELECT 1 FROM notes WHERE id = ?1)",
                    params![id],
                    |row| row.get(0),
                )?;
                return Err(if exists { e } else { NoteError::NotFound });
            }
        };

        let note = conn
            .query_row(
                &format!(
                    "UPDATE notes
                     SET title = COALESCE(?2, title),
                         content = COALESCE(?3, content),
                         updated_at = MAX(?4, created_at)
                     WHERE id = ?1
                     RETURNING {}",
                    NOTE_COLUMNS
                ),
                params![id, changes.title, changes.content, format_timestamp(&now())],
                row_to_note,
            )
            .optional()?
            .ok_or(NoteError::NotFound)?;

        log::debug!("[NOTES] Updated note {}", note.id);
        Ok(note)
    }

    pub fn delete_note(&self, id: &str) -> Result<(), NoteError> {
        let id = parse_note_id(id)?;
        let conn = self.conn()?;

        let deleted = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(NoteError::NotFound);
        }

        log::debug!("[NOTES] Deleted note {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::{TempDir, tempdir};

    fn open_store() -> (TempDir, Database) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("notes.db");
        let db = Database::new(db_path.to_str().unwrap(), 2).expect("Failed to open database");
        (dir, db)
    }

    fn new_note(title: &str, content: Option<&str>) -> NewNote {
        NewNote::new(Some(title), content).expect("valid note")
    }

    #[test]
    fn test_create_then_get() {
        let (_dir, db) = open_store();

        let created = db
            .create_note(new_note("  Groceries ", Some("Milk, eggs")))
            .expect("Failed to create note");
        assert_eq!(created.title, "Groceries");
        assert_eq!(created.created_at, created.updated_at);

        let fetched = db.get_note(&created.id).expect("Failed to get note");
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_create_without_content() {
        let (_dir, db) = open_store();

        let created = db.create_note(new_note("Empty", None)).unwrap();
        assert_eq!(db.get_note(&created.id).unwrap().content, "");
    }

    #[test]
    fn test_ids_are_unique() {
        let (_dir, db) = open_store();

        let a = db.create_note(new_note("Same", None)).unwrap();
        let b = db.create_note(new_note("Same", None)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_list_in_insertion_order() {
        let (_dir, db) = open_store();
        assert!(db.list_notes().unwrap().is_empty());

        for title in ["first", "second", "third"] {
            db.create_note(new_note(title, None)).unwrap();
        }

        let titles: Vec<String> = db
            .list_notes()
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_update_refreshes_updated_at_only() {
        let (_dir, db) = open_store();
        let created = db.create_note(new_note("Draft", Some("v1"))).unwrap();

        sleep(Duration::from_millis(5));
        let updated = db
            .update_note(
                &created.id,
                NoteChanges {
                    title: Some("Final".into()),
                    content: Some("v2".into()),
                },
            )
            .expect("Failed to update note");

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.content, "v2");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(db.get_note(&created.id).unwrap(), updated);
    }

    #[test]
    fn test_update_omitted_fields_untouched() {
        let (_dir, db) = open_store();
        let created = db.create_note(new_note("Keep me", Some("old"))).unwrap();

        let updated = db
            .update_note(
                &created.id,
                NoteChanges {
                    title: None,
                    content: Some("new".into()),
                },
            )
            .unwrap();
        assert_eq!(updated.title, "Keep me");
        assert_eq!(updated.content, "new");
    }

    #[test]
    fn test_update_blank_title_rejected_and_unchanged() {
        let (_dir, db) = open_store();
        let created = db.create_note(new_note("Stable", Some("body"))).unwrap();

        let result = db.update_note(
            &created.id,
            NoteChanges {
                title: Some("   ".into()),
                content: Some("changed".into()),
            },
        );
        assert!(matches!(result, Err(NoteError::Validation(_))));
        assert_eq!(db.get_note(&created.id).unwrap(), created);
    }

    #[test]
    fn test_update_missing_note() {
        let (_dir, db) = open_store();
        let id = Uuid::new_v4().to_string();

        let result = db.update_note(
            &id,
            NoteChanges {
                title: Some("Ghost".into()),
                content: None,
            },
        );
        assert!(matches!(result, Err(NoteError::NotFound)));

        // missing outranks invalid
        let changes = NoteChanges {
            title: Some("".into()),
            content: None,
        };
        let result = db.update_note(&id, changes);
        assert!(matches!(result, Err(NoteError::NotFound)));
        assert!(db.list_notes().unwrap().is_empty());
    }

    #[test]
    fn test_updated_at_never_precedes_created_at() {
        let (_dir, db) = open_store();
        let created = db.create_note(new_note("Future", None)).unwrap();

        // simulate a note stamped ahead of the current clock
        let conn = db.conn().unwrap();
        conn.execute(
            "UPDATE notes SET created_at = ?1, updated_at = ?1 WHERE id = ?2",
            params!["2999-01-01T00:00:00.000Z", created.id],
        )
        .unwrap();
        drop(conn);

        let changes = NoteChanges {
            title: Some("Still future".into()),
            content: None,
        };
        let updated = db.update_note(&created.id, changes).unwrap();
        assert_eq!(updated.updated_at, updated.created_at);
    }

    #[test]
    fn test_delete_twice() {
        let (_dir, db) = open_store();
        let created = db.create_note(new_note("Temp", None)).unwrap();

        db.delete_note(&created.id).expect("first delete should succeed");
        assert!(matches!(db.delete_note(&created.id), Err(NoteError::NotFound)));
        assert!(matches!(db.get_note(&created.id), Err(NoteError::NotFound)));
    }

    #[test]
    fn test_malformed_ids() {
        let (_dir, db) = open_store();

        assert!(matches!(db.get_note("not-an-id"), Err(NoteError::MalformedId(_))));
        assert!(matches!(db.delete_note("123"), Err(NoteError::MalformedId(_))));
        assert!(matches!(
            db.update_note("xyz", NoteChanges::default()),
            Err(NoteError::MalformedId(_))
        ));
    }

    #[test]
    fn test_uppercase_id_resolves() {
        let (_dir, db) = open_store();
        let created = db.create_note(new_note("Case", None)).unwrap();

        let fetched = db.get_note(&created.id.to_uppercase()).unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[test]
    fn test_schema_rejects_blank_title() {
        let (_dir, db) = open_store();
        let conn = db.conn().unwrap();

        let result = conn.execute(
            "INSERT INTO notes (id, title, content, created_at, updated_at)
             VALUES ('x', '  ', '', '2026-01-01T00:00:00.000Z', '2026-01-01T00:00:00.000Z')",
            [],
        );
        assert!(result.is_err());
    }
}
