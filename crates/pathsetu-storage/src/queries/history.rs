// SPDX-FileCopyrightText: 2026 Pathsetu Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn history queries.
//!
//! Each row holds one turn. The `content` column stores the text as a JSON
//! list of parts; rows that are not valid JSON are read back as plain text.

use pathsetu_core::{PathsetuError, Role, TurnRecord, TurnText};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Append a user turn and a model turn in one transaction.
pub async fn append_turn(
    db: &Database,
    user_id: &str,
    user_text: &str,
    reply_text: &str,
) -> Result<(), PathsetuError> {
    let user_id = user_id.to_string();
    let user_content = encode(user_text)?;
    let reply_content = encode(reply_text)?;

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO turn_history (user_id, role, content) VALUES (?1, ?2, ?3)",
                )?;
                stmt.execute(params![user_id, Role::User.to_string(), user_content])?;
                stmt.execute(params![user_id, Role::Model.to_string(), reply_content])?;
            }
            tx.commit()
        })
        .await
        .map_err(map_tr_err)
}

/// Get a user's turns in chronological order.
///
/// With `limit`, only the newest `limit` records are returned (still oldest
/// first).
pub async fn get_turns(
    db: &Database,
    user_id: &str,
    limit: Option<usize>,
) -> Result<Vec<TurnRecord>, PathsetuError> {
    let user_id = user_id.to_string();
    // SQLite treats a negative LIMIT as unbounded.
    let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));

    db.connection()
        .call(move |conn| -> Result<Vec<TurnRecord>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT role, content FROM (
                     SELECT id, role, content FROM turn_history
                     WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2
                 ) ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![user_id, limit], |row| {
                let role: Option<String> = row.get(0)?;
                let content: Option<String> = row.get(1)?;
                Ok(TurnRecord {
                    role,
                    text: content.map(decode),
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete every turn for a user. Returns the number of rows removed.
pub async fn clear_turns(db: &Database, user_id: &str) -> Result<usize, PathsetuError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "DELETE FROM turn_history WHERE user_id = ?1",
                params![user_id],
            )
        })
        .await
        .map_err(map_tr_err)
}

fn encode(text: &str) -> Result<String, PathsetuError> {
    serde_json::to_string(&[text]).map_err(|e| PathsetuError::Storage {
        source: Box::new(e),
    })
}

fn decode(content: String) -> TurnText {
    serde_json::from_str(&content).unwrap_or(TurnText::Single(content))
}
