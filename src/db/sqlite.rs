use std::path::{Path, PathBuf};

use anyhow::Result;
use rusqlite::types::ValueRef;

use crate::connection::Connection;
use crate::db::{ColumnType, DBBehavior, Dialect, Row, Session};
use crate::error::{ConnectionError, StatementError};

pub struct Sqlite {}

impl DBBehavior for Sqlite {
    fn database_url(conn: &Connection) -> String {
        let path = conn
            .path
            .as_deref()
            .and_then(expand_path)
            .unwrap_or_default();
        format!("sqlite://{}", path.display())
    }

    fn open(conn: &Connection) -> Result<Box<dyn Session>, ConnectionError> {
        use rusqlite::Connection as SqliteConn;

        let path = conn
            .path
            .as_deref()
            .and_then(expand_path)
            .ok_or_else(|| ConnectionError::new("invalid sqlite path"))?;

        let sc = if path == Path::new(":memory:") {
            SqliteConn::open_in_memory()
        } else {
            SqliteConn::open(&path)
        }
        .map_err(|e| ConnectionError::new(e.to_string()))?;

        // off by default in sqlite; the scripts rely on parent rows existing
        sc.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| ConnectionError::new(e.to_string()))?;

        Ok(Box::new(SqliteSession { conn: sc }))
    }
}

impl Dialect for Sqlite {
    fn column_type(ty: ColumnType) -> String {
        match ty {
            ColumnType::Int => "INTEGER".to_string(),
            ColumnType::Decimal { precision, scale } => format!("NUMERIC({precision}, {scale})"),
            ColumnType::Varchar(len) => format!("VARCHAR({len})"),
            ColumnType::Date => "DATE".to_string(),
        }
    }

    fn date_literal(iso: &str) -> String {
        format!("DATE('{iso}')")
    }

    // no CASCADE in sqlite; the drop script already removes children first
    fn drop_table(table: &str) -> String {
        format!("DROP TABLE IF EXISTS {table}")
    }
}

pub struct SqliteSession {
    conn: rusqlite::Connection,
}

impl Session for SqliteSession {
    fn execute(&mut self, sql: &str) -> Result<(), StatementError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| StatementError::parse(e.to_string()))?;
        stmt.execute([])
            .map_err(|e| StatementError::execute(e.to_string()))?;
        Ok(())
    }

    fn query(&mut self, sql: &str, on_row: &mut dyn FnMut(Row)) -> Result<(), StatementError> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| StatementError::parse(e.to_string()))?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let exec = |e: rusqlite::Error| StatementError::execute(e.to_string());
        let mut rows = stmt.query([]).map_err(exec)?;
        while let Some(row) = rows.next().map_err(exec)? {
            let mut out = Row::new();
            for (i, column) in columns.iter().enumerate() {
                let cell = row.get_ref(i).map_err(exec)?;
                out.push(column, render(cell));
            }
            on_row(out);
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        Ok(())
    }
}

fn render(cell: ValueRef<'_>) -> String {
    match cell {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => format!("<blob {} bytes>", b.len()),
    }
}

fn expand_path(path: &Path) -> Option<PathBuf> {
    if path == Path::new(":memory:") {
        return Some(path.to_path_buf());
    }
    let mut expanded_path = PathBuf::new();
    let mut path_iter = path.iter();
    if path.starts_with("~") {
        path_iter.next()?;
        expanded_path = expanded_path.join(dirs_next::home_dir()?);
    }
    for path in path_iter {
        let path = path.to_str()?;
        expanded_path = if cfg!(unix) && path.starts_with('$') {
            expanded_path.join(std::env::var(path.strip_prefix('$')?).unwrap_or_default())
        } else if cfg!(windows) && path.starts_with('%') && path.ends_with('%') {
            expanded_path
                .join(std::env::var(path.strip_prefix('%')?.strip_suffix('%')?).unwrap_or_default())
        } else {
            expanded_path.join(path)
        }
    }
    Some(expanded_path)
}
