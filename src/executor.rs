use std::fmt;
use std::io::{self, Write};

use crate::db::{Row, Session};
use crate::error::StatementError;

/// What happened to one statement. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ParseFailed(String),
    ExecFailed(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl From<Result<(), StatementError>> for Outcome {
    fn from(result: Result<(), StatementError>) -> Self {
        match result {
            Ok(()) => Outcome::Success,
            Err(StatementError::Parse(msg)) => Outcome::ParseFailed(msg),
            Err(StatementError::Execute(msg)) => Outcome::ExecFailed(msg),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "Query executed successfully."),
            Outcome::ParseFailed(msg) => write!(f, "Parse error: {msg}"),
            Outcome::ExecFailed(msg) => write!(f, "Error executing query: {msg}"),
        }
    }
}

/// Prepare and run one statement.
pub fn execute(session: &mut dyn Session, sql: &str) -> Outcome {
    tracing::debug!(sql, "execute");
    let outcome = Outcome::from(session.execute(sql));
    if !outcome.is_success() {
        tracing::warn!(%outcome, "statement failed");
    }
    outcome
}

/// Run every statement in order, printing each outcome. A failed statement
/// does not stop the ones after it.
pub fn run_script<W: Write>(
    session: &mut dyn Session,
    statements: &[String],
    out: &mut W,
) -> io::Result<Vec<Outcome>> {
    let mut outcomes = Vec::with_capacity(statements.len());
    for sql in statements {
        let outcome = execute(session, sql);
        writeln!(out, "{outcome}")?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// Run a free-form statement and print every row it returns as it arrives.
/// Only failures produce a status line. Blank input never reaches the driver.
pub fn query<W: Write>(session: &mut dyn Session, sql: &str, out: &mut W) -> io::Result<Outcome> {
    tracing::debug!(sql, "query");
    if sql.trim().is_empty() {
        let outcome = Outcome::from(Err(StatementError::parse("empty statement")));
        tracing::warn!(%outcome, "query failed");
        writeln!(out, "{outcome}")?;
        return Ok(outcome);
    }

    let mut write_err: Option<io::Error> = None;
    let mut rows = 0usize;

    let result = session.query(sql, &mut |row: Row| {
        rows += 1;
        if write_err.is_none() {
            if let Err(e) = writeln!(out, "{row}") {
                write_err = Some(e);
            }
        }
    });
    if let Some(e) = write_err {
        return Err(e);
    }

    let outcome = Outcome::from(result);
    if outcome.is_success() {
        tracing::debug!(rows, "query finished");
    } else {
        tracing::warn!(%outcome, "query failed");
        writeln!(out, "{outcome}")?;
    }
    Ok(outcome)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::Result;

    /// Session that fails statements by marker text and answers queries with canned rows.
    #[derive(Default)]
    pub(crate) struct ScriptedSession {
        pub(crate) executed: Vec<String>,
        pub(crate) queried: Vec<String>,
        pub(crate) rows: Vec<Row>,
    }

    impl Session for ScriptedSession {
        fn execute(&mut self, sql: &str) -> Result<(), StatementError> {
            if sql.contains("BAD SYNTAX") {
                return Err(StatementError::parse("syntax error"));
            }
            self.executed.push(sql.to_string());
            if sql.contains("MISSING") {
                return Err(StatementError::execute(""));
            }
            Ok(())
        }

        fn query(&mut self, sql: &str, on_row: &mut dyn FnMut(Row)) -> Result<(), StatementError> {
            self.queried.push(sql.to_string());
            if sql.contains("BAD SYNTAX") {
                return Err(StatementError::parse("syntax error"));
            }
            if sql.contains("MISSING") {
                return Err(StatementError::execute("table not found"));
            }
            for row in self.rows.drain(..) {
                on_row(row);
            }
            Ok(())
        }

        fn close(self: Box<Self>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn script_continues_past_failures() {
        let mut session = ScriptedSession::default();
        let statements = vec![
            "DROP TABLE MISSING".to_string(),
            "BAD SYNTAX".to_string(),
            "CREATE TABLE OK (ID INT)".to_string(),
        ];
        let mut out = Vec::new();

        let outcomes = run_script(&mut session, &statements, &mut out).unwrap();

        assert_eq!(
            outcomes,
            vec![
                Outcome::ExecFailed("unknown".into()),
                Outcome::ParseFailed("syntax error".into()),
                Outcome::Success,
            ]
        );
        assert_eq!(session.executed.len(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error executing query: unknown\nParse error: syntax error\nQuery executed successfully.\n"
        );
    }

    #[test]
    fn query_prints_rows_and_no_status_on_success() {
        let mut row = Row::new();
        row.push("Name", "Downtown Branch");
        let mut session = ScriptedSession {
            rows: vec![row],
            ..Default::default()
        };
        let mut out = Vec::new();

        let outcome = query(&mut session, "SELECT Name FROM BRANCH_INFORMATION", &mut out).unwrap();

        assert_eq!(outcome, Outcome::Success);
        assert_eq!(String::from_utf8(out).unwrap(), "{\n    NAME => Downtown Branch\n}\n");
    }

    #[test]
    fn query_failure_is_reported() {
        let mut session = ScriptedSession::default();
        let mut out = Vec::new();

        let outcome = query(&mut session, "SELECT * FROM MISSING", &mut out).unwrap();

        assert_eq!(outcome, Outcome::ExecFailed("table not found".into()));
        assert_eq!(String::from_utf8(out).unwrap(), "Error executing query: table not found\n");
    }

    #[test]
    fn blank_query_is_a_parse_error_without_touching_the_session() {
        let mut session = ScriptedSession::default();
        let mut out = Vec::new();

        let outcome = query(&mut session, " \t ", &mut out).unwrap();

        assert_eq!(outcome, Outcome::ParseFailed("empty statement".into()));
        assert!(session.queried.is_empty());
        assert_eq!(String::from_utf8(out).unwrap(), "Parse error: empty statement\n");
    }
}
