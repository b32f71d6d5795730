use std::io::{BufRead, Write};

use anyhow::Result;

use crate::connection::Connector;
use crate::db::{DatabaseType, Session};
use crate::executor;
use crate::script::Script;

const MENU: &str = "\n--- Database Operations Menu ---
1. Drop Tables
2. Create Tables
3. Populate Tables
4. Query Tables
5. Exit
Enter your choice: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Run(Script),
    Query,
    Exit,
    Invalid,
}

impl Choice {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => Choice::Run(Script::Drop),
            "2" => Choice::Run(Script::Create),
            "3" => Choice::Run(Script::Seed),
            "4" => Choice::Query,
            "5" => Choice::Exit,
            _ => Choice::Invalid,
        }
    }
}

/// The interactive loop. Each action opens its own session and closes it
/// before the next prompt.
pub struct Menu<R, W, C> {
    input: R,
    output: W,
    connector: C,
    dialect: DatabaseType,
}

impl<R: BufRead, W: Write, C: Connector> Menu<R, W, C> {
    pub fn new(input: R, output: W, connector: C, dialect: DatabaseType) -> Self {
        Self {
            input,
            output,
            connector,
            dialect,
        }
    }

    /// Loop until the exit choice or end of input. Connection failures end the
    /// loop with an error.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.output, "{MENU}")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                tracing::info!("stdin closed");
                return Ok(());
            };

            match Choice::parse(&line) {
                Choice::Run(script) => self.run_script(script)?,
                Choice::Query => {
                    write!(self.output, "Enter your SQL query: ")?;
                    self.output.flush()?;
                    let sql = self.read_line()?.unwrap_or_default();
                    self.run_query(sql.trim())?;
                }
                Choice::Exit => {
                    writeln!(self.output, "Exiting...")?;
                    return Ok(());
                }
                Choice::Invalid => writeln!(self.output, "Invalid choice. Try again.")?,
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn run_script(&mut self, script: Script) -> Result<()> {
        tracing::info!(?script, "running script");
        let statements = script.statements(self.dialect);
        let mut session = self.connector.connect()?;
        let outcomes = executor::run_script(session.as_mut(), &statements, &mut self.output);
        close(session);
        let outcomes = outcomes?;

        let failed = outcomes.iter().filter(|o| !o.is_success()).count();
        tracing::info!(?script, total = outcomes.len(), failed, "script finished");
        writeln!(self.output, "{}", script.summary())?;
        Ok(())
    }

    fn run_query(&mut self, sql: &str) -> Result<()> {
        let mut session = self.connector.connect()?;
        let outcome = executor::query(session.as_mut(), sql, &mut self.output);
        close(session);
        outcome?;
        Ok(())
    }
}

fn close(session: Box<dyn Session>) {
    match session.close() {
        Ok(()) => tracing::debug!("connection closed"),
        Err(e) => tracing::warn!(error = %e, "failed to close connection"),
    }
}
