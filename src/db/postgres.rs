use anyhow::Result;
use postgres::{Client, NoTls, SimpleQueryMessage};

use crate::connection::Connection;
use crate::db::{network_url, ColumnType, DBBehavior, Dialect, Row, Session};
use crate::error::{ConnectionError, StatementError};

pub struct Postgres {}

impl DBBehavior for Postgres {
    fn database_url(conn: &Connection) -> String {
        network_url("postgres", conn)
    }

    fn open(conn: &Connection) -> Result<Box<dyn Session>, ConnectionError> {
        let user = conn
            .user
            .as_ref()
            .ok_or_else(|| ConnectionError::new("type postgres needs the user field"))?;
        let host = conn
            .host
            .as_ref()
            .ok_or_else(|| ConnectionError::new("type postgres needs the host field"))?;

        let mut config = postgres::Config::new();
        config.user(user.as_str()).host(host.as_str());
        if let Some(port) = conn.port {
            config.port(port);
        }
        if let Some(password) = conn.password.as_ref() {
            config.password(password.as_str());
        }
        if let Some(database) = conn.database.as_ref() {
            config.dbname(database.as_str());
        }

        let client = config.connect(NoTls).map_err(|e| ConnectionError::new(message(&e)))?;
        Ok(Box::new(PostgresSession { client }))
    }
}

impl Dialect for Postgres {
    fn column_type(ty: ColumnType) -> String {
        match ty {
            ColumnType::Int => "INTEGER".to_string(),
            ColumnType::Decimal { precision, scale } => format!("NUMERIC({precision}, {scale})"),
            ColumnType::Varchar(len) => format!("VARCHAR({len})"),
            ColumnType::Date => "DATE".to_string(),
        }
    }

    fn date_literal(iso: &str) -> String {
        format!("TO_DATE('{iso}', 'YYYY-MM-DD')")
    }

    fn drop_table(table: &str) -> String {
        format!("DROP TABLE IF EXISTS {table} CASCADE")
    }
}

pub struct PostgresSession {
    client: Client,
}

impl Session for PostgresSession {
    fn execute(&mut self, sql: &str) -> Result<(), StatementError> {
        let stmt = self
            .client
            .prepare(sql)
            .map_err(|e| StatementError::parse(message(&e)))?;
        self.client
            .execute(&stmt, &[])
            .map_err(|e| StatementError::execute(message(&e)))?;
        Ok(())
    }

    fn query(&mut self, sql: &str, on_row: &mut dyn FnMut(Row)) -> Result<(), StatementError> {
        // prepare only validates; rows come back over the simple (text) protocol
        // so every column type renders without per-type decoding
        self.client
            .prepare(sql)
            .map_err(|e| StatementError::parse(message(&e)))?;
        let messages = self
            .client
            .simple_query(sql)
            .map_err(|e| StatementError::execute(message(&e)))?;

        for msg in messages {
            if let SimpleQueryMessage::Row(row) = msg {
                let mut out = Row::new();
                for (i, column) in row.columns().iter().enumerate() {
                    out.push(column.name(), row.get(i).unwrap_or_default());
                }
                on_row(out);
            }
        }
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        self.client.close()?;
        Ok(())
    }
}

/// Server errors carry a bare message; anything else falls back to Display.
fn message(e: &postgres::Error) -> String {
    e.as_db_error()
        .map(|db| db.message().to_string())
        .unwrap_or_else(|| e.to_string())
}
