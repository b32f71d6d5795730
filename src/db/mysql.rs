use anyhow::Result;
use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Statement, Value};

use crate::connection::Connection;
use crate::db::{network_url, ColumnType, DBBehavior, Dialect, Row, Session};
use crate::error::{ConnectionError, StatementError};

pub struct Mysql {}

impl DBBehavior for Mysql {
    fn database_url(conn: &Connection) -> String {
        network_url("mysql", conn)
    }

    fn open(conn: &Connection) -> Result<Box<dyn Session>, ConnectionError> {
        let user = conn
            .user
            .as_ref()
            .ok_or_else(|| ConnectionError::new("type mysql needs the user field"))?;
        let host = conn
            .host
            .as_ref()
            .ok_or_else(|| ConnectionError::new("type mysql needs the host field"))?;
        let port = conn
            .port
            .ok_or_else(|| ConnectionError::new("type mysql needs the port field"))?;

        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(host.clone()))
            .tcp_port(port)
            .user(Some(user.clone()))
            .pass(conn.password.clone())
            .db_name(conn.database.clone());

        let conn = Conn::new(opts).map_err(|e| ConnectionError::new(e.to_string()))?;
        Ok(Box::new(MysqlSession { conn }))
    }
}

impl Dialect for Mysql {
    fn column_type(ty: ColumnType) -> String {
        match ty {
            ColumnType::Int => "INT".to_string(),
            ColumnType::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
            ColumnType::Varchar(len) => format!("VARCHAR({len})"),
            ColumnType::Date => "DATE".to_string(),
        }
    }

    fn date_literal(iso: &str) -> String {
        format!("STR_TO_DATE('{iso}', '%Y-%m-%d')")
    }

    // CASCADE is accepted and ignored by mysql; ordering does the real work
    fn drop_table(table: &str) -> String {
        format!("DROP TABLE IF EXISTS {table} CASCADE")
    }
}

pub struct MysqlSession {
    conn: Conn,
}

impl Session for MysqlSession {
    fn execute(&mut self, sql: &str) -> Result<(), StatementError> {
        let stmt = self
            .conn
            .prep(sql)
            .map_err(|e| StatementError::parse(e.to_string()))?;
        let outcome = self
            .conn
            .exec_drop(&stmt, ())
            .map_err(|e| StatementError::execute(e.to_string()));
        close_statement(&mut self.conn, stmt);
        outcome
    }

    fn query(&mut self, sql: &str, on_row: &mut dyn FnMut(Row)) -> Result<(), StatementError> {
        let stmt = self
            .conn
            .prep(sql)
            .map_err(|e| StatementError::parse(e.to_string()))?;
        let fetched = fetch(&mut self.conn, &stmt, on_row);
        close_statement(&mut self.conn, stmt);
        fetched
    }

    fn close(self: Box<Self>) -> Result<()> {
        // the connection sends COM_QUIT when dropped
        drop(self.conn);
        Ok(())
    }
}

fn close_statement(conn: &mut Conn, stmt: Statement) {
    if let Err(e) = conn.close(stmt) {
        tracing::warn!(error = %e, "failed to close statement");
    }
}

fn fetch(
    conn: &mut Conn,
    stmt: &Statement,
    on_row: &mut dyn FnMut(Row),
) -> Result<(), StatementError> {
    let exec = |e: mysql::Error| StatementError::execute(e.to_string());
    let result = conn.exec_iter(stmt, ()).map_err(exec)?;
    for row in result {
        let row = row.map_err(exec)?;
        let mut out = Row::new();
        for (i, column) in row.columns_ref().iter().enumerate() {
            let value = row.as_ref(i).map(render).unwrap_or_default();
            out.push(&column.name_str(), value);
        }
        on_row(out);
    }
    Ok(())
}

fn render(value: &Value) -> String {
    match value {
        Value::NULL => String::new(),
        Value::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        Value::Int(i) => i.to_string(),
        Value::UInt(u) => u.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Double(d) => d.to_string(),
        Value::Date(y, m, d, 0, 0, 0, 0) => format!("{y:04}-{m:02}-{d:02}"),
        Value::Date(y, m, d, h, mi, s, 0) => {
            format!("{y:04}-{m:02}-{d:02} {h:02}:{mi:02}:{s:02}")
        }
        Value::Date(y, m, d, h, mi, s, us) => {
            format!("{y:04}-{m:02}-{d:02} {h:02}:{mi:02}:{s:02}.{us:06}")
        }
        Value::Time(neg, days, h, mi, s, us) => {
            let sign = if *neg { "-" } else { "" };
            let hours = u32::from(*h) + days * 24;
            if *us == 0 {
                format!("{sign}{hours:02}:{mi:02}:{s:02}")
            } else {
                format!("{sign}{hours:02}:{mi:02}:{s:02}.{us:06}")
            }
        }
    }
}
