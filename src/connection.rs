use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::db::{DBBehavior, DatabaseType, Session, DB};
use crate::error::{ConfigError, ConnectionError};

/// Typed connection descriptor parsed from the DSN plus the configured credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub r#type: DatabaseType,
    pub user: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<PathBuf>,
    pub password: Option<String>,
    pub database: Option<String>,
}

/// Anything that can hand out a fresh session per menu action.
pub trait Connector {
    fn connect(&self) -> Result<Box<dyn Session>, ConnectionError>;
}

impl Connection {
    /// A private in-memory SQLite database is refused here since it would not
    /// outlive the action that opened it.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mut conn = Self::parse_dsn(&config.dsn)?;
        if conn.is_memory() {
            return Err(ConfigError::MemoryDsn);
        }
        conn.user = Some(config.user.clone());
        conn.password = Some(config.password.clone());
        Ok(conn)
    }

    /// Accepts `postgres://host[:port][/db]`, `mysql://host[:port][/db]`,
    /// `sqlite://path` and `sqlite::memory:`. Userinfo and any `?query` suffix
    /// in a network DSN are ignored.
    pub fn parse_dsn(dsn: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidDsn(dsn.to_string());
        let dsn = dsn.trim();

        if dsn == "sqlite::memory:" {
            return Ok(Self::sqlite(PathBuf::from(":memory:")));
        }

        let (scheme, rest) = dsn.split_once("://").ok_or_else(invalid)?;
        let r#type: DatabaseType = scheme.parse().map_err(|_| invalid())?;

        if r#type == DatabaseType::Sqlite {
            if rest.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::sqlite(PathBuf::from(rest)));
        }

        let rest = rest.split_once('?').map_or(rest, |(rest, _)| rest);
        let rest = rest.rsplit_once('@').map_or(rest, |(_, host)| host);
        let (authority, database) = match rest.split_once('/') {
            Some((authority, db)) => (authority, Some(db).filter(|db| !db.is_empty())),
            None => (rest, None),
        };
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, Some(port.parse::<u16>().map_err(|_| invalid())?)),
            None => (authority, None),
        };
        if host.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            r#type,
            user: None,
            host: Some(host.to_string()),
            port: port.or_else(|| r#type.default_port()),
            path: None,
            password: None,
            database: database.map(str::to_string),
        })
    }

    fn sqlite(path: PathBuf) -> Self {
        Self {
            r#type: DatabaseType::Sqlite,
            user: None,
            host: None,
            port: None,
            path: Some(path),
            password: None,
            database: None,
        }
    }

    fn is_memory(&self) -> bool {
        self.path.as_deref() == Some(Path::new(":memory:"))
    }

    /// Connection URL with the password masked, for logs.
    pub fn redacted_url(&self) -> String {
        DB::database_url(self)
    }
}

impl Connector for Connection {
    fn connect(&self) -> Result<Box<dyn Session>, ConnectionError> {
        tracing::info!(url = %self.redacted_url(), "connecting");
        let session = DB::open(self)?;
        tracing::debug!("connected");
        Ok(session)
    }
}
