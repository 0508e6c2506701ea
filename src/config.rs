use crate::error::{BadEnvVarSnafu, InvalidTimezoneSnafu, ParseNumberSnafu, RollcallResult};
use dotenvy::var;
use jiff::tz::TimeZone;
use secrecy::SecretString;
use snafu::ResultExt;
use std::{path::PathBuf, sync::Arc};

pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "public";
const DEFAULT_MAX_CONNECTIONS: u32 = 15;

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    db_config: Arc<DbConfig>,
    pub port: u16,
    pub timezone: TimeZone,
    pub static_dir: PathBuf,
}

impl RuntimeConfiguration {
    pub fn new() -> RollcallResult<Self> {
        let port = match var("PORT") {
            Ok(port) => port.parse().context(ParseNumberSnafu { name: "PORT" })?,
            Err(_) => DEFAULT_PORT,
        };
        let tz = var("ROLLCALL_TIMEZONE").unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
        let static_dir = var("ROLLCALL_STATIC_DIR")
            .unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string())
            .into();

        Ok(Self {
            db_config: Arc::new(DbConfig::new()?),
            port,
            timezone: resolve_timezone(tz)?,
            static_dir,
        })
    }

    pub fn db_config(&self) -> Arc<DbConfig> {
        self.db_config.clone()
    }
}

pub fn resolve_timezone(tz: String) -> RollcallResult<TimeZone> {
    TimeZone::get(&tz).context(InvalidTimezoneSnafu { tz })
}

#[derive(Debug)]
pub struct DbConfig {
    url: SecretString,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn new() -> RollcallResult<Self> {
        let url = var("DATABASE_URL").context(BadEnvVarSnafu {
            name: "DATABASE_URL",
        })?;
        let max_connections = match var("ROLLCALL_MAX_CONNECTIONS") {
            Ok(n) => n.parse().context(ParseNumberSnafu {
                name: "ROLLCALL_MAX_CONNECTIONS",
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            url: SecretString::from(url),
            max_connections,
        })
    }

    pub const fn url(&self) -> &SecretString {
        &self.url
    }
}
