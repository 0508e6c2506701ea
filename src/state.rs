use crate::{
    config::RuntimeConfiguration,
    data::{AttendanceStore, postgres_store::PostgresStore},
    error::RollcallResult,
    maud_conveniences::render_nav,
};
use jiff::tz::TimeZone;
use maud::{DOCTYPE, Markup, html};
use std::{ops::Deref, sync::Arc};

#[derive(Clone, Debug)]
pub struct RollcallState {
    store: Arc<dyn AttendanceStore>,
    timezone: TimeZone,
}

impl RollcallState {
    /// Opens the pool lazily and tries to bring the schema up to date. A database that can't be
    /// reached yet is logged, not fatal; requests fail with a 500 until it comes back.
    pub async fn new(config: &RuntimeConfiguration) -> RollcallResult<Self> {
        let store = PostgresStore::connect_lazy(&config.db_config())?;

        match store.migrate().await {
            Ok(()) => info!("Database connected and migrated"),
            Err(e) => error!(?e, "Database connection error"),
        }

        Ok(Self::from_store(Arc::new(store), config.timezone.clone()))
    }

    pub fn from_store(store: Arc<dyn AttendanceStore>, timezone: TimeZone) -> Self {
        Self { store, timezone }
    }

    pub const fn timezone(&self) -> &TimeZone {
        &self.timezone
    }

    #[allow(clippy::unused_self, clippy::needless_pass_by_value)] //in case self is ever needed :), and to allow direct html! usage
    pub fn render(&self, markup: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    title { "Rollcall" }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center justify-center text-white" {
                    (render_nav())
                    (markup)
                }
            }
        }
    }

    pub async fn sensible_shutdown(&self) {
        self.store.close().await;
        info!("Closed database connections");
    }
}

impl Deref for RollcallState {
    type Target = dyn AttendanceStore;

    fn deref(&self) -> &Self::Target {
        &*self.store
    }
}
