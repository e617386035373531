use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::Result;

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
  pub database_uri: String,
}

impl Default for SiteSettings {
  fn default() -> Self {
    let database_uri = std::env::var("ROCKET_DATABASE_URI")
      .unwrap_or_else(|_| "sqlite:gastos_comunes.db".to_string());
    Self { database_uri }
  }
}

impl SiteSettings {
  pub async fn into_site(self) -> Result<Site> {
    let options = SqliteConnectOptions::from_str(&self.database_uri)?
      .create_if_missing(true)
      .foreign_keys(true);
    let db = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(Site { settings: self, db })
  }
}

/// Shared state for the whole service: settings and the database handle.
/// Built once in main and handed to rocket as managed state.
#[derive(Debug, Clone)]
pub struct Site {
  pub settings: SiteSettings,
  pub db: SqlitePool,
}

impl Site {
  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("src/migrations").run(&self.db).await?;
    Ok(())
  }
}
