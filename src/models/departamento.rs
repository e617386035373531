use serde::{Deserialize, Serialize};
use validator::Validate;

use super::*;
use crate::error::{Error, Result};

/// Monthly amount owed by a departamento that didn't negotiate its own.
pub const MONTO_BASE: i64 = 200000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Departamento {
  pub id: i64,
  pub numero: i64,
  pub monto_diferenciado: i64,
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize, Validate)]
pub struct DepartamentoForm {
  #[validate(range(min = 1))]
  pub numero: i64,
  #[validate(range(min = 1))]
  pub monto_diferenciado: Option<i64>,
}

impl DepartamentoForm {
  pub async fn save(&self, site: &Site) -> Result<Departamento> {
    self.validate()?;

    if Departamento::find_by_numero(site, self.numero).await?.is_some() {
      return Err(Error::DuplicateDepartamento);
    }

    let departamento = sqlx::query_as::<_, Departamento>(
      "INSERT INTO departamentos (numero, monto_diferenciado) VALUES ($1, $2) RETURNING *",
    )
    .bind(self.numero)
    .bind(self.monto_diferenciado.unwrap_or(MONTO_BASE))
    .fetch_one(&site.db)
    .await?;

    Ok(departamento)
  }
}

impl Departamento {
  pub async fn find_by_numero(site: &Site, numero: i64) -> sqlx::Result<Option<Departamento>> {
    sqlx::query_as::<_, Departamento>("SELECT * FROM departamentos WHERE numero = $1")
      .bind(numero)
      .fetch_optional(&site.db)
      .await
  }

  pub async fn all(site: &Site) -> sqlx::Result<Vec<Departamento>> {
    sqlx::query_as::<_, Departamento>("SELECT * FROM departamentos ORDER BY id")
      .fetch_all(&site.db)
      .await
  }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Mensaje {
  pub mensaje: String,
}

impl Mensaje {
  pub fn departamento_agregado(numero: i64) -> Self {
    Mensaje {
      mensaje: format!("Departamento {} agregado.", numero),
    }
  }
}
