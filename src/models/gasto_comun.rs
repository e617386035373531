use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::*;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct GastoComun {
  pub id: i64,
  pub departamento_id: i64,
  pub periodo: String,
  pub monto: i64,
  pub pagado: bool,
  pub fecha_pago: Option<NaiveDate>,
}

#[derive(sqlx::FromRow)]
struct PendienteRow {
  departamento: i64,
  periodo: String,
  monto: i64,
}

impl GastoComun {
  /// Creates the month's gasto for every departamento that doesn't have one
  /// yet. Safe to call repeatedly: existing (departamento, periodo) pairs are
  /// skipped, so only the newly created gastos are returned.
  pub async fn generar_mes(site: &Site, periodo: &Periodo) -> Result<Vec<GastoGenerado>> {
    let mut generados = vec![];

    for departamento in Departamento::all(site).await? {
      if GastoComun::find_por_periodo(site, departamento.id, periodo)
        .await?
        .is_some()
      {
        continue;
      }

      let gasto = sqlx::query_as::<_, GastoComun>(
        "INSERT INTO gastos_comunes (departamento_id, periodo, monto) VALUES ($1, $2, $3) RETURNING *",
      )
      .bind(departamento.id)
      .bind(periodo.to_string())
      .bind(departamento.monto_diferenciado)
      .fetch_one(&site.db)
      .await?;

      generados.push(GastoGenerado {
        departamento: departamento.numero,
        periodo: gasto.periodo.clone(),
        monto: formato_clp(gasto.monto),
      });
    }

    Ok(generados)
  }

  pub async fn generar_anio(site: &Site, anio: i32) -> Result<Vec<GastoGenerado>> {
    let mut generados = vec![];
    for mes in 1..=12 {
      generados.extend(GastoComun::generar_mes(site, &Periodo::new(mes, anio)?).await?);
    }
    Ok(generados)
  }

  /// Every unpaid gasto up to and including the given month. The periodo key
  /// is fixed-width so the string comparison crosses year boundaries.
  pub async fn pendientes(site: &Site, mes: u32, anio: i32) -> Result<ListadoPendientes> {
    let periodo = Periodo::new(mes, anio)?;

    let filas = sqlx::query_as::<_, PendienteRow>(
      "SELECT d.numero AS departamento, g.periodo, g.monto \
       FROM gastos_comunes g \
       JOIN departamentos d ON d.id = g.departamento_id \
       WHERE NOT g.pagado AND g.periodo <= $1 \
       ORDER BY g.id",
    )
    .bind(periodo.to_string())
    .fetch_all(&site.db)
    .await?;

    let gastos = filas
      .into_iter()
      .map(|fila| GastoGenerado {
        departamento: fila.departamento,
        periodo: fila.periodo,
        monto: formato_clp(fila.monto),
      })
      .collect();

    Ok(ListadoPendientes::new(mes, anio, gastos))
  }

  pub async fn find_por_periodo(
    site: &Site,
    departamento_id: i64,
    periodo: &Periodo,
  ) -> sqlx::Result<Option<GastoComun>> {
    sqlx::query_as::<_, GastoComun>(
      "SELECT * FROM gastos_comunes WHERE departamento_id = $1 AND periodo = $2",
    )
    .bind(departamento_id)
    .bind(periodo.to_string())
    .fetch_optional(&site.db)
    .await
  }

  pub async fn find_pendiente(
    site: &Site,
    departamento_id: i64,
    periodo: &Periodo,
  ) -> sqlx::Result<Option<GastoComun>> {
    sqlx::query_as::<_, GastoComun>(
      "SELECT * FROM gastos_comunes WHERE departamento_id = $1 AND periodo = $2 AND NOT pagado",
    )
    .bind(departamento_id)
    .bind(periodo.to_string())
    .fetch_optional(&site.db)
    .await
  }

  /// A paid gasto is terminal. Callers reach this through PagoForm::save,
  /// which only looks up unpaid gastos, but the guard stays.
  pub async fn marcar_como_pagado(
    &mut self,
    site: &Site,
    fecha_pago: NaiveDate,
  ) -> Result<EstadoPago> {
    if self.pagado {
      return Err(Error::GastoNotFoundOrAlreadyPaid);
    }

    let periodo: Periodo = self.periodo.parse()?;
    let estado = if fecha_pago <= periodo.fecha_limite() {
      EstadoPago::DentroDelPlazo
    } else {
      EstadoPago::FueraDePlazo
    };

    sqlx::query("UPDATE gastos_comunes SET pagado = true, fecha_pago = $2 WHERE id = $1")
      .bind(self.id)
      .bind(fecha_pago)
      .execute(&site.db)
      .await?;

    self.pagado = true;
    self.fecha_pago = Some(fecha_pago);

    Ok(estado)
  }
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize, Validate)]
pub struct GeneracionForm {
  #[validate(range(min = 1, max = 12))]
  pub mes: Option<u32>,
  pub anio: Option<i32>,
}

impl GeneracionForm {
  pub async fn generate(&self, site: &Site) -> Result<Generacion> {
    self.validate()?;

    match (self.mes, self.anio) {
      (Some(mes), Some(anio)) => {
        let generados = GastoComun::generar_mes(site, &Periodo::new(mes, anio)?).await?;
        Ok(Generacion::mensual(mes, anio, generados))
      }
      (None, Some(anio)) => Ok(Generacion::anual(anio, GastoComun::generar_anio(site, anio).await?)),
      _ => Err(Error::MissingMesAnio),
    }
  }
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize, Validate)]
pub struct PagoForm {
  pub numero_departamento: i64,
  #[validate(range(min = 1, max = 12))]
  pub mes: u32,
  pub anio: i32,
  pub fecha_pago: NaiveDate,
}

impl PagoForm {
  pub async fn save(&self, site: &Site) -> Result<Comprobante> {
    self.validate()?;
    let periodo = Periodo::new(self.mes, self.anio)?;

    let departamento = Departamento::find_by_numero(site, self.numero_departamento)
      .await?
      .ok_or(Error::DepartamentoNotFound)?;

    let mut gasto = GastoComun::find_pendiente(site, departamento.id, &periodo)
      .await?
      .ok_or(Error::GastoNotFoundOrAlreadyPaid)?;

    let estado_pago = gasto.marcar_como_pagado(site, self.fecha_pago).await?;

    Ok(Comprobante {
      departamento: departamento.numero,
      fecha_pago: self.fecha_pago,
      periodo: periodo.to_string(),
      estado_pago,
    })
  }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Comprobante {
  pub departamento: i64,
  pub fecha_pago: NaiveDate,
  pub periodo: String,
  pub estado_pago: EstadoPago,
}
