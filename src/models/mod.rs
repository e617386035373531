use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate};
use chronoutil::RelativeDuration;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub mod site;
pub use site::*;
pub mod departamento;
pub use departamento::*;
pub mod gasto_comun;
pub use gasto_comun::*;

/// A billing month, keyed as "YYYY-MM". The year is kept to four digits so
/// the string form stays fixed-width and sorts chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Periodo {
  primero: NaiveDate,
}

impl Periodo {
  pub fn new(mes: u32, anio: i32) -> crate::error::Result<Periodo> {
    if !(1000..=9999).contains(&anio) {
      return Err(Error::validation("anio", "must be a four digit year"));
    }
    let primero = NaiveDate::from_ymd_opt(anio, mes, 1)
      .ok_or_else(|| Error::validation("mes", "must be between 1 and 12"))?;
    Ok(Periodo { primero })
  }

  pub fn mes(&self) -> u32 {
    self.primero.month()
  }

  pub fn anio(&self) -> i32 {
    self.primero.year()
  }

  /// Last calendar day of the month: first of the next month, minus a day.
  pub fn fecha_limite(&self) -> NaiveDate {
    self.primero + RelativeDuration::months(1) - Duration::days(1)
  }
}

impl fmt::Display for Periodo {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:04}-{:02}", self.primero.year(), self.primero.month())
  }
}

impl FromStr for Periodo {
  type Err = Error;

  fn from_str(s: &str) -> crate::error::Result<Periodo> {
    if s.len() != 7 {
      return Err(Error::validation("periodo", "expected YYYY-MM"));
    }
    let primero = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
      .map_err(|_| Error::validation("periodo", "expected YYYY-MM"))?;
    Periodo::new(primero.month(), primero.year())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EstadoPago {
  #[serde(rename = "Pago exitoso dentro del plazo")]
  DentroDelPlazo,
  #[serde(rename = "Pago exitoso fuera de plazo")]
  FueraDePlazo,
}

/// "$200,000 CLP". Whole-unit amounts, no decimals.
pub fn formato_clp(monto: i64) -> String {
  let digits = monto.abs().to_string();
  let mut grouped = String::new();
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(c);
  }
  let signo = if monto < 0 { "-" } else { "" };
  format!("${}{} CLP", signo, grouped)
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GastoGenerado {
  pub departamento: i64,
  pub periodo: String,
  pub monto: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Generacion {
  pub accion: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub mes: Option<String>,
  #[serde(rename = "año")]
  pub anio: i32,
  pub gastos_generados: Vec<GastoGenerado>,
}

impl Generacion {
  pub fn mensual(mes: u32, anio: i32, gastos_generados: Vec<GastoGenerado>) -> Self {
    Self {
      accion: "Listado de gastos generados".to_string(),
      mes: Some(mes.to_string()),
      anio,
      gastos_generados,
    }
  }

  pub fn anual(anio: i32, gastos_generados: Vec<GastoGenerado>) -> Self {
    Self {
      accion: "Listado de gastos generados".to_string(),
      mes: None,
      anio,
      gastos_generados,
    }
  }
}

/// Callers distinguish "nothing owed" from an empty page, so the empty case
/// is a literal marker string rather than an empty list.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GastosPendientes {
  Listado(Vec<GastoGenerado>),
  SinMontos(String),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListadoPendientes {
  pub accion: String,
  pub mes: String,
  #[serde(rename = "año")]
  pub anio: i32,
  pub gastos_pendientes: GastosPendientes,
}

impl ListadoPendientes {
  pub fn new(mes: u32, anio: i32, gastos: Vec<GastoGenerado>) -> Self {
    let gastos_pendientes = if gastos.is_empty() {
      GastosPendientes::SinMontos("Sin montos pendientes".to_string())
    } else {
      GastosPendientes::Listado(gastos)
    };
    Self {
      accion: "Listado de gastos pendientes".to_string(),
      mes: mes.to_string(),
      anio,
      gastos_pendientes,
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn periodo_formats_and_parses_its_key() {
    let periodo = Periodo::new(3, 2024).unwrap();
    assert_eq!(periodo.to_string(), "2024-03");
    assert_eq!("2024-03".parse::<Periodo>().unwrap(), periodo);
    assert_eq!(periodo.mes(), 3);
    assert_eq!(periodo.anio(), 2024);
  }

  #[test]
  fn periodo_rejects_garbage() {
    assert!(Periodo::new(0, 2024).is_err());
    assert!(Periodo::new(13, 2024).is_err());
    assert!(Periodo::new(1, 999).is_err());
    assert!("2024-13".parse::<Periodo>().is_err());
    assert!("2024-1".parse::<Periodo>().is_err());
    assert!("gargle".parse::<Periodo>().is_err());
  }

  #[test]
  fn fecha_limite_is_the_last_day_of_the_month() {
    let ultimo = |mes, anio| Periodo::new(mes, anio).unwrap().fecha_limite();
    assert_eq!(ultimo(2, 2024), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(ultimo(2, 2023), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
    assert_eq!(ultimo(12, 2024), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    assert_eq!(ultimo(4, 2024), NaiveDate::from_ymd_opt(2024, 4, 30).unwrap());
  }

  #[test]
  fn formato_clp_groups_thousands() {
    assert_eq!(formato_clp(200000), "$200,000 CLP");
    assert_eq!(formato_clp(1500), "$1,500 CLP");
    assert_eq!(formato_clp(950), "$950 CLP");
    assert_eq!(formato_clp(1234567), "$1,234,567 CLP");
    assert_eq!(formato_clp(0), "$0 CLP");
  }

  #[test]
  fn estado_pago_serializes_to_the_receipt_wording() {
    let dentro = serde_json::to_value(EstadoPago::DentroDelPlazo).unwrap();
    assert_eq!(dentro, "Pago exitoso dentro del plazo");
    let fuera = serde_json::to_value(EstadoPago::FueraDePlazo).unwrap();
    assert_eq!(fuera, "Pago exitoso fuera de plazo");
  }
}
