use rocket::{
  self, get, post,
  http::Status,
  response::status,
  serde::json::Json,
  State,
};

use crate::error::*;
use crate::models::*;

pub type JsonResult<T> = Result<Json<T>>;

pub mod departamentos_controller;
pub mod gastos_controller;
pub mod pagos_controller;
