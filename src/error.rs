use sqlx::error::DatabaseError;
use std::error::Error as ErrorTrait;

use rocket::{
  http::Status,
  request::Request,
  response::{self, Responder},
  serde::json::{json, Json},
  warn,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("El departamento ya existe.")]
  DuplicateDepartamento,
  #[error("Departamento no encontrado")]
  DepartamentoNotFound,
  #[error("Gasto no encontrado o ya pagado")]
  GastoNotFoundOrAlreadyPaid,
  #[error("Debe proporcionar el mes y el año.")]
  MissingMesAnio,
  #[error("Invalid {field}: {message}")]
  Validation { field: String, message: String },
  #[error(transparent)]
  ValidationError(#[from] validator::ValidationErrors),
  #[error(transparent)]
  DatabaseError(sqlx::Error),
  #[error(transparent)]
  Migrate(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for Error {
  fn from(err: sqlx::Error) -> Error {
    if let sqlx::Error::Database(ref inner_error) = err {
      let code = inner_error.code().map(|c| c.into_owned());
      match code.as_deref() {
        // SQLITE_CONSTRAINT_UNIQUE, SQLITE_CONSTRAINT_PRIMARYKEY
        Some("2067") | Some("1555") => {
          return Error::validation("uniqueness", inner_error.message())
        }
        // SQLITE_CONSTRAINT_FOREIGNKEY
        Some("787") => {
          return Error::validation("nonexistent", "references a nonexistent resource")
        }
        _ => {}
      }
    }
    Error::DatabaseError(err)
  }
}

impl Error {
  pub fn validation(field: &str, message: &str) -> Error {
    Error::Validation {
      field: field.to_string(),
      message: message.to_string(),
    }
  }
}

impl<'r> Responder<'r, 'static> for Error {
  fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
    let response = match self {
      Error::DuplicateDepartamento | Error::ValidationError(_) | Error::Validation { .. } => (
        Status::UnprocessableEntity,
        Json(json![{"error": self.to_string()}]),
      ),
      Error::DepartamentoNotFound | Error::GastoNotFoundOrAlreadyPaid => {
        (Status::NotFound, Json(json![{"error": self.to_string()}]))
      }
      Error::MissingMesAnio => (
        Status::BadRequest,
        Json(json![{"error": self.to_string()}]),
      ),
      Error::DatabaseError(sqlx::Error::RowNotFound) => {
        (Status::NotFound, Json(json![{ "error": "Not found" }]))
      }
      _ => {
        warn!(
          "A wild error appeared: {:?}\n\n{:?}\n",
          &self,
          &self.source()
        );
        (
          Status::InternalServerError,
          Json(json![{ "error": "Unexpected Error" }]),
        )
      }
    };

    response.respond_to(request)
  }
}

pub type Result<T> = std::result::Result<T, Error>;
