use super::*;

#[post("/comunes", data = "<form>")]
pub async fn generar(form: Json<GeneracionForm>, site: &State<Site>) -> JsonResult<Generacion> {
  Ok(Json(form.generate(site).await?))
}

#[get("/pendientes?<mes>&<anio>")]
pub async fn pendientes(
  mes: Option<u32>,
  anio: Option<i32>,
  site: &State<Site>,
) -> JsonResult<ListadoPendientes> {
  match (mes, anio) {
    (Some(mes), Some(anio)) => Ok(Json(GastoComun::pendientes(site, mes, anio).await?)),
    _ => Err(Error::MissingMesAnio),
  }
}
