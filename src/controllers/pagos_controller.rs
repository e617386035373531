use super::*;

#[post("/", data = "<form>")]
pub async fn create(form: Json<PagoForm>, site: &State<Site>) -> JsonResult<Comprobante> {
  Ok(Json(form.save(site).await?))
}
