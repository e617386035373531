use super::*;

#[post("/", data = "<form>")]
pub async fn create(
  form: Json<DepartamentoForm>,
  site: &State<Site>,
) -> Result<status::Custom<Json<Mensaje>>> {
  let departamento = form.save(site).await?;
  Ok(status::Custom(
    Status::Created,
    Json(Mensaje::departamento_agregado(departamento.numero)),
  ))
}
