use gastos_api::models::SiteSettings;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
  let site = SiteSettings::default()
    .into_site()
    .await
    .expect("Could not validate site state");

  site.migrate().await.expect("Could not run migrations");

  let _rocket = gastos_api::server(site).launch().await?;
  Ok(())
}
