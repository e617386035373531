#[macro_use]
extern crate rocket;

pub mod models;
pub mod error;
pub mod controllers;
pub use controllers::*;

use models::Site;

pub fn server(site: Site) -> rocket::Rocket<rocket::Build> {
  let cors = rocket_cors::CorsOptions::default()
    .to_cors()
    .expect("Could not build CORS options");

  rocket::build()
    .manage(site)
    .attach(cors)
    .mount("/departamento", routes![departamentos_controller::create])
    .mount(
      "/gastos",
      routes![gastos_controller::generar, gastos_controller::pendientes],
    )
    .mount("/pago", routes![pagos_controller::create])
}
