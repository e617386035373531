use rocket::{http::Status, local::asynchronous::Client};
pub use serde::{de::DeserializeOwned, Deserialize};

pub use galvanic_assert::{
  self,
  matchers::{collection::*, *},
  *,
};

use std::future::Future;
use tokio::runtime::Runtime;

use gastos_api::models::{Site, SiteSettings};

pub fn run_test<F: Future<Output = Result<(), anyhow::Error>>>(future: F) {
  let result = Runtime::new()
    .expect("could not build runtime")
    .block_on(future);
  result.unwrap();
}

/// A fresh file-backed database per test, so tests can run in parallel.
pub async fn test_site(name: &str) -> Site {
  let path = std::env::temp_dir().join(format!("gastos_comunes_{}.db", name));
  let _ = std::fs::remove_file(&path);
  let settings = SiteSettings {
    database_uri: format!("sqlite:{}", path.display()),
  };
  let site = settings
    .into_site()
    .await
    .expect("could not open the test database");
  site.migrate().await.expect("could not run migrations");
  site
}

#[macro_export]
macro_rules! test {
  ($i:ident($client:ident, $site:ident) $($e:tt)* ) => {
    #[test]
    fn $i() {
      run_test(async move {
        let $site = crate::support::test_site(stringify!($i)).await;
        let $client = PublicApiClient::new(gastos_api::server($site.clone())).await;
        {$($e)*};
        Ok(())
      })
    }
  }
}

#[derive(Deserialize)]
pub struct ApiError {
  pub error: String,
}

pub struct PublicApiClient {
  pub client: Client,
}

impl PublicApiClient {
  pub async fn new(server: rocket::Rocket<rocket::Build>) -> Self {
    Self {
      client: Client::tracked(server).await.unwrap(),
    }
  }

  pub async fn post<T, B>(&self, path: &str, body: B) -> T
  where
    T: DeserializeOwned,
    B: AsRef<str> + AsRef<[u8]>,
  {
    let string = self
      .client
      .post(path)
      .body(body)
      .dispatch()
      .await
      .into_string()
      .await
      .unwrap();

    serde_json::from_str(&string).unwrap_or_else(|_| panic!("Could not parse response {}", string))
  }

  pub async fn post_with_status<T, B>(&self, path: &str, body: B, status: Status) -> T
  where
    T: DeserializeOwned,
    B: AsRef<str> + AsRef<[u8]>,
  {
    let response = self.client.post(path).body(body).dispatch().await;
    assert_eq!(response.status(), status);
    let string = response.into_string().await.unwrap();
    serde_json::from_str(&string).unwrap_or_else(|_| panic!("Could not parse response {}", string))
  }

  pub async fn assert_post_error<B>(&self, path: &str, body: B, status: Status, msg: &str)
  where
    B: AsRef<str> + AsRef<[u8]>,
  {
    let response = self.client.post(path).body(body).dispatch().await;
    assert_eq!(response.status(), status);
    let err: ApiError = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
    assert_that!(&err.error, rematch(msg));
  }

  pub async fn get<T: DeserializeOwned, P: std::fmt::Display>(&self, path: P) -> T {
    let response = self.raw_get(path).await;
    serde_json::from_str(&response).expect(&format!("Could not parse response {}", response))
  }

  pub async fn raw_get<P: std::fmt::Display>(&self, path: P) -> String {
    self
      .client
      .get(path.to_string())
      .dispatch()
      .await
      .into_string()
      .await
      .unwrap()
  }

  pub async fn assert_get_error<'a>(&'a self, path: &'a str, status: Status, msg: &'a str) {
    let response = self.client.get(path).dispatch().await;
    assert_eq!(response.status(), status);
    let err: ApiError = serde_json::from_str(&response.into_string().await.unwrap()).unwrap();
    assert_that!(&err.error, rematch(msg));
  }
}

pub fn rematch<'a>(expr: &'a str) -> Box<dyn Matcher<'a, String> + 'a> {
  Box::new(move |actual: &String| {
    let re = regex::Regex::new(expr).unwrap();
    let builder = MatchResultBuilder::for_("rematch");
    if re.is_match(actual) {
      builder.matched()
    } else {
      builder.failed_because(&format!("{:?} does not match {:?}", expr, actual))
    }
  })
}
