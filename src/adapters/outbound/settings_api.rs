use crate::common::{ApplicationError, ApplicationResult};
use crate::config::ApiConfig;
use crate::domains::settings::SettingsApi;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

/// HTTP client for the simulation's settings endpoints:
/// `PUT {base_url}/{path}/{value}` with an empty JSON body.
pub struct HttpSettingsApi {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpSettingsApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn endpoint(&self, path: &str, value: u64) -> String {
        format!("{}/{}/{}", self.config.base_url.trim_end_matches('/'), path, value)
    }

    async fn put(&self, path: &str, value: u64) -> ApplicationResult<()> {
        let url = self.endpoint(path, value);
        debug!("PUT {}", url);
        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| ApplicationError::SettingsApi(format!("PUT {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::SettingsApi(format!(
                "PUT {} returned {}",
                url, status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsApi for HttpSettingsApi {
    async fn put_refresh_period(&self, period_ms: u64) -> ApplicationResult<()> {
        self.put(&self.config.refresh_period_path, period_ms).await
    }

    async fn put_population(&self, population: u64) -> ApplicationResult<()> {
        self.put(&self.config.mobiles_size_path, population).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_path_and_value() {
        let api = HttpSettingsApi::new(ApiConfig {
            base_url: "http://sim:8080/api/".to_string(),
            refresh_period_path: "refreshPeriod".to_string(),
            mobiles_size_path: "mobilesSize".to_string(),
        });
        assert_eq!(api.endpoint("refreshPeriod", 250), "http://sim:8080/api/refreshPeriod/250");
    }
}
