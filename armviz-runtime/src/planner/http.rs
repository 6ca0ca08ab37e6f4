use std::time::Duration;

use super::{decode_rejection, decode_response, Plan, PlanError, PlanRequest, Planner};

/// Planner backed by the HTTP planning service.
pub struct HttpPlanner {
    client: reqwest::Client,
    endpoint: reqwest::Url,
}

impl HttpPlanner {
    /// Construct a planner for the service at the given address.
    pub fn new(address: &str, timeout: Duration) -> crate::runtime::Result<Self> {
        let endpoint = endpoint_url(address)
            .map_err(|e| crate::Error::Config(format!("planner url '{}': {}", address, e)))?;

        let client = reqwest::Client::builder()
            .user_agent(format!("armviz/{}", crate::consts::VERSION))
            .timeout(timeout)
            .build()
            .map_err(PlanError::Transport)?;

        Ok(Self { client, endpoint })
    }

    #[inline]
    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }
}

fn endpoint_url(address: &str) -> Result<reqwest::Url, String> {
    let base = if address.ends_with('/') {
        reqwest::Url::parse(address)
    } else {
        reqwest::Url::parse(&format!("{}/", address))
    };

    base.and_then(|url| url.join(crate::consts::PLANNER_ENDPOINT))
        .map_err(|e| e.to_string())
}

#[async_trait::async_trait]
impl Planner for HttpPlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<Plan, PlanError> {
        log::debug!("Request plan: {}", request);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .map_err(PlanError::Transport)?;

        let status = response.status();
        let body = response.bytes().await.map_err(PlanError::Transport)?;

        if !status.is_success() {
            return Err(decode_rejection(
                status.as_u16(),
                status.canonical_reason(),
                &body,
            ));
        }

        decode_response(&body, &request.lengths())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            endpoint_url("http://localhost:8000").unwrap().as_str(),
            "http://localhost:8000/api/generate_trajectory"
        );
        assert_eq!(
            endpoint_url("http://planner.local/robot/").unwrap().as_str(),
            "http://planner.local/robot/api/generate_trajectory"
        );
        assert!(endpoint_url("localhost 8000").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let planner = HttpPlanner::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();

        let request = PlanRequest::new(
            &armviz_core::JointAngles::HOME,
            &armviz_core::Point::new(100.0, 100.0),
            &armviz_core::LinkLengths::default(),
            2.5,
            0.05,
        );

        let error = planner.plan(&request).await.unwrap_err();

        assert!(matches!(error, PlanError::Transport(_)));
    }
}
