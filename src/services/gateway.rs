use crate::models::{AvailabilityWindow, Offer, Plan};
use crate::services::{AvailabilityStore, OfferStore, PlanStore, Resource, ServiceError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

/// REST client for the availability, offer and plan services
///
/// Every call is a `GET {base}/{id}` carrying the caller's bearer token.
/// Timeouts are enforced by the underlying HTTP client.
pub struct ApiGateway {
    client: Client,
    availability_uri: String,
    offer_uri: String,
    plan_uri: String,
}

impl ApiGateway {
    /// Create a new gateway
    pub fn new(
        availability_uri: String,
        offer_uri: String,
        plan_uri: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self::with_client(client, availability_uri, offer_uri, plan_uri))
    }

    pub fn with_client(
        client: Client,
        availability_uri: String,
        offer_uri: String,
        plan_uri: String,
    ) -> Self {
        Self {
            client,
            availability_uri,
            offer_uri,
            plan_uri,
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        resource: Resource,
        base_uri: &str,
        id: Uuid,
        token: &str,
    ) -> Result<T, ServiceError> {
        let url = format!("{}/{}", base_uri.trim_end_matches('/'), id);

        tracing::debug!("Making API call to {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| ServiceError::Request { resource, source })?;

        let status = response.status();
        match status {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(ServiceError::NotFound {
                    resource,
                    id: id.to_string(),
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ServiceError::Forbidden {
                    resource,
                    status: status.as_u16(),
                })
            }
            _ => {
                return Err(ServiceError::Api {
                    resource,
                    status: status.as_u16(),
                })
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ServiceError::Request { resource, source })?;

        serde_json::from_slice(&body).map_err(|e| ServiceError::InvalidResponse {
            resource,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl AvailabilityStore for ApiGateway {
    async fn get_availability(&self, window_id: Uuid, token: &str) -> Result<AvailabilityWindow, ServiceError> {
        self.fetch(Resource::Availability, &self.availability_uri, window_id, token)
            .await
    }
}

#[async_trait]
impl OfferStore for ApiGateway {
    async fn get_offer(&self, offer_id: Uuid, token: &str) -> Result<Offer, ServiceError> {
        self.fetch(Resource::Offer, &self.offer_uri, offer_id, token).await
    }
}

#[async_trait]
impl PlanStore for ApiGateway {
    async fn get_plan(&self, plan_id: Uuid, token: &str) -> Result<Plan, ServiceError> {
        self.fetch(Resource::Plan, &self.plan_uri, plan_id, token).await
    }
}
