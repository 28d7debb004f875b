use crate::models::{CandidateProfile, RecruiterProfile, UserProfile};
use crate::services::{Resource, ServiceError, UserDirectory};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use uuid::Uuid;

const ROLE_CANDIDATE: &str = "candidate";
const ROLE_RECRUITER: &str = "recruiter";

/// Refresh the admin token this long before it actually expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(10);

/// Connection settings for the Keycloak admin API
#[derive(Debug, Clone)]
pub struct KeycloakSettings {
    pub base_url: String,
    pub realm: String,
    pub admin_username: String,
    pub admin_password: String,
    pub client_id: String,
    pub page_size: usize,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    60
}

struct AdminToken {
    value: String,
    expires_at: Instant,
}

/// User record as returned by the Keycloak admin API
#[derive(Debug, Clone, Deserialize)]
struct KeycloakUser {
    id: String,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(rename = "firstName", default)]
    first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    last_name: Option<String>,
    #[serde(default)]
    attributes: Option<HashMap<String, Vec<String>>>,
}

impl KeycloakUser {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|attrs| attrs.get(name))
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn uuid_attribute(&self, name: &str) -> Result<Option<Uuid>, ServiceError> {
        self.attribute(name)
            .map(|value| parse_uuid(name, value))
            .transpose()
    }

    fn uuid_list_attribute(&self, name: &str) -> Result<Vec<Uuid>, ServiceError> {
        self.attributes
            .as_ref()
            .and_then(|attrs| attrs.get(name))
            .map(|values| values.iter().map(|v| parse_uuid(name, v)).collect())
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    fn into_profile(self) -> Result<UserProfile, ServiceError> {
        let id = parse_uuid("id", &self.id)?;
        let role = self.attribute("role").map(str::to_string);

        let profile = match role.as_deref() {
            Some(ROLE_CANDIDATE) => UserProfile::Candidate(CandidateProfile {
                id,
                profile_picture_url: self.attribute("profilePictureUrl").map(str::to_string),
                phone: self.attribute("phone").map(str::to_string),
                availability_ids: self.uuid_list_attribute("availabilityIdList")?,
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
            }),
            Some(ROLE_RECRUITER) => UserProfile::Recruiter(RecruiterProfile {
                id,
                company_id: self.uuid_attribute("companyId")?,
                plan_id: self.uuid_attribute("planId")?,
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
            }),
            _ => UserProfile::Other { id, role },
        };

        Ok(profile)
    }
}

fn parse_uuid(field: &str, value: &str) -> Result<Uuid, ServiceError> {
    Uuid::parse_str(value).map_err(|e| ServiceError::InvalidResponse {
        resource: Resource::User,
        message: format!("{} is not a UUID ({:?}): {}", field, value, e),
    })
}

/// User directory backed by the Keycloak admin REST API
///
/// Authenticates as the realm admin with the password grant and keeps the
/// admin token until shortly before it expires.
pub struct KeycloakDirectory {
    client: Client,
    settings: KeycloakSettings,
    token: Mutex<Option<AdminToken>>,
}

impl KeycloakDirectory {
    /// Create a new directory client
    pub fn new(settings: KeycloakSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self::with_client(client, settings))
    }

    pub fn with_client(client: Client, settings: KeycloakSettings) -> Self {
        Self {
            client,
            settings,
            token: Mutex::new(None),
        }
    }

    fn base_url(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    fn users_url(&self) -> String {
        format!(
            "{}/admin/realms/{}/users",
            self.base_url(),
            urlencoding::encode(&self.settings.realm)
        )
    }

    async fn admin_token(&self) -> Result<String, ServiceError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url(),
            urlencoding::encode(&self.settings.realm)
        );

        tracing::debug!("Requesting admin token from {}", url);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "password"),
                ("client_id", self.settings.client_id.as_str()),
                ("username", self.settings.admin_username.as_str()),
                ("password", self.settings.admin_password.as_str()),
            ])
            .send()
            .await
            .map_err(|source| ServiceError::Request {
                resource: Resource::IdentityProvider,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("Admin login rejected by identity provider: {}", status);
            return Err(ServiceError::Api {
                resource: Resource::IdentityProvider,
                status: status.as_u16(),
            });
        }

        let body: TokenResponse = response.json().await.map_err(|e| ServiceError::InvalidResponse {
            resource: Resource::IdentityProvider,
            message: e.to_string(),
        })?;

        let lifetime = Duration::from_secs(body.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(AdminToken {
            value: body.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        Ok(body.access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, id: &str) -> Result<T, ServiceError> {
        let token = self.admin_token().await?;

        let response = self
            .client
            .get(url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|source| ServiceError::Request {
                resource: Resource::User,
                source,
            })?;

        let status = response.status();
        match status {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(ServiceError::NotFound {
                    resource: Resource::User,
                    id: id.to_string(),
                })
            }
            StatusCode::UNAUTHORIZED => {
                // Token revoked early; drop it so the next call logs in again
                self.token.lock().await.take();
                return Err(ServiceError::Api {
                    resource: Resource::IdentityProvider,
                    status: status.as_u16(),
                });
            }
            _ => {
                return Err(ServiceError::Api {
                    resource: Resource::User,
                    status: status.as_u16(),
                })
            }
        }

        response.json().await.map_err(|e| ServiceError::InvalidResponse {
            resource: Resource::User,
            message: e.to_string(),
        })
    }

    /// Fetch every user in the realm except the admin account
    async fn list_users(&self) -> Result<Vec<UserProfile>, ServiceError> {
        let page_size = self.settings.page_size.max(1);
        let mut profiles = Vec::new();
        let mut first = 0;

        loop {
            let url = format!(
                "{}?briefRepresentation=false&first={}&max={}",
                self.users_url(),
                first,
                page_size
            );
            let page: Vec<KeycloakUser> = self.get_json(&url, "*").await?;
            let fetched = page.len();

            for user in page {
                if user.username.as_deref() == Some(self.settings.admin_username.as_str()) {
                    continue;
                }
                profiles.push(user.into_profile()?);
            }

            if fetched < page_size {
                break;
            }
            first += page_size;
        }

        tracing::debug!("Listed {} users from identity provider", profiles.len());

        Ok(profiles)
    }
}

#[async_trait]
impl UserDirectory for KeycloakDirectory {
    async fn list_candidates(&self) -> Result<Vec<CandidateProfile>, ServiceError> {
        Ok(self
            .list_users()
            .await?
            .into_iter()
            .filter_map(UserProfile::into_candidate)
            .collect())
    }

    async fn get_user(&self, subject_id: &str) -> Result<UserProfile, ServiceError> {
        let url = format!("{}/{}", self.users_url(), urlencoding::encode(subject_id));
        let user: KeycloakUser = self.get_json(&url, subject_id).await?;
        user.into_profile()
    }
}
