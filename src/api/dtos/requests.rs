use serde::Deserialize;
use validator::Validate;
use crate::domain::services::provider_service::{DirectoryQuery, ProviderInput};

#[derive(Deserialize, Validate)]
pub struct SubmitAccessRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be 1 to 120 characters"))]
    pub name: String,
    #[validate(email(message = "E-mail address is not valid"))]
    pub email: String,
    #[validate(length(max = 40, message = "Phone must be at most 40 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: Option<String>,
}

#[derive(Deserialize)]
pub struct AccessRequestListQuery {
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Deserialize)]
pub struct InviteQuery {
    pub token: Option<String>,
}

#[derive(Deserialize)]
pub struct RedeemInviteRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct ProviderPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    pub category: Option<String>,
    pub zone: Option<String>,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(max = 30, message = "At most 30 tags"))]
    pub tags: Vec<String>,
    #[validate(length(max = 500))]
    pub website: Option<String>,
    #[validate(length(max = 500))]
    pub facebook: Option<String>,
    #[validate(length(max = 500))]
    pub instagram: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
}

impl From<ProviderPayload> for ProviderInput {
    fn from(p: ProviderPayload) -> Self {
        ProviderInput {
            name: p.name,
            description: p.description,
            category: p.category,
            zone: p.zone,
            phone: p.phone,
            tags: p.tags,
            website: p.website,
            facebook: p.facebook,
            instagram: p.instagram,
            address: p.address,
        }
    }
}

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// `?q=&category=&zone=&tags=a,b`
#[derive(Deserialize, Default)]
pub struct DirectoryParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub zone: Option<String>,
    pub tags: Option<String>,
}

impl From<DirectoryParams> for DirectoryQuery {
    fn from(p: DirectoryParams) -> Self {
        DirectoryQuery {
            q: p.q,
            category: p.category,
            zone: p.zone,
            tags: p.tags
                .map(|t| t.split(',').map(str::to_string).collect())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_param_is_split_on_commas() {
        let params = DirectoryParams { tags: Some("vegan, delivery,".into()), ..Default::default() };
        let query: DirectoryQuery = params.into();
        assert_eq!(query.tags, vec!["vegan", " delivery", ""]);
    }

    #[test]
    fn access_request_payload_limits() {
        let ok = SubmitAccessRequest {
            name: "Ana García".into(),
            email: "ana@example.com".into(),
            phone: None,
            message: Some("Hola".into()),
        };
        assert!(ok.validate().is_ok());

        let bad_email = SubmitAccessRequest { email: "not-an-email".into(), ..ok };
        assert!(bad_email.validate().is_err());

        let long_name = SubmitAccessRequest {
            name: "x".repeat(121),
            email: "ana@example.com".into(),
            phone: None,
            message: None,
        };
        assert!(long_name.validate().is_err());
    }
}
