pub mod access_control;
pub mod access_request_service;
pub mod auth_service;
pub mod defaults;
pub mod invite_service;
pub mod invite_token;
pub mod notification;
pub mod provider_service;
