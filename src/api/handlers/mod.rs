pub mod access_request;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod invite;
pub mod profile;
pub mod provider;
