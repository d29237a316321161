//! Server crate for the shop recommendation engine.
//!
//! This crate contains the service that turns a user id into a ranked,
//! serializable list of product recommendations. HTTP routing and auth
//! live in front of it; this crate stops at the response body.

pub mod config;
pub mod error;
pub mod service;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use service::{
    AnchorRecommendationId, ProductRecommendation, RecommendationResponse, RecommendationService,
    recommendation_id,
};
