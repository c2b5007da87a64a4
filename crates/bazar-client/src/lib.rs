pub mod auth;
pub mod client;
pub mod envelope;
pub mod error;
pub mod media;
pub mod normalize;
pub mod session;
pub mod types;

pub use auth::{AuthStore, VerifyOutcome};
pub use client::{ApiClient, ImageUpload, LoginResponse, ProductPage, ProductUpdate};
pub use envelope::ApiEnvelope;
pub use error::ClientError;
pub use media::youtube_embed_url;
pub use session::{
    AuthStatus, LoginRedirect, NoRedirect, Session, SessionSnapshot, AUTH_TOKEN_KEY, LOGIN_ROUTE,
};
pub use types::Pagination;
