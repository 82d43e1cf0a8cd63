//! # sts-model
//!
//! Domain model types for the STS:
//!
//! - [`Issuer`] - a trusted external token issuer and its claim mappings
//! - [`ClaimsMapping`] - per-issuer claim transformation expressions
//! - [`UserInfo`] - a federated identity record bound to an
//!   (issuer, subject) pair
//! - [`OAuthClient`] - a registered service client for the
//!   client-credentials grant
//!
//! These types carry no storage or protocol behavior; providers in
//! `sts-storage` and the grant handler in `sts-oauth2` operate on them.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod claims_mapping;
pub mod issuer;
pub mod oauth_client;
pub mod user_info;

pub use claims_mapping::ClaimsMapping;
pub use issuer::{Issuer, IssuerUpdate};
pub use oauth_client::{CreatedOAuthClient, NewOAuthClient, OAuthClient};
pub use user_info::{NewUserInfo, UserInfo};
