//! Named wrappers over [`ApiClient::request`](crate::ApiClient::request), one
//! per documented endpoint. Every wrapper returns the raw response body.
//!
//! Resources that can be fetched one at a time or as a filtered list expose
//! two methods: a singular one taking the id and a plural one taking
//! [`Params`](crate::Params) (or [`Paging`](crate::Paging)).

mod classrooms;
mod courses;
mod me;
mod orders;
mod resources;
mod site;

pub use me::extract_token;
pub use orders::{NewOrder, NewTrade};
