//! WebDAV protocol layer: requests, status codes, listing parser and client.

pub mod client;
#[cfg(test)]
pub(crate) mod mock;
pub mod multistatus;
pub mod request;
pub mod status;

pub use client::DavClient;
pub use multistatus::ListingRecord;
pub use request::{DavMethod, DavRequest, DavResponse, Transport};
pub use status::DavStatus;
