//! Badge server API layer.
//!
//! The transport contract ([`transport::Transport`]) is the seam between the
//! form submission flow and the wire: production uses the pooled reqwest
//! client in [`client`], tests substitute scripted fakes. Response records
//! land in the collection store and stay opaque JSON until read through the
//! views in [`models`].

pub mod client;
pub mod collections;
pub mod models;
pub mod transport;

pub use client::BadgrClient;
pub use collections::{CollectionEvent, CollectionKey, CollectionStore};
pub use models::{BadgeClassRecord, BadgeInstanceRecord, IssuerRecord};
pub use transport::{ApiOutcome, ApiRequest, FilePart, HttpMethod, Transport};
