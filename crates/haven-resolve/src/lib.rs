//! The postal-code → nearby-resources resolution pipeline.
//!
//! Everything between the HTTP surface and the geocoding clients lives here:
//! the TTL response cache, the per-client rate limiter, the resource-directory
//! collaborator interface, distance matching, the national catalogs, and the
//! [`ResolverService`] that ties the pipeline together.

pub mod directory;
pub mod matcher;
pub mod nationals;
pub mod rate_limit;
pub mod service;
pub mod store;
pub mod types;

pub use directory::{
    DirectoryError, FileDirectory, LocationRecord, ResourceDirectory, StaticDirectory,
};
pub use rate_limit::{Admission, RateLimiter};
pub use service::{ResolveError, ResolverService, DEGRADED_ADVISORY};
pub use store::{MemoryTtlStore, TtlStore};
pub use types::{LocalResource, NationalResource, ResolvedResponse, ResourceKind};
