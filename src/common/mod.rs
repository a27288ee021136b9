//! Generic metadata plumbing shared by every metadata kind
//!
//! - `traits`: the `Metadata` entity trait and `ResourceHandler` hooks
//! - `response_manager`: the paginated fetch-and-cache engine
//! - `transport`: HTTP and in-memory page fetchers
//! - `cursor`: next-link normalization

pub mod cursor;
pub mod response_manager;
pub mod traits;
pub mod transport;

pub use cursor::request_uri;
pub use response_manager::{LoadOptions, LoadReport, ResponseManager};
pub use traits::{ItemLookup, Metadata, ResourceHandler};
pub use transport::{HttpPageFetcher, PageFetcher, StaticPageFetcher};
