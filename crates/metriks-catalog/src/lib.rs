pub mod accumulator;
pub mod client;
pub mod controller;
pub mod error;
pub mod location;
pub mod normalize;
pub mod service;
pub mod session;
pub mod types;

pub use accumulator::accumulate;
pub use client::CatalogClient;
pub use controller::QueryController;
pub use error::{CatalogError, GeolocationError};
pub use location::{resolve_mode, FixedLocation, GeolocationProvider};
pub use normalize::{normalize_entries, normalize_product};
pub use service::CatalogService;
pub use session::{
    PageRequest, PageResponse, SearchSession, SearchStatus, SessionError, MIN_QUERY_CHARS,
};
