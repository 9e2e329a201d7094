pub mod catalog;
pub mod clock;
pub mod config;
pub mod date;
pub mod listing;
pub mod select;
pub mod speech;
pub mod voice;

pub use catalog::{CatalogError, ExhibitCatalog, FeedError, ListingsSource};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use date::{DateResolution, DateResolver, ResolverPolicy, TodayPolicy};
pub use listing::{ExhibitRecord, RawListing};
pub use select::select_next_ending;
pub use speech::format_listings;
