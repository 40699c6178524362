pub mod email;
pub mod link;
pub mod result;
pub mod seed;

pub use email::{EmailSource, ExtractedEmailSet};
pub use link::DiscoveredLink;
pub use result::{CrawlStatus, DomainResult};
pub use seed::{validate_seeds, SeedTarget};
