pub mod email_extractor;
pub mod link_discoverer;
pub mod result_aggregator;
pub mod result_writer;

pub use email_extractor::{extract_emails, EmailExtractor};
pub use link_discoverer::discover_links;
pub use result_aggregator::ResultAggregator;
pub use result_writer::ResultWriter;
