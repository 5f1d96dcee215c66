//! Filing retrieval and parsing

pub mod circuit_breaker;
pub mod edgar;
pub mod info_table;
pub mod provider;
pub mod snapshot_file;
pub mod sources;

pub use circuit_breaker::CircuitBreaker;
pub use edgar::{EdgarConfig, EdgarProvider};
pub use info_table::{aggregate_holdings, holdings_from_xml, parse_info_table, InfoTableRow};
pub use provider::{DataError, Filing, HoldingsProvider};
pub use snapshot_file::{load_snapshots, parse_snapshots};
pub use sources::{Source, SourceRegistry};
