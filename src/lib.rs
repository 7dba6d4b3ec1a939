// Car Catalog - Core Library
// XML cars + CSV release dates → joined records → filter → sort → render

pub mod error;
pub mod model;
pub mod brands;
pub mod parser;
pub mod filter;
pub mod sort;
pub mod render;
pub mod pipeline;

// Re-export commonly used types
pub use error::{PipelineError, SourceError};
pub use model::{Car, EUR, GBP, JPY, USD};
pub use brands::{known_models, resolve_brand, UNKNOWN_BRAND};
pub use parser::{
    join, parse, parse_str,
    CsvReleaseReader, RawCar, ReleaseTable, SourceReader, SourceType, XmlCarReader,
};
pub use filter::{filter, parse_filter_date, CarFilter, FilterKind};
pub use sort::{sort, SortOption};
pub use render::{render, OutputFormat};
pub use pipeline::{process, run, FilterSpec, PipelineConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
