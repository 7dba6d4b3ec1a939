// 🔗 Pipeline
// parse → filter → sort → render, configured by one PipelineConfig per run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::error::PipelineError;
use crate::filter::filter;
use crate::model::Car;
use crate::parser::parse;
use crate::render::render;
use crate::sort::sort;

/// Filter request as it arrives from the outside: kind name + raw value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kind: String,
    pub value: String,
}

/// Everything one run needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub xml_path: PathBuf,
    pub csv_path: PathBuf,

    #[serde(default)]
    pub filter: Option<FilterSpec>,

    #[serde(default)]
    pub sort: Option<String>,

    #[serde(default = "default_output")]
    pub output: String,
}

fn default_output() -> String {
    "table".to_string()
}

impl PipelineConfig {
    pub fn new(xml_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            xml_path: xml_path.into(),
            csv_path: csv_path.into(),
            filter: None,
            sort: None,
            output: default_output(),
        }
    }

    /// Builder pattern: add filter
    pub fn with_filter(mut self, kind: &str, value: &str) -> Self {
        self.filter = Some(FilterSpec {
            kind: kind.to_string(),
            value: value.to_string(),
        });
        self
    }

    /// Builder pattern: add sort option
    pub fn with_sort(mut self, option: &str) -> Self {
        self.sort = Some(option.to_string());
        self
    }

    /// Builder pattern: set output format
    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.to_string();
        self
    }
}

/// Parse, filter and sort; the record set that would be rendered
pub fn process(config: &PipelineConfig) -> Result<Vec<Car>, PipelineError> {
    let cars = parse(&config.xml_path, &config.csv_path)?;
    info!(
        "Loaded {} cars from {} and {}",
        cars.len(),
        config.xml_path.display(),
        config.csv_path.display()
    );

    let cars = match &config.filter {
        Some(spec) => filter(&cars, &spec.kind, &spec.value)?,
        None => cars,
    };

    let cars = sort(cars, config.sort.as_deref())?;
    info!("{} cars after filter and sort", cars.len());

    Ok(cars)
}

/// Run the whole pipeline and return the rendered output
///
/// Nothing is rendered if any stage fails.
pub fn run(config: &PipelineConfig) -> Result<String, PipelineError> {
    let cars = process(config)?;
    Ok(render(&cars, &config.output))
}
