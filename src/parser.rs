// 🏗️ Source Parser
// Two heterogeneous sources → one record set:
// - cars XML: type / model / prices per <car>
// - release CSV: brand → MM/DD/YYYY
// Joined through the brand resolved from each model.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::brands::{resolve_brand, UNKNOWN_BRAND};
use crate::error::SourceError;
use crate::model::Car;

// ============================================================================
// CORE TYPES
// ============================================================================

/// SourceType - which input a reader handles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    CarsXml,
    ReleaseCsv,
}

impl SourceType {
    /// Human-readable name for logs and errors
    pub fn name(&self) -> &str {
        match self {
            SourceType::CarsXml => "cars XML",
            SourceType::ReleaseCsv => "release dates CSV",
        }
    }
}

/// RawCar - one <car> element before brand resolution and the date join
#[derive(Debug, Clone, PartialEq)]
pub struct RawCar {
    pub car_type: String,
    pub model: String,
    pub prices: BTreeMap<String, f64>,
}

/// Brand → unparsed release date string, last CSV row wins
pub type ReleaseTable = HashMap<String, String>;

// ============================================================================
// READER TRAIT
// ============================================================================

/// SourceReader - turns one input document into its raw representation
///
/// Only `read_str` is required; file handling is shared.
pub trait SourceReader: Send + Sync {
    type Output;

    /// Parse an in-memory document
    fn read_str(&self, content: &str) -> Result<Self::Output, SourceError>;

    /// Get the source type this reader handles
    fn source_type(&self) -> SourceType;

    /// Read and parse a file
    fn read_file(&self, path: &Path) -> Result<Self::Output, SourceError> {
        let content = fs::read_to_string(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            "Read {} bytes of {} from {}",
            content.len(),
            self.source_type().name(),
            path.display()
        );

        self.read_str(&content)
    }
}

// ============================================================================
// XML READER
// ============================================================================

/// Cars XML reader
///
/// Every `<car>` element (at any depth) becomes one `RawCar`. Prices may come
/// as a single `<price currency="..">` child, a `<prices>` wrapper of many, or
/// both; entries merge in document order and a repeated currency keeps the
/// last value read.
pub struct XmlCarReader;

impl XmlCarReader {
    pub fn new() -> Self {
        XmlCarReader
    }
}

impl Default for XmlCarReader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Type,
    Model,
    Price,
}

impl Field {
    fn element(&self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::Model => "model",
            Field::Price => "price",
        }
    }
}

/// Text being collected for one field element
struct Capture {
    field: Field,
    depth: usize,
    currency: Option<String>,
    text: String,
}

impl Capture {
    /// Start capturing if `e` is one of the fields we read
    fn start(e: &BytesStart, depth: usize, index: usize) -> Result<Option<Capture>, SourceError> {
        let field = match e.local_name().as_ref() {
            b"type" => Field::Type,
            b"model" => Field::Model,
            b"price" => Field::Price,
            _ => return Ok(None),
        };

        let currency = if field == Field::Price {
            Some(currency_attribute(e)?.ok_or(SourceError::MissingCurrency { index })?)
        } else {
            None
        };

        Ok(Some(Capture {
            field,
            depth,
            currency,
            text: String::new(),
        }))
    }
}

/// A <car> whose end tag hasn't been read yet
///
/// Fields belong to the innermost open car, so a nested car never leaks
/// its type/model/prices into the car around it.
struct OpenCar {
    slot: usize,
    depth: usize,
    builder: CarBuilder,
    capture: Option<Capture>,
}

impl OpenCar {
    fn new(slot: usize, depth: usize) -> Self {
        OpenCar {
            slot,
            depth,
            builder: CarBuilder::default(),
            capture: None,
        }
    }

    /// 1-based position in document order
    fn index(&self) -> usize {
        self.slot + 1
    }
}

#[derive(Default)]
struct CarBuilder {
    car_type: Option<String>,
    model: Option<String>,
    prices: BTreeMap<String, f64>,
}

impl CarBuilder {
    fn apply(&mut self, capture: Capture, index: usize) -> Result<(), SourceError> {
        let text = capture.text.trim().to_string();
        match capture.field {
            // First occurrence wins for the scalar fields
            Field::Type => {
                self.car_type.get_or_insert(text);
            }
            Field::Model => {
                self.model.get_or_insert(text);
            }
            Field::Price => {
                let currency = capture.currency.unwrap_or_default();
                let amount = parse_price(&text).ok_or_else(|| SourceError::InvalidPrice {
                    index,
                    currency: currency.clone(),
                    value: text.clone(),
                })?;
                self.prices.insert(currency, amount);
            }
        }
        Ok(())
    }

    fn build(self, index: usize) -> Result<RawCar, SourceError> {
        let car_type = self.car_type.ok_or(SourceError::MissingField {
            index,
            field: Field::Type.element(),
        })?;
        let model = self.model.ok_or(SourceError::MissingField {
            index,
            field: Field::Model.element(),
        })?;

        Ok(RawCar {
            car_type,
            model,
            prices: self.prices,
        })
    }
}

fn currency_attribute(e: &BytesStart) -> Result<Option<String>, SourceError> {
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.local_name().as_ref() == b"currency" {
            return Ok(Some(attr.unescape_value()?.trim().to_string()));
        }
    }
    Ok(None)
}

/// Non-negative, finite decimal
fn parse_price(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount >= 0.0)
}

impl SourceReader for XmlCarReader {
    type Output = Vec<RawCar>;

    fn read_str(&self, content: &str) -> Result<Vec<RawCar>, SourceError> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);

        // One slot per <car>, in start-tag order; filled when the car closes
        let mut slots: Vec<Option<RawCar>> = Vec::new();
        let mut open: Vec<OpenCar> = Vec::new();
        let mut depth = 0usize;
        let mut saw_element = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    saw_element = true;
                    depth += 1;
                    if e.local_name().as_ref() == b"car" {
                        open.push(OpenCar::new(slots.len(), depth));
                        slots.push(None);
                    } else if let Some(car) = open.last_mut() {
                        if car.capture.is_none() {
                            car.capture = Capture::start(&e, depth, car.index())?;
                        }
                    }
                }
                Event::Empty(e) => {
                    saw_element = true;
                    if e.local_name().as_ref() == b"car" {
                        let index = slots.len() + 1;
                        slots.push(Some(CarBuilder::default().build(index)?));
                    } else if let Some(car) = open.last_mut() {
                        if car.capture.is_none() {
                            if let Some(empty) = Capture::start(&e, depth + 1, car.index())? {
                                car.builder.apply(empty, car.index())?;
                            }
                        }
                    }
                }
                Event::Text(t) => {
                    if let Some(capture) = open.last_mut().and_then(|car| car.capture.as_mut()) {
                        capture.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(capture) = open.last_mut().and_then(|car| car.capture.as_mut()) {
                        capture.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::End(_) => {
                    if open.last().is_some_and(|car| car.depth == depth) {
                        if let Some(car) = open.pop() {
                            let index = car.index();
                            slots[car.slot] = Some(car.builder.build(index)?);
                        }
                    } else if let Some(car) = open.last_mut() {
                        if matches!(&car.capture, Some(field) if field.depth == depth) {
                            if let Some(done) = car.capture.take() {
                                let index = car.index();
                                car.builder.apply(done, index)?;
                            }
                        }
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_element {
            return Err(SourceError::EmptyDocument {
                source_type: self.source_type().name().to_string(),
            });
        }
        if !open.is_empty() {
            return Err(quick_xml::Error::IllFormed(
                quick_xml::errors::IllFormedError::MissingEndTag("car".to_string()),
            )
            .into());
        }

        let cars: Vec<RawCar> = slots.into_iter().flatten().collect();
        debug!("Parsed {} car elements", cars.len());
        Ok(cars)
    }

    fn source_type(&self) -> SourceType {
        SourceType::CarsXml
    }
}

// ============================================================================
// CSV READER
// ============================================================================

/// Release dates CSV reader
///
/// Header line is skipped. Quotes are stripped, then each line must have
/// exactly two fields (brand, date); anything else is skipped.
pub struct CsvReleaseReader;

impl CsvReleaseReader {
    pub fn new() -> Self {
        CsvReleaseReader
    }
}

impl Default for CsvReleaseReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceReader for CsvReleaseReader {
    type Output = ReleaseTable;

    fn read_str(&self, content: &str) -> Result<ReleaseTable, SourceError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .quoting(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut table = ReleaseTable::new();

        for result in reader.records() {
            let record = result?;

            let mut fields: Vec<String> = record
                .iter()
                .map(|field| field.replace('"', "").trim().to_string())
                .collect();
            while fields.last().is_some_and(|f| f.is_empty()) {
                fields.pop();
            }

            if let [brand, date] = fields.as_slice() {
                table.insert(brand.clone(), date.clone());
            } else {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                warn!("Skipping CSV line {}: expected 2 fields, found {}", line, fields.len());
            }
        }

        debug!("Parsed {} brand release dates", table.len());
        Ok(table)
    }

    fn source_type(&self) -> SourceType {
        SourceType::ReleaseCsv
    }
}

// ============================================================================
// JOIN
// ============================================================================

/// CSV dates are always MM/DD/YYYY, zero-padded
fn parse_csv_date(brand: &str, value: &str) -> Result<NaiveDate, SourceError> {
    // chrono alone would also take 1/5/2020
    let padded = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            2 | 5 => b == b'/',
            _ => b.is_ascii_digit(),
        });

    padded
        .then(|| NaiveDate::parse_from_str(value, "%m/%d/%Y").ok())
        .flatten()
        .ok_or_else(|| SourceError::InvalidReleaseDate {
            brand: brand.to_string(),
            value: value.to_string(),
        })
}

/// Resolve each car's brand and attach its release date
///
/// A brand with no CSV row leaves the date empty. A row that exists but
/// doesn't parse fails the whole join. Rows nobody references are ignored.
pub fn join(raw_cars: Vec<RawCar>, releases: &ReleaseTable) -> Result<Vec<Car>, SourceError> {
    raw_cars
        .into_iter()
        .map(|raw| -> Result<Car, SourceError> {
            let brand = resolve_brand(&raw.model);
            if brand == UNKNOWN_BRAND {
                debug!("No brand known for model {:?}", raw.model);
            }

            let release_date = releases
                .get(brand)
                .map(|value| parse_csv_date(brand, value))
                .transpose()?;

            Ok(Car {
                brand: brand.to_string(),
                car_type: raw.car_type,
                model: raw.model,
                release_date,
                prices: raw.prices,
            })
        })
        .collect()
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Parse both source files and join them
pub fn parse(xml_path: &Path, csv_path: &Path) -> Result<Vec<Car>, SourceError> {
    let raw_cars = XmlCarReader::new().read_file(xml_path)?;
    let releases = CsvReleaseReader::new().read_file(csv_path)?;
    join(raw_cars, &releases)
}

/// Same as [`parse`] for in-memory documents
pub fn parse_str(xml: &str, csv: &str) -> Result<Vec<Car>, SourceError> {
    let raw_cars = XmlCarReader::new().read_str(xml)?;
    let releases = CsvReleaseReader::new().read_str(csv)?;
    join(raw_cars, &releases)
}

// ============================================================================
// TESTS
// ============================================================================
