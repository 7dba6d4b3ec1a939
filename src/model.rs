// 🚗 Record Model
// One joined car record: XML type/model/prices + CSV release date via brand

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// CURRENCIES
// ============================================================================

pub const JPY: &str = "JPY";
pub const EUR: &str = "EUR";
pub const GBP: &str = "GBP";
pub const USD: &str = "USD";

// ============================================================================
// CAR
// ============================================================================

/// Car - fully populated by the parser, read-only afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Resolved from `model`, "Unknown" when the model isn't in the table
    pub brand: String,

    #[serde(rename = "type")]
    pub car_type: String,

    pub model: String,

    /// Serialized as YYYY-MM-DD or null
    pub release_date: Option<NaiveDate>,

    /// Currency code → price, as given in the source (never converted)
    pub prices: BTreeMap<String, f64>,
}

impl Car {
    pub fn new(brand: String, car_type: String, model: String) -> Self {
        Car {
            brand,
            car_type,
            model,
            release_date: None,
            prices: BTreeMap::new(),
        }
    }

    /// Builder pattern: add release date
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }

    /// Builder pattern: add (or overwrite) a price
    pub fn with_price(mut self, currency: &str, amount: f64) -> Self {
        self.prices.insert(currency.to_string(), amount);
        self
    }

    /// Price in the given currency, 0.0 when absent
    pub fn price(&self, currency: &str) -> f64 {
        self.prices.get(currency).copied().unwrap_or(0.0)
    }

    pub fn usd_price(&self) -> f64 {
        self.price(USD)
    }

    /// Release date as YYYY-MM-DD, "-" when absent
    pub fn release_date_label(&self) -> String {
        match self.release_date {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "-".to_string(),
        }
    }
}

/// Plain one-line form (renderer fallback)
impl fmt::Display for Car {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prices: Vec<String> = self
            .prices
            .iter()
            .map(|(currency, amount)| format!("{}={:?}", currency, amount))
            .collect();

        write!(
            f,
            "Car {{ brand: {}, type: {}, model: {}, releaseDate: {}, prices: {{{}}} }}",
            self.brand,
            self.car_type,
            self.model,
            self.release_date_label(),
            prices.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rav4() -> Car {
        Car::new("Toyota".to_string(), "SUV".to_string(), "RAV4".to_string())
            .with_price(USD, 25000.0)
            .with_price(EUR, 23000.0)
    }

    #[test]
    fn test_missing_price_defaults_to_zero() {
        let car = rav4();
        assert_eq!(car.usd_price(), 25000.0);
        assert_eq!(car.price(JPY), 0.0);
    }

    #[test]
    fn test_with_price_last_write_wins() {
        let car = rav4().with_price(USD, 26000.0);
        assert_eq!(car.prices.len(), 2);
        assert_eq!(car.usd_price(), 26000.0);
    }

    #[test]
    fn test_release_date_label() {
        let car = rav4();
        assert_eq!(car.release_date_label(), "-");

        let car = car.with_release_date(NaiveDate::from_ymd_opt(2020, 1, 5).unwrap());
        assert_eq!(car.release_date_label(), "2020-01-05");
    }

    #[test]
    fn test_serialized_field_names() {
        let car = rav4().with_release_date(NaiveDate::from_ymd_opt(2021, 3, 9).unwrap());
        let value = serde_json::to_value(&car).unwrap();

        assert_eq!(value["type"], "SUV");
        assert_eq!(value["releaseDate"], "2021-03-09");
        assert_eq!(value["prices"]["EUR"], 23000.0);
        assert!(value.get("car_type").is_none());
    }

    #[test]
    fn test_display_is_single_line() {
        let line = rav4().to_string();
        assert!(!line.contains('\n'));
        assert!(line.contains("brand: Toyota"));
        assert!(line.contains("releaseDate: -"));
        assert!(line.contains("EUR=23000.0, USD=25000.0"));
    }
}
