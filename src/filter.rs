// 🔍 Filter Engine
// Named predicates over a record set. Output keeps input order.

use chrono::NaiveDate;
use std::str::FromStr;
use tracing::debug;

use crate::error::PipelineError;
use crate::model::Car;

// ============================================================================
// FILTER KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    BrandPrice,
    BrandRelease,
}

impl FilterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::BrandPrice => "brand-price",
            FilterKind::BrandRelease => "brand-release",
        }
    }

    /// Expected shape of the filter value
    pub fn usage(&self) -> &'static str {
        match self {
            FilterKind::BrandPrice => "brand,minPrice,maxPrice (e.g. Toyota,20000,30000)",
            FilterKind::BrandRelease => {
                "brand,yyyy-MM-dd or brand,yyyy,dd,MM (e.g. Honda,2020-05-10 or Honda,2020,10,05)"
            }
        }
    }
}

impl FromStr for FilterKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brand-price" => Ok(FilterKind::BrandPrice),
            "brand-release" => Ok(FilterKind::BrandRelease),
            _ => Err(PipelineError::UnsupportedFilter(s.to_string())),
        }
    }
}

// ============================================================================
// FILTER
// ============================================================================

/// A parsed, ready-to-apply filter
#[derive(Debug, Clone, PartialEq)]
pub enum CarFilter {
    /// Brand (any case) with USD price in [min, max]
    BrandPrice { brand: String, min: f64, max: f64 },

    /// Brand (any case) released exactly on `date`
    BrandRelease { brand: String, date: NaiveDate },
}

impl CarFilter {
    /// Build a filter from its kind name and comma-delimited value
    pub fn parse(kind: &str, value: &str) -> Result<Self, PipelineError> {
        let kind = kind.parse::<FilterKind>()?;
        let malformed = |reason: &str| {
            PipelineError::malformed(kind.as_str(), value, format!("{}; expected {}", reason, kind.usage()))
        };

        match kind {
            FilterKind::BrandPrice => {
                let parts: Vec<&str> = value.split(',').map(str::trim).collect();
                let [brand, min, max] = parts.as_slice() else {
                    return Err(malformed("wrong number of fields"));
                };
                if brand.is_empty() {
                    return Err(malformed("brand is empty"));
                }

                let min = parse_bound(min).ok_or_else(|| malformed("minPrice is not a non-negative number"))?;
                let max = parse_bound(max).ok_or_else(|| malformed("maxPrice is not a non-negative number"))?;
                if min > max {
                    return Err(malformed("minPrice is greater than maxPrice"));
                }

                Ok(CarFilter::BrandPrice {
                    brand: brand.to_string(),
                    min,
                    max,
                })
            }
            FilterKind::BrandRelease => {
                let (brand, date) = value
                    .split_once(',')
                    .ok_or_else(|| malformed("missing release date"))?;
                let brand = brand.trim();
                if brand.is_empty() {
                    return Err(malformed("brand is empty"));
                }

                // "2020 ,10, 05" reads the same as "2020,10,05"
                let date: Vec<&str> = date.split(',').map(str::trim).collect();
                let date = parse_filter_date(&date.join(",")).ok_or_else(|| malformed("unrecognised date"))?;

                Ok(CarFilter::BrandRelease {
                    brand: brand.to_string(),
                    date,
                })
            }
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            CarFilter::BrandPrice { .. } => FilterKind::BrandPrice,
            CarFilter::BrandRelease { .. } => FilterKind::BrandRelease,
        }
    }

    pub fn matches(&self, car: &Car) -> bool {
        match self {
            CarFilter::BrandPrice { brand, min, max } => {
                let usd = car.usd_price();
                car.brand.eq_ignore_ascii_case(brand) && usd >= *min && usd <= *max
            }
            CarFilter::BrandRelease { brand, date } => {
                car.brand.eq_ignore_ascii_case(brand) && car.release_date == Some(*date)
            }
        }
    }

    /// Surviving records, in input order
    pub fn apply(&self, cars: &[Car]) -> Vec<Car> {
        cars.iter().filter(|car| self.matches(car)).cloned().collect()
    }
}

fn parse_bound(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|bound| bound.is_finite() && *bound >= 0.0)
}

/// Release date as typed in a filter: YYYY-MM-DD, else YYYY,DD,MM
///
/// Not shared with the CSV join, which only accepts MM/DD/YYYY.
pub fn parse_filter_date(text: &str) -> Option<NaiveDate> {
    if is_padded_date(text, b'-') {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    } else if is_padded_date(text, b',') {
        NaiveDate::parse_from_str(text, "%Y,%d,%m").ok()
    } else {
        None
    }
}

/// `dddd?dd?dd` with `separator` in both gaps
fn is_padded_date(text: &str, separator: u8) -> bool {
    text.len() == 10
        && text.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == separator,
            _ => b.is_ascii_digit(),
        })
}

/// Apply the filter named `kind` with `value` to `cars`
pub fn filter(cars: &[Car], kind: &str, value: &str) -> Result<Vec<Car>, PipelineError> {
    let car_filter = CarFilter::parse(kind, value)?;
    let kept = car_filter.apply(cars);

    debug!(
        "Filter {} kept {} of {} cars",
        car_filter.kind().as_str(),
        kept.len(),
        cars.len()
    );

    Ok(kept)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::USD;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn car(brand: &str, model: &str, usd: Option<f64>, date: Option<NaiveDate>) -> Car {
        let mut car = Car::new(brand.to_string(), "SUV".to_string(), model.to_string());
        if let Some(usd) = usd {
            car = car.with_price(USD, usd);
        }
        car.release_date = date;
        car
    }

    fn sample() -> Vec<Car> {
        vec![
            car("Toyota", "RAV4", Some(25000.0), Some(d(2020, 1, 15))),
            car("Honda", "Civic", Some(22000.0), Some(d(2020, 5, 10))),
            car("Toyota", "RAV4", Some(20000.0), None),
            car("Toyota", "RAV4", Some(30000.0), None),
            car("Toyota", "RAV4", Some(30000.01), None),
            car("Toyota", "RAV4", None, None),
            car("Honda", "Civic", Some(21000.0), Some(d(2021, 5, 10))),
        ]
    }

    #[test]
    fn test_brand_price_inclusive_bounds_in_order() {
        let result = filter(&sample(), "brand-price", "Toyota,20000,30000").unwrap();
        let prices: Vec<f64> = result.iter().map(Car::usd_price).collect();

        assert_eq!(prices, vec![25000.0, 20000.0, 30000.0]);
        assert!(result.iter().all(|c| c.brand == "Toyota"));
    }

    #[test]
    fn test_brand_price_missing_usd_counts_as_zero() {
        let result = filter(&sample(), "brand-price", "toyota,0,0").unwrap();

        assert_eq!(result.len(), 1);
        assert!(result[0].prices.is_empty());
    }

    #[test]
    fn test_brand_price_decimal_bounds() {
        let result = filter(&sample(), "brand-price", "TOYOTA,30000.005,30000.01").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].usd_price(), 30000.01);
    }

    #[test]
    fn test_brand_release_dash_and_comma_equivalent() {
        let cars = sample();
        let dashed = filter(&cars, "brand-release", "Honda,2020-05-10").unwrap();
        let commas = filter(&cars, "brand-release", "Honda,2020,10,05").unwrap();

        assert_eq!(dashed.len(), 1);
        assert_eq!(dashed, commas);
        assert_eq!(dashed[0].usd_price(), 22000.0);
    }

    #[test]
    fn test_brand_release_ignores_cars_without_date() {
        let result = filter(&sample(), "brand-release", "Toyota,2020-01-15").unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].release_date, Some(d(2020, 1, 15)));
    }

    #[test]
    fn test_kind_is_case_insensitive() {
        assert_eq!("Brand-Price".parse::<FilterKind>().unwrap(), FilterKind::BrandPrice);
        assert_eq!(" brand-release ".parse::<FilterKind>().unwrap(), FilterKind::BrandRelease);
    }

    #[test]
    fn test_unsupported_kind() {
        let err = filter(&sample(), "brand-colour", "Toyota,red").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFilter(ref k) if k == "brand-colour"));
    }

    #[test]
    fn test_malformed_brand_price_values() {
        for value in [
            "Toyota",
            "Toyota,20000",
            "Toyota,20000,30000,40000",
            ",20000,30000",
            "Toyota,cheap,30000",
            "Toyota,-1,30000",
            "Toyota,30000,20000",
        ] {
            let err = filter(&sample(), "brand-price", value).unwrap_err();
            assert!(
                matches!(err, PipelineError::MalformedFilterValue { .. }),
                "{:?} should be malformed",
                value
            );
        }
    }

    #[test]
    fn test_malformed_brand_release_values() {
        for value in ["Honda", "Honda,05/10/2020", "Honda,2020-13-01", ",2020-05-10", "Honda,2020,31,02"] {
            let err = filter(&sample(), "brand-release", value).unwrap_err();
            assert!(
                matches!(err, PipelineError::MalformedFilterValue { .. }),
                "{:?} should be malformed",
                value
            );
        }
    }

    #[test]
    fn test_parse_filter_date_formats() {
        assert_eq!(parse_filter_date("2020-05-10"), Some(d(2020, 5, 10)));
        assert_eq!(parse_filter_date("2020,10,05"), Some(d(2020, 5, 10)));
        assert_eq!(parse_filter_date("05/10/2020"), None);
    }

    #[test]
    fn test_parse_filter_date_requires_padding() {
        assert_eq!(parse_filter_date("2020-5-10"), None);
        assert_eq!(parse_filter_date("2020-05-1"), None);
        assert_eq!(parse_filter_date("2020,10,5"), None);
        assert_eq!(parse_filter_date("+2020-05-10"), None);
    }

    #[test]
    fn test_brand_release_unpadded_date_is_malformed() {
        for value in ["Honda,2020-5-10", "Honda,2020,10,5"] {
            let err = filter(&sample(), "brand-release", value).unwrap_err();
            assert!(
                matches!(err, PipelineError::MalformedFilterValue { .. }),
                "{:?} should be malformed",
                value
            );
        }
    }

    #[test]
    fn test_brand_release_comma_form_tolerates_spaces() {
        let cars = sample();
        let spaced = filter(&cars, "brand-release", "Honda, 2020 ,10, 05 ").unwrap();
        let dashed = filter(&cars, "brand-release", "Honda, 2020-05-10").unwrap();

        assert_eq!(spaced.len(), 1);
        assert_eq!(spaced, dashed);
    }

    #[test]
    fn test_filter_does_not_touch_input() {
        let cars = sample();
        let before = cars.clone();
        let _ = filter(&cars, "brand-price", "Honda,0,100000").unwrap();
        assert_eq!(cars, before);
    }
}
