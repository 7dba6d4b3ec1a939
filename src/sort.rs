// 📊 Sort / Projection Engine
// year and price reorder; suv-eur, sedan-jpy and truck-usd also drop every
// record of another type. All orderings are descending and stable.

use std::cmp::Ordering;
use std::str::FromStr;
use tracing::debug;

use crate::error::PipelineError;
use crate::model::{Car, EUR, JPY, USD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOption {
    Year,
    Price,
    SuvEur,
    SedanJpy,
    TruckUsd,
}

impl SortOption {
    pub fn all() -> [SortOption; 5] {
        [
            SortOption::Year,
            SortOption::Price,
            SortOption::SuvEur,
            SortOption::SedanJpy,
            SortOption::TruckUsd,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::Year => "year",
            SortOption::Price => "price",
            SortOption::SuvEur => "suv-eur",
            SortOption::SedanJpy => "sedan-jpy",
            SortOption::TruckUsd => "truck-usd",
        }
    }

    /// (vehicle type, currency) for the projection sorts
    pub fn projection(&self) -> Option<(&'static str, &'static str)> {
        match self {
            SortOption::Year | SortOption::Price => None,
            SortOption::SuvEur => Some(("SUV", EUR)),
            SortOption::SedanJpy => Some(("Sedan", JPY)),
            SortOption::TruckUsd => Some(("Truck", USD)),
        }
    }

    pub fn apply(&self, mut cars: Vec<Car>) -> Vec<Car> {
        match self {
            SortOption::Year => cars.sort_by(by_release_date_desc),
            SortOption::Price => cars.sort_by(|a, b| by_price_desc(a, b, USD)),
            SortOption::SuvEur | SortOption::SedanJpy | SortOption::TruckUsd => {
                if let Some((car_type, currency)) = self.projection() {
                    cars.retain(|car| car.car_type.eq_ignore_ascii_case(car_type));
                    cars.sort_by(|a, b| by_price_desc(a, b, currency));
                }
            }
        }
        cars
    }
}

impl FromStr for SortOption {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SortOption::all()
            .into_iter()
            .find(|option| option.as_str() == wanted)
            .ok_or_else(|| PipelineError::UnsupportedSort(s.to_string()))
    }
}

/// Newest first, undated last
fn by_release_date_desc(a: &Car, b: &Car) -> Ordering {
    match (a.release_date, b.release_date) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn by_price_desc(a: &Car, b: &Car, currency: &str) -> Ordering {
    b.price(currency).total_cmp(&a.price(currency))
}

/// Apply the sort named `option`; no option (or a blank one) is a no-op
pub fn sort(cars: Vec<Car>, option: Option<&str>) -> Result<Vec<Car>, PipelineError> {
    let option = match option.map(str::trim) {
        None | Some("") => return Ok(cars),
        Some(name) => name.parse::<SortOption>()?,
    };

    let total = cars.len();
    let sorted = option.apply(cars);
    debug!("Sort {} returned {} of {} cars", option.as_str(), sorted.len(), total);

    Ok(sorted)
}
