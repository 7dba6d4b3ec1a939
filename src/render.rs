// 🖨️ Renderer
// Record set → text. Unknown formats fall back to one plain line per record.

use tracing::error;

use crate::model::{Car, EUR, GBP, JPY, USD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Xml,
    Plain,
}

impl OutputFormat {
    /// Never fails: anything unrecognised is `Plain`
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "table" => OutputFormat::Table,
            "json" => OutputFormat::Json,
            "xml" => OutputFormat::Xml,
            _ => OutputFormat::Plain,
        }
    }

    pub fn render(&self, cars: &[Car]) -> String {
        match self {
            OutputFormat::Table => render_table(cars),
            OutputFormat::Json => render_json(cars),
            OutputFormat::Xml => render_xml(cars),
            OutputFormat::Plain => render_plain(cars),
        }
    }
}

/// Render `cars` in the format named `format`
pub fn render(cars: &[Car], format: &str) -> String {
    OutputFormat::from_name(format).render(cars)
}

// ============================================================================
// TABLE
// ============================================================================

/// (header, width) per column
const COLUMNS: [(&str, usize); 8] = [
    ("Brand", 15),
    ("Type", 10),
    ("Model", 15),
    ("Release Date", 12),
    ("Price (JPY)", 12),
    ("Price (EUR)", 12),
    ("Price (GBP)", 12),
    ("Price (USD)", 12),
];

const PRICE_COLUMNS: [&str; 4] = [JPY, EUR, GBP, USD];

fn border() -> String {
    let mut line = String::from("+");
    for (_, width) in COLUMNS {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

/// Cells are padded to the column width, never truncated
fn table_row(cells: &[String]) -> String {
    let mut line = String::from("|");
    for (cell, (_, width)) in cells.iter().zip(COLUMNS) {
        line.push_str(&format!(" {:<width$} |", cell, width = width));
    }
    line.push('\n');
    line
}

pub fn render_table(cars: &[Car]) -> String {
    let border = border();
    let header: Vec<String> = COLUMNS.iter().map(|(name, _)| name.to_string()).collect();

    let mut out = String::new();
    out.push_str(&border);
    out.push_str(&table_row(&header));
    out.push_str(&border);

    for car in cars {
        let mut cells = vec![
            car.brand.clone(),
            car.car_type.clone(),
            car.model.clone(),
            car.release_date_label(),
        ];
        cells.extend(PRICE_COLUMNS.iter().map(|currency| format!("{:?}", car.price(currency))));
        out.push_str(&table_row(&cells));
    }

    out.push_str(&border);
    out
}

// ============================================================================
// JSON
// ============================================================================

pub fn render_json(cars: &[Car]) -> String {
    match serde_json::to_string_pretty(cars) {
        Ok(json) => json + "\n",
        Err(e) => {
            // Only reachable with a broken Serialize impl
            error!("Failed to serialize cars as JSON: {}", e);
            "[]\n".to_string()
        }
    }
}

// ============================================================================
// XML
// ============================================================================

pub fn render_xml(cars: &[Car]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

    if cars.is_empty() {
        out.push_str("<cars/>\n");
        return out;
    }

    out.push_str("<cars>\n");
    for car in cars {
        out.push_str("  <car>\n");
        out.push_str(&format!("    <brand>{}</brand>\n", escape_xml(&car.brand)));
        out.push_str(&format!("    <type>{}</type>\n", escape_xml(&car.car_type)));
        out.push_str(&format!("    <model>{}</model>\n", escape_xml(&car.model)));

        match car.release_date {
            Some(date) => out.push_str(&format!(
                "    <releaseDate>{}</releaseDate>\n",
                date.format("%Y-%m-%d")
            )),
            None => out.push_str("    <releaseDate/>\n"),
        }

        if car.prices.is_empty() {
            out.push_str("    <prices/>\n");
        } else {
            out.push_str("    <prices>\n");
            for (currency, amount) in &car.prices {
                out.push_str(&format!(
                    "      <price currency=\"{}\">{:?}</price>\n",
                    escape_xml(currency),
                    amount
                ));
            }
            out.push_str("    </prices>\n");
        }

        out.push_str("  </car>\n");
    }
    out.push_str("</cars>\n");
    out
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// PLAIN
// ============================================================================

pub fn render_plain(cars: &[Car]) -> String {
    cars.iter().map(|car| format!("{}\n", car)).collect()
}
