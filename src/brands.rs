// 🏷️ Brand Resolver
// Fixed model name → brand name table. Unknown models are not an error.

/// Brand assigned when a model isn't in the table
pub const UNKNOWN_BRAND: &str = "Unknown";

/// (model, brand) pairs; matching is exact and case-sensitive
static MODEL_BRANDS: &[(&str, &str)] = &[
    ("RAV4", "Toyota"),
    ("Civic", "Honda"),
    ("F-150", "Ford"),
    ("Model X", "Tesla"),
    ("330i", "BMW"),
    ("Q5", "Audi"),
    ("Silverado", "Chevrolet"),
    ("C-Class", "Mercedes-Benz"),
    ("Rogue", "Nissan"),
    ("Elantra", "Hyundai"),
];

/// Resolve the brand for a model name
///
/// Example: "RAV4" → "Toyota", "rav4" → "Unknown"
pub fn resolve_brand(model: &str) -> &'static str {
    MODEL_BRANDS
        .iter()
        .find(|(known, _)| *known == model)
        .map(|(_, brand)| *brand)
        .unwrap_or(UNKNOWN_BRAND)
}

/// All models the resolver knows about
pub fn known_models() -> impl Iterator<Item = &'static str> {
    MODEL_BRANDS.iter().map(|(model, _)| *model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_known_models() {
        assert_eq!(resolve_brand("RAV4"), "Toyota");
        assert_eq!(resolve_brand("Civic"), "Honda");
        assert_eq!(resolve_brand("F-150"), "Ford");
        assert_eq!(resolve_brand("Model X"), "Tesla");
        assert_eq!(resolve_brand("330i"), "BMW");
        assert_eq!(resolve_brand("Q5"), "Audi");
        assert_eq!(resolve_brand("Silverado"), "Chevrolet");
        assert_eq!(resolve_brand("C-Class"), "Mercedes-Benz");
        assert_eq!(resolve_brand("Rogue"), "Nissan");
        assert_eq!(resolve_brand("Elantra"), "Hyundai");
    }

    #[test]
    fn test_unknown_model_falls_back() {
        assert_eq!(resolve_brand("Corolla"), UNKNOWN_BRAND);
        assert_eq!(resolve_brand(""), UNKNOWN_BRAND);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(resolve_brand("rav4"), UNKNOWN_BRAND);
        assert_eq!(resolve_brand("model x"), UNKNOWN_BRAND);
        assert_eq!(resolve_brand(" Civic"), UNKNOWN_BRAND);
    }

    #[test]
    fn test_known_models_count() {
        assert_eq!(known_models().count(), 10);
        assert!(known_models().all(|m| resolve_brand(m) != UNKNOWN_BRAND));
    }
}
