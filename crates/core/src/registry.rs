use serde::{Deserialize, Serialize};

/// Labels accepted out of the box. The set is replaceable at startup via the
/// bot configuration file; it never changes while the process runs.
pub const DEFAULT_PAYMENT_METHODS: &[&str] =
    &["Efectivo", "TD ICBC", "TC BBVA", "TC ICBC", "AMEX", "TBN"];

/// The fixed, ordered set of accepted payment-method labels.
///
/// Membership is an exact, case-sensitive string match. The original order is
/// preserved so help and error text can enumerate the labels as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodRegistry {
    labels: Vec<String>,
}

impl PaymentMethodRegistry {
    pub fn new(labels: Vec<String>) -> Self {
        PaymentMethodRegistry { labels }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Comma-separated listing for user-facing help and error messages.
    pub fn listing(&self) -> String {
        self.labels.join(", ")
    }
}

impl Default for PaymentMethodRegistry {
    fn default() -> Self {
        PaymentMethodRegistry::new(
            DEFAULT_PAYMENT_METHODS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_matches_deployment() {
        let registry = PaymentMethodRegistry::default();
        assert_eq!(registry.labels().len(), 6);
        assert!(registry.contains("Efectivo"));
        assert!(registry.contains("TC BBVA"));
    }

    #[test]
    fn membership_is_case_sensitive_and_exact() {
        let registry = PaymentMethodRegistry::default();
        assert!(!registry.contains("efectivo"));
        assert!(!registry.contains("EFECTIVO"));
        assert!(!registry.contains("Efectivo "));
        assert!(!registry.contains("Tarjeta Inexistente"));
    }

    #[test]
    fn listing_preserves_configured_order() {
        let registry =
            PaymentMethodRegistry::new(vec!["B".to_string(), "A".to_string(), "C".to_string()]);
        assert_eq!(registry.listing(), "B, A, C");
    }
}
