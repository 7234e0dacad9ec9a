//! Catalog product type.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId};

/// A product offered in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub category: String,
    pub image_url: String,
    pub description: String,
}

impl Product {
    /// Whether the lower-cased name or description contains `needle`.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn speaker() -> Product {
        Product {
            id: ProductId::new(11),
            name: "High-Fidelity Bluetooth Speaker".to_owned(),
            price: Price::from_cents(12900),
            category: "Audio".to_owned(),
            image_url: "https://example.com/speaker.jpg".to_owned(),
            description: "Deep bass and clear highs.".to_owned(),
        }
    }

    #[test]
    fn test_mentions_name_and_description() {
        let product = speaker();
        assert!(product.mentions("bluetooth"));
        assert!(product.mentions("bass"));
        assert!(!product.mentions("keyboard"));
    }
}
