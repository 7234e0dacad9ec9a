//! Static product catalog.
//!
//! Twelve products, fixed at compile time. The catalog is read-only; the
//! only derived data is the category list and filtered views of the products.

use eshop_pro_core::{Price, Product, ProductId};

/// Category name that matches every product.
pub const ALL_CATEGORIES: &str = "All";

struct Entry {
    id: u32,
    name: &'static str,
    cents: i64,
    category: &'static str,
    image_url: &'static str,
    description: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: 1,
        name: "Mechanical Keyboard (Red Switches)",
        cents: 9999,
        category: "Peripherals",
        image_url: "https://m.media-amazon.com/images/I/710B-MnAc9L.jpg",
        description: "Clicky, tactile, and completely wireless for the ultimate desk setup. Great for gaming.",
    },
    Entry {
        id: 2,
        name: "4K OLED Display Monitor",
        cents: 34900,
        category: "Displays",
        image_url: "https://i.ytimg.com/vi/FqTGbb3k-wI/hq720.jpg",
        description: "Stunning clarity, vibrant colors, perfect for professional work and high-refresh-rate gaming.",
    },
    Entry {
        id: 3,
        name: "Noise-Cancelling Headphones Pro",
        cents: 19950,
        category: "Audio",
        image_url: "https://kreo-tech.com/cdn/shop/files/Artboard_1_9.png",
        description: "Immersive sound with total silence, powered by spatial audio technology. All-day comfort.",
    },
    Entry {
        id: 4,
        name: "Portable SSD 2TB, USB-C Gen 2",
        cents: 18900,
        category: "Storage",
        image_url: "https://m.media-amazon.com/images/I/71bBCTIvIIL._UF1000,1000_QL80_.jpg",
        description: "Blazing fast external storage for professionals on the go. Read speeds up to 1000MB/s.",
    },
    Entry {
        id: 5,
        name: "Ergonomic Desk Chair",
        cents: 49999,
        category: "Furniture",
        image_url: "https://images-cdn.ubuy.co.in/6453d48995032476b641c4d4-qulomvs-mesh-ergonomic-office-chair-with.jpg",
        description: "Ultimate comfort and lumbar support for long working hours. Fully adjustable.",
    },
    Entry {
        id: 6,
        name: "Premium Leather Phone Case (Black)",
        cents: 4500,
        category: "Accessories",
        image_url: "https://elefcases.com/cdn/shop/files/61EWirYW5XL._SL1500_0a103842-fee5-4731-8d2f-eb9d1b93805b.jpg",
        description: "Genuine leather, slim profile, and full protection for your device. Compatible with wireless charging.",
    },
    Entry {
        id: 7,
        name: "Titanium Smartwatch X Pro",
        cents: 29999,
        category: "Wearables",
        image_url: "https://m.media-amazon.com/images/I/51EqcQnv7BL._UF1000,1000_QL80_.jpg",
        description: "Health tracking, GPS, and a week-long battery life in a rugged titanium body.",
    },
    Entry {
        id: 8,
        name: "Gaming Mouse (Wireless, Lightweight)",
        cents: 7500,
        category: "Peripherals",
        image_url: "https://image.made-in-china.com/202f0j00kOdVmFCIpcqa/HP-Wireless-Mouse-Gaming-Mouse-Computer-Parts-Wholesale-Wireless-Mouse-PC-Mouse-USB-Mouse-Mouse.webp",
        description: "Ultra-lightweight design with adjustable DPI up to 26,000. Perfect for competitive gaming.",
    },
    Entry {
        id: 9,
        name: "100W GaN Fast Charger (4 Ports)",
        cents: 5900,
        category: "Accessories",
        image_url: "https://www.ugreenindia.com/cdn/shop/files/61ynAzFcI1L._SL1500.jpg",
        description: "Simultaneously charge your laptop, phone, and tablet at maximum speed using gallium nitride technology.",
    },
    Entry {
        id: 10,
        name: "Classic Chronograph Watch",
        cents: 14900,
        category: "Wearables",
        image_url: "https://m.media-amazon.com/images/S/aplus-media-library-service-media/27b635a4-112a-47a5-bb41-500ab1bc5fa9.__CR367,834,2667,1649_PT0_SX970_V1___.jpeg",
        description: "Timeless design with a stainless steel case and genuine leather strap. Water resistant to 50m.",
    },
    Entry {
        id: 11,
        name: "High-Fidelity Bluetooth Speaker",
        cents: 12900,
        category: "Audio",
        image_url: "https://rukminim2.flixcart.com/image/480/640/xif0q/speaker/mobile-tablet-speaker/s/j/d/apollo-one-20w-bluetooth-portable-speaker-with-wireless-karaoke-original-imah8kmemmtgegqh.jpeg",
        description: "Deep bass and clear highs from a compact, waterproof speaker. 24-hour playtime.",
    },
    Entry {
        id: 12,
        name: "Desktop Streaming Webcam 4K",
        cents: 11900,
        category: "Peripherals",
        image_url: "https://m.media-amazon.com/images/I/61dMu1TXR2L.jpg",
        description: "Professional 4K resolution with auto-focus and built-in privacy shutter for video calls and streaming.",
    },
];

/// Read-only product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    categories: Vec<String>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    /// The built-in twelve-product catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::from_products(
            ENTRIES
                .iter()
                .map(|entry| Product {
                    id: ProductId::new(entry.id),
                    name: entry.name.to_owned(),
                    price: Price::from_cents(entry.cents),
                    category: entry.category.to_owned(),
                    image_url: entry.image_url.to_owned(),
                    description: entry.description.to_owned(),
                })
                .collect(),
        )
    }

    /// A catalog over an arbitrary product list, kept in the given order.
    #[must_use]
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut categories = vec![ALL_CATEGORIES.to_owned()];
        for product in &products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }

        Self {
            products,
            categories,
        }
    }

    /// All products in catalog order.
    #[must_use]
    pub fn list_products(&self) -> &[Product] {
        &self.products
    }

    /// `"All"` followed by each distinct category in first-seen order.
    #[must_use]
    pub fn list_categories(&self) -> &[String] {
        &self.categories
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    /// Products in `category` (or any, for `"All"`) whose name or description
    /// contains `search` case-insensitively. A blank search matches all.
    #[must_use]
    pub fn filter(&self, category: &str, search: &str) -> Vec<&Product> {
        let needle = search.trim().to_lowercase();

        self.products
            .iter()
            .filter(|product| category == ALL_CATEGORIES || product.category == category)
            .filter(|product| needle.is_empty() || product.mentions(&needle))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<u32> {
        products.iter().map(|p| p.id.as_u32()).collect()
    }

    #[test]
    fn test_builtin_catalog_has_twelve_products_in_id_order() {
        let catalog = Catalog::new();
        let listed: Vec<u32> = catalog.list_products().iter().map(|p| p.id.as_u32()).collect();
        assert_eq!(listed, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn test_categories_start_with_all_in_first_seen_order() {
        let catalog = Catalog::new();
        assert_eq!(
            catalog.list_categories(),
            [
                "All",
                "Peripherals",
                "Displays",
                "Audio",
                "Storage",
                "Furniture",
                "Accessories",
                "Wearables",
            ]
        );
    }

    #[test]
    fn test_empty_catalog_still_lists_all() {
        let catalog = Catalog::from_products(Vec::new());
        assert_eq!(catalog.list_categories(), ["All"]);
        assert!(catalog.filter(ALL_CATEGORIES, "").is_empty());
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = Catalog::new();
        assert_eq!(ids(&catalog.filter("Peripherals", "")), vec![1, 8, 12]);
        assert!(catalog.filter("Groceries", "").is_empty());
        assert_eq!(catalog.filter(ALL_CATEGORIES, "   ").len(), 12);
    }

    #[test]
    fn test_filter_by_search_is_case_insensitive_over_name_and_description() {
        let catalog = Catalog::new();
        assert_eq!(ids(&catalog.filter(ALL_CATEGORIES, "  WIRELESS ")), vec![1, 6, 8]);
        assert_eq!(ids(&catalog.filter("Peripherals", "gaming")), vec![1, 8]);
    }

    #[test]
    fn test_get() {
        let catalog = Catalog::new();
        assert_eq!(catalog.get(ProductId::new(3)).map(|p| p.price), Some(Price::from_cents(19950)));
        assert!(catalog.get(ProductId::new(13)).is_none());
    }
}
