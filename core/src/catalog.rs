//! Static catalog and dimension sets.
//!
//! Everything here is read-only and fixed for the life of the process.
//! Ordering matters: the generator enumerates in declaration order, and
//! categorical rollups report groups in that same encounter order.

use crate::types::Daypart;

/// Brand → ordered SKU list.
pub const BRANDS: &[(&str, &[&str])] = &[
    (
        "Aashirvaad",
        &[
            "Select Atta",
            "Multigrain Atta",
            "Iodized Salt",
            "Turmeric Powder",
            "Organic Tur Dal",
            "Gulab Jamun Mix",
        ],
    ),
    (
        "Sunfeast",
        &[
            "Dark Fantasy Choco Fills",
            "Mom's Magic Cashew",
            "Farmlite Oats & Almonds",
            "Bounce Cream Biscuit",
            "Marie Light",
        ],
    ),
    (
        "YiPPee!",
        &["Magic Masala Noodles", "Power Up Atta Noodles", "Creamy Pasta"],
    ),
    (
        "Bingo!",
        &["Mad Angles", "Tedhe Medhe", "Original Style Potato Chips"],
    ),
    (
        "B Natural",
        &["Mixed Fruit Juice", "Guava Juice", "Tender Coconut Water"],
    ),
    (
        "ITC Master Chef",
        &["Classic Aloo Tikki", "Chilli Garlic Potato Shots", "Chicken Nuggets"],
    ),
];

pub const PLATFORMS: &[&str] = &["Blinkit", "Zepto", "Swiggy Instamart", "Flipkart", "Amazon"];

pub const CITIES: &[&str] = &["Mumbai", "Delhi", "Bangalore", "Hyderabad", "Kolkata"];

pub const DAYPARTS: &[Daypart] = &Daypart::ALL;

/// Brand → (competitor, competitor's head-to-head SKU).
const COMPETITORS: &[(&str, &str, &str)] = &[
    ("Sunfeast",        "Britannia", "Bourbon"),
    ("Bingo!",          "Lay's",     "Classic Salted"),
    ("YiPPee!",         "Maggi",     "2-Minute Noodles"),
    ("Aashirvaad",      "Pillsbury", "Chakki Fresh Atta"),
    ("B Natural",       "Tropicana", "100% Mixed Fruit Juice"),
    ("ITC Master Chef", "McCain",    "Smiles"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Competitor {
    pub name: &'static str,
    pub sku: &'static str,
}

/// Static access to the catalog.
pub struct Catalog;

impl Catalog {
    pub fn brands() -> impl Iterator<Item = &'static str> {
        BRANDS.iter().map(|(brand, _)| *brand)
    }

    pub fn skus_for(brand: &str) -> &'static [&'static str] {
        BRANDS
            .iter()
            .find(|(b, _)| *b == brand)
            .map(|(_, skus)| *skus)
            .unwrap_or(&[])
    }

    /// Every (brand, sku) pair in catalog order.
    pub fn brand_skus() -> impl Iterator<Item = (&'static str, &'static str)> {
        BRANDS
            .iter()
            .flat_map(|(brand, skus)| skus.iter().map(move |sku| (*brand, *sku)))
    }

    pub fn sku_count() -> usize {
        BRANDS.iter().map(|(_, skus)| skus.len()).sum()
    }

    pub fn brand_of(sku: &str) -> Option<&'static str> {
        Self::brand_skus().find(|(_, s)| *s == sku).map(|(b, _)| b)
    }

    /// Rows one date contributes to a fact table.
    pub fn rows_per_day() -> usize {
        Self::sku_count() * PLATFORMS.len() * CITIES.len() * DAYPARTS.len()
    }

    pub fn competitor_for(brand: &str) -> Competitor {
        COMPETITORS
            .iter()
            .find(|(b, _, _)| *b == brand)
            .map(|(_, name, sku)| Competitor { name, sku })
            .unwrap_or(Competitor {
                name: "Competitor",
                sku: "Generic SKU",
            })
    }
}
