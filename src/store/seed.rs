use std::str::FromStr;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Category, Product};

const GENERATED: &str = "/attached_assets/generated_images";

pub(super) fn default_categories() -> Vec<Category> {
    [
        ("Rings", "rings", "Symbols of eternal love and commitment"),
        ("Earrings", "earrings", "Elegant accents for every occasion"),
        ("Necklaces", "necklaces", "Statement pieces that capture attention"),
        ("Bracelets", "bracelets", "Delicate adornments for your wrist"),
    ]
    .into_iter()
    .map(|(name, slug, description)| Category {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        slug: slug.to_string(),
        description: Some(description.to_string()),
        image: None,
    })
    .collect()
}

struct SeedProduct {
    name: &'static str,
    slug: &'static str,
    description: &'static str,
    price: &'static str,
    category: &'static str,
    image: &'static str,
    stock: i64,
    best_seller: bool,
    material: &'static str,
}

const PRODUCTS: [SeedProduct; 8] = [
    SeedProduct {
        name: "Pearl Stud Earrings",
        slug: "pearl-stud-earrings",
        description: "Timeless elegance with lustrous pearls set in 14k gold. These classic studs are perfect for any occasion.",
        price: "125.00",
        category: "earrings",
        image: "Gold_pearl_stud_earrings_b1fe2830.png",
        stock: 15,
        best_seller: true,
        material: "14k Gold, Freshwater Pearls",
    },
    SeedProduct {
        name: "Wave Bangle",
        slug: "wave-bangle",
        description: "Flowing curves capture the essence of water in motion. Handcrafted in 18k gold.",
        price: "285.00",
        category: "bracelets",
        image: "Gold_wave_bangle_bracelet_8bbe3a36.png",
        stock: 8,
        best_seller: true,
        material: "18k Gold",
    },
    SeedProduct {
        name: "Collar Necklace",
        slug: "collar-necklace",
        description: "A sophisticated statement piece that frames your neckline beautifully. Modern luxury at its finest.",
        price: "465.00",
        category: "necklaces",
        image: "Gold_collar_necklace_ecf1d78f.png",
        stock: 5,
        best_seller: true,
        material: "18k Gold",
    },
    SeedProduct {
        name: "Golden Loop Earrings",
        slug: "golden-loop-earrings",
        description: "Classic hoop earrings with a contemporary twist. Lightweight and comfortable for all-day wear.",
        price: "145.00",
        category: "earrings",
        image: "Gold_loop_hoop_earrings_c6e47118.png",
        stock: 20,
        best_seller: true,
        material: "14k Gold",
    },
    SeedProduct {
        name: "Diamond Solitaire Ring",
        slug: "diamond-solitaire-ring",
        description: "A brilliant cut diamond set in platinum. The ultimate symbol of eternal love.",
        price: "1850.00",
        category: "rings",
        image: "Diamond_solitaire_ring_54bd7102.png",
        stock: 3,
        best_seller: false,
        material: "Platinum, 1ct Diamond",
    },
    SeedProduct {
        name: "Chain Link Bracelet",
        slug: "chain-link-bracelet",
        description: "Delicate chain links create a refined look. Perfect for layering or wearing alone.",
        price: "195.00",
        category: "bracelets",
        image: "Gold_chain_link_bracelet_6e8dde3d.png",
        stock: 12,
        best_seller: false,
        material: "14k Gold",
    },
    SeedProduct {
        name: "Textured Band Ring",
        slug: "textured-band-ring",
        description: "Handcrafted texture adds depth and character to this versatile band.",
        price: "320.00",
        category: "rings",
        image: "Textured_gold_band_ring_556baf4d.png",
        stock: 10,
        best_seller: false,
        material: "18k Gold",
    },
    SeedProduct {
        name: "Gemstone Pendant Necklace",
        slug: "gemstone-pendant-necklace",
        description: "A vibrant gemstone suspended on a delicate gold chain. Effortlessly elegant.",
        price: "385.00",
        category: "necklaces",
        image: "Gold_gemstone_pendant_necklace_dab0c139.png",
        stock: 7,
        best_seller: false,
        material: "14k Gold, Natural Gemstone",
    },
];

// Seeded best sellers are never new arrivals and vice versa.
pub(super) fn default_products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(|seed| Product {
            id: Uuid::new_v4().to_string(),
            name: seed.name.to_string(),
            slug: seed.slug.to_string(),
            description: Some(seed.description.to_string()),
            price: Decimal::from_str(seed.price).unwrap_or_default(),
            category: seed.category.to_string(),
            images: vec![format!("{GENERATED}/{}", seed.image)],
            stock: seed.stock,
            is_best_seller: u8::from(seed.best_seller),
            is_new_arrival: u8::from(!seed.best_seller),
            material: Some(seed.material.to_string()),
        })
        .collect()
}
