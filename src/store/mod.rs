//! JSON-file backed storage.
//!
//! Each entity type lives in one array file under the data directory
//! (`products.json`, `categories.json`, `orders.json`, `users.json`). Files are
//! loaded once at startup and rewritten in full after every mutation.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

use crate::models::{Category, Order, Product, User};

mod collection;
mod seed;
mod stock;

pub use collection::{Collection, GuardedUpdate, Record};
pub use stock::{OutOfStockItem, Reconciliation, StockMode, StockRequest, StockShortfall};

pub const PRODUCTS_FILE: &str = "products.json";
pub const CATEGORIES_FILE: &str = "categories.json";
pub const ORDERS_FILE: &str = "orders.json";
pub const USERS_FILE: &str = "users.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize records: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for Order {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Record for User {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct Store {
    pub products: Collection<Product>,
    pub categories: Collection<Category>,
    pub orders: Collection<Order>,
    pub users: Collection<User>,
    stock_mode: StockMode,
    data_dir: PathBuf,
}

impl Store {
    /// Loads every collection from `data_dir`, seeding the default catalogue
    /// when the product or category file is missing.
    pub async fn open(data_dir: impl AsRef<Path>, stock_mode: StockMode) -> Result<Self, StoreError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)
            .await
            .map_err(|source| StoreError::Io {
                path: data_dir.clone(),
                source,
            })?;
        tracing::info!(data_dir = %data_dir.display(), ?stock_mode, "opening store");

        let products_path = data_dir.join(PRODUCTS_FILE);
        let categories_path = data_dir.join(CATEGORIES_FILE);

        let (categories, seed_categories) = match Collection::read_file(&categories_path).await? {
            Some(records) => (records, false),
            None => (seed::default_categories(), true),
        };
        let (products, seed_products) = match Collection::read_file(&products_path).await? {
            Some(records) => (records, false),
            None => (seed::default_products(), true),
        };
        let orders = Collection::read_file(&data_dir.join(ORDERS_FILE))
            .await?
            .unwrap_or_default();
        let users = Collection::read_file(&data_dir.join(USERS_FILE))
            .await?
            .unwrap_or_default();

        let store = Self {
            products: Collection::new("products", products_path, products),
            categories: Collection::new("categories", categories_path, categories),
            orders: Collection::new("orders", data_dir.join(ORDERS_FILE), orders),
            users: Collection::new("users", data_dir.join(USERS_FILE), users),
            stock_mode,
            data_dir,
        };

        if seed_categories {
            let records = store.categories.read_guard().await;
            store.categories.flush(&records).await?;
            tracing::info!(count = records.len(), "seeded default categories");
        }
        if seed_products {
            let records = store.products.read_guard().await;
            store.products.flush(&records).await?;
            tracing::info!(count = records.len(), "seeded default products");
        }

        tracing::info!(
            products = store.products.len().await,
            categories = store.categories.len().await,
            orders = store.orders.len().await,
            users = store.users.len().await,
            "store loaded"
        );
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn stock_mode(&self) -> StockMode {
        self.stock_mode
    }

    /// Re-reads `products.json` to pick up edits made outside the process.
    /// A missing file leaves the cached products as they are.
    pub async fn reload_products(&self) -> Result<usize, StoreError> {
        match Collection::<Product>::read_file(self.products.path()).await? {
            Some(records) => {
                let count = records.len();
                self.products.replace_all(records).await;
                tracing::info!(count, "reloaded products from disk");
                Ok(count)
            }
            None => {
                tracing::warn!(path = %self.products.path().display(), "products file missing, reload skipped");
                Ok(self.products.len().await)
            }
        }
    }

    pub async fn product_by_slug(&self, slug: &str) -> Option<Product> {
        self.products.find(|p| p.slug == slug).await
    }

    pub async fn best_sellers(&self) -> Vec<Product> {
        self.products.filter(|p| p.is_best_seller == 1).await
    }

    pub async fn new_arrivals(&self) -> Vec<Product> {
        self.products.filter(|p| p.is_new_arrival == 1).await
    }

    /// Products in `category`. `all`, `best-sellers` and `new-arrivals` act as
    /// pseudo-categories.
    pub async fn products_by_category(&self, category: &str) -> Vec<Product> {
        match category {
            "all" => self.products.all().await,
            "best-sellers" => self.best_sellers().await,
            "new-arrivals" => self.new_arrivals().await,
            other => self.products.filter(|p| p.category == other).await,
        }
    }

    pub async fn category_by_slug(&self, slug: &str) -> Option<Category> {
        self.categories.find(|c| c.slug == slug).await
    }

    pub async fn order_by_gateway_id(&self, gateway_order_id: &str) -> Option<Order> {
        self.orders
            .find(|o| o.gateway_order_id.as_deref() == Some(gateway_order_id))
            .await
    }

    pub async fn user_by_contact(&self, email: Option<&str>, phone: Option<&str>) -> Option<User> {
        self.users.find(|u| u.matches_contact(email, phone)).await
    }
}
