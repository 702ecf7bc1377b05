use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Store, StoreError};
use crate::models::Product;

/// How reconciliation guards against concurrent orders for the same product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockMode {
    /// Validation and decrement share one exclusive section on the product
    /// collection. Concurrent orders are serialised and cannot oversell.
    #[default]
    Locked,
    /// Validation runs on a shared snapshot and the decrement happens after a
    /// scheduling point without re-checking. Concurrent orders can both pass
    /// validation against the same stock and drive it negative.
    Unlocked,
}

impl StockMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockMode::Locked => "locked",
            StockMode::Unlocked => "unlocked",
        }
    }
}

impl FromStr for StockMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" => Ok(StockMode::Locked),
            "unlocked" => Ok(StockMode::Unlocked),
            other => Err(anyhow::anyhow!(
                "invalid STOCK_MODE {other:?}, expected \"locked\" or \"unlocked\""
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockRequest {
    pub product_id: String,
    pub quantity: i64,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OutOfStockItem {
    pub product_id: String,
    pub name: String,
    pub requested_quantity: i64,
    pub available_stock: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockShortfall {
    pub message: String,
    pub out_of_stock_items: Vec<OutOfStockItem>,
}

#[derive(Debug, Clone)]
pub enum Reconciliation {
    /// Every line fit and the stock has been decremented.
    Reserved,
    /// At least one line failed; no stock was touched.
    Rejected(StockShortfall),
}

struct Demand<'a> {
    product_id: &'a str,
    name: Option<&'a str>,
    quantity: i64,
}

/// Folds repeated lines for one product into a single demand so that two
/// lines of 2 against a stock of 3 are rejected. Non-positive quantities ask
/// for nothing and are dropped. Combined demand saturates at `i64::MAX`,
/// which no stock level can satisfy.
fn aggregate(items: &[StockRequest]) -> Vec<Demand<'_>> {
    let mut demand: Vec<Demand<'_>> = Vec::with_capacity(items.len());
    for item in items.iter().filter(|i| i.quantity > 0) {
        match demand.iter_mut().find(|d| d.product_id == item.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
            None => demand.push(Demand {
                product_id: &item.product_id,
                name: item.name.as_deref(),
                quantity: item.quantity,
            }),
        }
    }
    demand
}

/// First pass: collect every failing line.
fn check(products: &[Product], demand: &[Demand<'_>]) -> Option<StockShortfall> {
    let mut errors = Vec::new();
    let mut out_of_stock_items = Vec::new();

    for line in demand {
        match products.iter().find(|p| p.id == line.product_id) {
            None => {
                let label = line.name.unwrap_or(line.product_id);
                errors.push(format!("Product not found: {label}"));
                out_of_stock_items.push(OutOfStockItem {
                    product_id: line.product_id.to_string(),
                    name: label.to_string(),
                    requested_quantity: line.quantity,
                    available_stock: 0,
                });
            }
            Some(product) if product.stock < line.quantity => {
                errors.push(format!(
                    "Insufficient stock for {}. Requested: {}, Available: {}",
                    product.name, line.quantity, product.stock
                ));
                out_of_stock_items.push(OutOfStockItem {
                    product_id: line.product_id.to_string(),
                    name: line.name.unwrap_or(&product.name).to_string(),
                    requested_quantity: line.quantity,
                    available_stock: product.stock,
                });
            }
            Some(_) => {}
        }
    }

    if errors.is_empty() {
        None
    } else {
        Some(StockShortfall {
            message: errors.join("; "),
            out_of_stock_items,
        })
    }
}

/// Second pass: decrement every line.
fn apply(products: &mut [Product], demand: &[Demand<'_>]) {
    for line in demand {
        let Some(product) = products.iter_mut().find(|p| p.id == line.product_id) else {
            continue;
        };
        let before = product.stock;
        product.stock = product.stock.saturating_sub(line.quantity);
        tracing::info!(
            product_id = %product.id,
            product = %product.name,
            before,
            after = product.stock,
            quantity = line.quantity,
            "stock reduced"
        );
        if product.stock < 0 {
            tracing::warn!(product_id = %product.id, stock = product.stock, "product oversold");
        }
    }
}

impl Store {
    /// Validates every line against current stock and, only if all of them
    /// fit, decrements each product and writes `products.json` once.
    pub async fn reconcile_stock(&self, items: &[StockRequest]) -> Result<Reconciliation, StoreError> {
        let demand = aggregate(items);

        match self.stock_mode() {
            StockMode::Locked => {
                let mut products = self.products.write_guard().await;
                if let Some(shortfall) = check(&products, &demand) {
                    return Ok(Reconciliation::Rejected(shortfall));
                }
                apply(&mut products, &demand);
                self.products.flush(&products).await?;
            }
            StockMode::Unlocked => {
                let shortfall = {
                    let products = self.products.read_guard().await;
                    check(&products, &demand)
                };
                if let Some(shortfall) = shortfall {
                    return Ok(Reconciliation::Rejected(shortfall));
                }
                tokio::task::yield_now().await;
                let mut products = self.products.write_guard().await;
                apply(&mut products, &demand);
                self.products.flush(&products).await?;
            }
        }

        Ok(Reconciliation::Reserved)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::store::Collection;

    fn product(id: &str, stock: i64) -> Product {
        Product {
            id: id.into(),
            name: format!("Product {id}"),
            slug: id.into(),
            description: None,
            price: Decimal::new(10000, 2),
            category: "rings".into(),
            images: Vec::new(),
            stock,
            is_best_seller: 0,
            is_new_arrival: 0,
            material: None,
        }
    }

    fn line(id: &str, quantity: i64) -> StockRequest {
        StockRequest {
            product_id: id.into(),
            quantity,
            name: None,
        }
    }

    async fn store_with(dir: &std::path::Path, mode: StockMode, products: Vec<Product>) -> Store {
        std::fs::write(
            dir.join(crate::store::PRODUCTS_FILE),
            serde_json::to_vec(&products).expect("json"),
        )
        .expect("write products");
        std::fs::write(dir.join(crate::store::CATEGORIES_FILE), b"[]").expect("write categories");
        Store::open(dir, mode).await.expect("open store")
    }

    async fn stock_of(store: &Store, id: &str) -> i64 {
        store.products.get(id).await.expect("product").stock
    }

    #[tokio::test]
    async fn exact_stock_is_reserved_then_next_order_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(dir.path(), StockMode::Locked, vec![product("p", 3)]).await;

        let first = store.reconcile_stock(&[line("p", 3)]).await.expect("reconcile");
        assert!(matches!(first, Reconciliation::Reserved));
        assert_eq!(stock_of(&store, "p").await, 0);

        let second = store.reconcile_stock(&[line("p", 1)]).await.expect("reconcile");
        let Reconciliation::Rejected(shortfall) = second else {
            panic!("expected rejection");
        };
        assert_eq!(
            shortfall.out_of_stock_items,
            vec![OutOfStockItem {
                product_id: "p".into(),
                name: "Product p".into(),
                requested_quantity: 1,
                available_stock: 0,
            }]
        );
        assert_eq!(stock_of(&store, "p").await, 0);
    }

    #[tokio::test]
    async fn one_bad_line_leaves_every_product_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(
            dir.path(),
            StockMode::Locked,
            vec![product("a", 2), product("b", 5)],
        )
        .await;

        let outcome = store
            .reconcile_stock(&[line("a", 3), line("b", 1)])
            .await
            .expect("reconcile");
        assert!(matches!(outcome, Reconciliation::Rejected(_)));
        assert_eq!(stock_of(&store, "a").await, 2);
        assert_eq!(stock_of(&store, "b").await, 5);

        let on_disk = Collection::<Product>::read_file(&dir.path().join(crate::store::PRODUCTS_FILE))
            .await
            .expect("read")
            .expect("exists");
        assert!(on_disk.iter().any(|p| p.id == "b" && p.stock == 5));
    }

    #[tokio::test]
    async fn every_failure_is_reported_at_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(
            dir.path(),
            StockMode::Locked,
            vec![product("a", 1), product("b", 0)],
        )
        .await;

        let outcome = store
            .reconcile_stock(&[
                line("a", 2),
                line("b", 1),
                StockRequest {
                    product_id: "ghost".into(),
                    quantity: 1,
                    name: Some("Ghost Ring".into()),
                },
            ])
            .await
            .expect("reconcile");
        let Reconciliation::Rejected(shortfall) = outcome else {
            panic!("expected rejection");
        };
        let ids: Vec<_> = shortfall
            .out_of_stock_items
            .iter()
            .map(|i| i.product_id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b", "ghost"]);
        assert_eq!(shortfall.message.split("; ").count(), 3);
        assert!(shortfall.message.contains("Product not found: Ghost Ring"));
    }

    #[tokio::test]
    async fn repeated_lines_are_checked_against_combined_demand() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(dir.path(), StockMode::Locked, vec![product("a", 3)]).await;

        let outcome = store
            .reconcile_stock(&[line("a", 2), line("a", 2)])
            .await
            .expect("reconcile");
        let Reconciliation::Rejected(shortfall) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(shortfall.out_of_stock_items[0].requested_quantity, 4);
        assert_eq!(stock_of(&store, "a").await, 3);
    }

    #[tokio::test]
    async fn combined_demand_past_i64_max_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(dir.path(), StockMode::Locked, vec![product("a", 3)]).await;

        let outcome = store
            .reconcile_stock(&[line("a", i64::MAX), line("a", 2)])
            .await
            .expect("reconcile");
        let Reconciliation::Rejected(shortfall) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(shortfall.out_of_stock_items[0].requested_quantity, i64::MAX);
        assert_eq!(stock_of(&store, "a").await, 3);
    }

    #[tokio::test]
    async fn stock_is_conserved_over_a_sequence_of_orders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(
            dir.path(),
            StockMode::Locked,
            vec![product("a", 5), product("b", 4)],
        )
        .await;

        let orders = [
            vec![line("a", 2), line("b", 1)],
            vec![line("a", 4)],
            vec![line("b", 3)],
            vec![line("a", 3), line("b", 1)],
            vec![line("a", 1)],
        ];
        let mut reserved = 0;
        for order in &orders {
            if let Reconciliation::Reserved = store.reconcile_stock(order).await.expect("reconcile") {
                reserved += order.iter().map(|l| l.quantity).sum::<i64>();
            }
        }

        let remaining = stock_of(&store, "a").await + stock_of(&store, "b").await;
        assert_eq!(9 - remaining, reserved);
        assert!(remaining >= 0);
    }

    // Locked mode: two interleaved orders for the last three units, one wins.
    #[tokio::test]
    async fn locked_mode_serialises_concurrent_orders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(dir.path(), StockMode::Locked, vec![product("p", 3)]).await;

        let order = [line("p", 3)];
        let (a, b) = tokio::join!(store.reconcile_stock(&order), store.reconcile_stock(&order));
        let reserved = [a.expect("a"), b.expect("b")]
            .iter()
            .filter(|r| matches!(r, Reconciliation::Reserved))
            .count();
        assert_eq!(reserved, 1);
        assert_eq!(stock_of(&store, "p").await, 0);
    }

    // Unlocked mode reproduces the unguarded behaviour: both interleaved
    // orders validate against the same stock and the product is oversold.
    #[tokio::test]
    async fn unlocked_mode_oversells_when_orders_interleave() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(dir.path(), StockMode::Unlocked, vec![product("p", 3)]).await;

        let order = [line("p", 3)];
        let (a, b) = tokio::join!(store.reconcile_stock(&order), store.reconcile_stock(&order));
        assert!(matches!(a.expect("a"), Reconciliation::Reserved));
        assert!(matches!(b.expect("b"), Reconciliation::Reserved));
        assert_eq!(stock_of(&store, "p").await, -3);
    }

    #[tokio::test]
    async fn unlocked_mode_matches_locked_mode_when_sequential() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_with(dir.path(), StockMode::Unlocked, vec![product("p", 3)]).await;

        assert!(matches!(
            store.reconcile_stock(&[line("p", 3)]).await.expect("first"),
            Reconciliation::Reserved
        ));
        assert!(matches!(
            store.reconcile_stock(&[line("p", 1)]).await.expect("second"),
            Reconciliation::Rejected(_)
        ));
        assert_eq!(stock_of(&store, "p").await, 0);
    }

    #[test]
    fn stock_mode_parses_case_insensitively() {
        assert_eq!("LOCKED".parse::<StockMode>().unwrap(), StockMode::Locked);
        assert_eq!(" unlocked ".parse::<StockMode>().unwrap(), StockMode::Unlocked);
        assert!("optimistic".parse::<StockMode>().is_err());
    }
}
