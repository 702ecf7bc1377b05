use uuid::Uuid;

use crate::{
    dto::products::{ProductList, ProductPayload, ReloadSummary, StockUpdateRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Product,
    response::{ApiResponse, Meta},
    slug::slugify,
    state::AppState,
    store::GuardedUpdate,
};

fn listing(message: &str, items: Vec<Product>) -> ApiResponse<ProductList> {
    let total = items.len();
    ApiResponse::listing(message, ProductList { items }, total)
}

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    Ok(listing("Products", state.store.products.all().await))
}

pub async fn best_sellers(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    Ok(listing("Best sellers", state.store.best_sellers().await))
}

pub async fn new_arrivals(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    Ok(listing("New arrivals", state.store.new_arrivals().await))
}

pub async fn products_by_category(
    state: &AppState,
    category: &str,
) -> AppResult<ApiResponse<ProductList>> {
    Ok(listing(
        "Products",
        state.store.products_by_category(category).await,
    ))
}

pub async fn get_product_by_slug(state: &AppState, slug: &str) -> AppResult<ApiResponse<Product>> {
    let product = state
        .store
        .product_by_slug(slug)
        .await
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn get_product(state: &AppState, id: &str) -> AppResult<ApiResponse<Product>> {
    let product = state
        .store
        .products
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: ProductPayload,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let price = payload.validate()?;

    let name = payload.name.trim().to_string();
    let product = Product {
        id: Uuid::new_v4().to_string(),
        slug: slugify(&name),
        name,
        description: Some(payload.description.trim().to_string()),
        price,
        category: payload.category.trim().to_string(),
        images: payload.images,
        stock: payload.stock.unwrap_or(0),
        is_best_seller: payload.is_best_seller.unwrap_or(0),
        is_new_arrival: payload.is_new_arrival.unwrap_or(0),
        material: payload.material.filter(|m| !m.trim().is_empty()),
    };

    let slug = product.slug.clone();
    let product = state
        .store
        .products
        .insert_unless(product, |p| p.slug == slug)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("A product with slug {slug} already exists")))?;

    tracing::info!(product_id = %product.id, slug = %product.slug, "product created");
    Ok(ApiResponse::success("Product created", product, Some(Meta::empty())))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: ProductPayload,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let price = payload.validate()?;

    let name = payload.name.trim().to_string();
    let slug = slugify(&name);
    let taken = slug.clone();

    let outcome = state
        .store
        .products
        .update_unless(id, |other| other.slug == taken, |p| {
            p.name = name;
            p.slug = slug;
            p.description = Some(payload.description.trim().to_string());
            p.price = price;
            p.category = payload.category.trim().to_string();
            p.images = payload.images;
            if let Some(stock) = payload.stock {
                p.stock = stock;
            }
            if let Some(flag) = payload.is_best_seller {
                p.is_best_seller = flag;
            }
            if let Some(flag) = payload.is_new_arrival {
                p.is_new_arrival = flag;
            }
            if let Some(material) = payload.material {
                p.material = Some(material).filter(|m| !m.trim().is_empty());
            }
        })
        .await?;
    let product = match outcome {
        GuardedUpdate::Applied(product) => product,
        GuardedUpdate::Missing => return Err(AppError::NotFound("Product not found".into())),
        GuardedUpdate::Conflict => {
            return Err(AppError::Conflict(format!(
                "A product with slug {taken} already exists"
            )));
        }
    };

    tracing::info!(product_id = %product.id, "product updated");
    Ok(ApiResponse::success("Product updated", product, Some(Meta::empty())))
}

pub async fn set_stock(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: StockUpdateRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    if payload.stock < 0 {
        return Err(AppError::BadRequest("Stock cannot be negative".into()));
    }

    let (product, previous) = state
        .store
        .products
        .update(id, |p| std::mem::replace(&mut p.stock, payload.stock))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    tracing::info!(product_id = %product.id, previous, stock = product.stock, "stock set");
    Ok(ApiResponse::success("Stock updated", product, Some(Meta::empty())))
}

/// Deletes the product, then its uploaded images on a best-effort basis.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let product = state
        .store
        .products
        .remove(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    state
        .assets
        .delete_best_effort(product.images.iter().map(String::as_str))
        .await;

    tracing::info!(product_id = %product.id, "product deleted");
    Ok(ApiResponse::success("Product deleted", product, Some(Meta::empty())))
}

pub async fn reload_products(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ReloadSummary>> {
    ensure_admin(user)?;
    let products = state.store.reload_products().await?;
    Ok(ApiResponse::success(
        "Products reloaded",
        ReloadSummary { products },
        Some(Meta::empty()),
    ))
}
