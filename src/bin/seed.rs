use std::env;

use jewelry_storefront_api::{
    models::UserRole,
    services::auth_service,
    store::{StockMode, Store},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    // Opening the store writes the default catalogue when it is missing.
    let store = Store::open(&data_dir, StockMode::default()).await?;

    let email = env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@example.com".to_string());
    let password = env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin123".to_string());
    let admin_id = ensure_admin(&store, &email, &password).await?;

    println!(
        "Seed completed. Products: {}, categories: {}, admin ID: {admin_id}",
        store.products.len().await,
        store.categories.len().await
    );
    Ok(())
}

/// Creates the admin account, or promotes an existing account with the same
/// email. An existing password is left untouched.
async fn ensure_admin(store: &Store, email: &str, password: &str) -> anyhow::Result<String> {
    if let Some(existing) = store.user_by_contact(Some(email), None).await {
        store
            .users
            .update(&existing.id, |user| user.role = UserRole::Admin)
            .await?;
        return Ok(existing.id);
    }

    let user = auth_service::new_user("Admin", Some(email.to_string()), None, password, UserRole::Admin)?;
    store.users.upsert(user.clone()).await?;
    Ok(user.id)
}
