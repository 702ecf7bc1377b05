use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CategoryPayload},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Category,
    response::{ApiResponse, Meta},
    slug::slugify,
    state::AppState,
    store::GuardedUpdate,
};

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items = state.store.categories.all().await;
    let total = items.len();
    Ok(ApiResponse::listing("Categories", CategoryList { items }, total))
}

pub async fn get_category_by_slug(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<Category>> {
    let category = state
        .store
        .category_by_slug(slug)
        .await
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn create_category(
    state: &AppState,
    user: &AuthUser,
    payload: CategoryPayload,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;

    let name = payload.name.trim().to_string();
    let category = Category {
        id: Uuid::new_v4().to_string(),
        slug: slugify(&name),
        name,
        description: blank_to_none(payload.description),
        image: blank_to_none(payload.image),
    };

    let slug = category.slug.clone();
    let category = state
        .store
        .categories
        .insert_unless(category, |c| c.slug == slug)
        .await?
        .ok_or_else(|| AppError::Conflict(format!("A category with slug {slug} already exists")))?;

    tracing::info!(category_id = %category.id, slug = %category.slug, "category created");
    Ok(ApiResponse::success("Category created", category, Some(Meta::empty())))
}

pub async fn update_category(
    state: &AppState,
    user: &AuthUser,
    id: &str,
    payload: CategoryPayload,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    payload.validate()?;

    let name = payload.name.trim().to_string();
    let slug = slugify(&name);
    let taken = slug.clone();

    let outcome = state
        .store
        .categories
        .update_unless(id, |other| other.slug == taken, |c| {
            c.name = name;
            c.slug = slug;
            c.description = blank_to_none(payload.description);
            c.image = blank_to_none(payload.image);
        })
        .await?;
    let category = match outcome {
        GuardedUpdate::Applied(category) => category,
        GuardedUpdate::Missing => return Err(AppError::NotFound("Category not found".into())),
        GuardedUpdate::Conflict => {
            return Err(AppError::Conflict(format!(
                "A category with slug {taken} already exists"
            )));
        }
    };

    tracing::info!(category_id = %category.id, "category updated");
    Ok(ApiResponse::success("Category updated", category, Some(Meta::empty())))
}

/// Products keep their category string; only the category record and its
/// uploaded image go away.
pub async fn delete_category(
    state: &AppState,
    user: &AuthUser,
    id: &str,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(user)?;
    let category = state
        .store
        .categories
        .remove(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".into()))?;

    state
        .assets
        .delete_best_effort(category.image.as_deref())
        .await;

    tracing::info!(category_id = %category.id, "category deleted");
    Ok(ApiResponse::success("Category deleted", category, Some(Meta::empty())))
}
