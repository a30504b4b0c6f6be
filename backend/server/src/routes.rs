use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State as AppState},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stock::{DisplayMode, FlavorDisplay, GoalBasis, Inventory, InventoryItem, customer_view};
use tracing::info;

use crate::{
    error::AppError,
    state::State,
    utils::{check_item, clean_inventory, clean_name},
};

#[derive(Serialize, Deserialize)]
pub struct Headline {
    pub headline: String,
}

#[derive(Deserialize)]
pub struct DisplayQuery {
    #[serde(default)]
    mode: DisplayMode,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDisplay {
    pub headline: String,
    pub mode: DisplayMode,
    pub goal_basis: GoalBasis,
    pub generated_at: DateTime<Utc>,
    pub flavors: Vec<FlavorDisplay>,
}

pub async fn inventory_handler(
    AppState(state): AppState<Arc<State>>,
) -> Result<Json<Inventory>, AppError> {
    let inventory = state
        .store
        .get()
        .await
        .map_err(AppError::StoreUnavailable)?;

    Ok(Json(inventory))
}

pub async fn save_inventory_handler(
    AppState(state): AppState<Arc<State>>,
    Json(payload): Json<Inventory>,
) -> Result<impl IntoResponse, AppError> {
    let inventory = clean_inventory(payload)?;

    state.store.set(&inventory).await?;
    info!("Saved {} flavors", inventory.len());

    Ok((StatusCode::OK, "Data saved successfully"))
}

pub async fn item_handler(
    AppState(state): AppState<Arc<State>>,
    Path(name): Path<String>,
) -> Result<Json<InventoryItem>, AppError> {
    let name = clean_name(&name)?;
    let inventory = state
        .store
        .get()
        .await
        .map_err(AppError::StoreUnavailable)?;

    inventory
        .get(&name)
        .copied()
        .map(Json)
        .ok_or(AppError::NotFound(name))
}

pub async fn upsert_item_handler(
    AppState(state): AppState<Arc<State>>,
    Path(name): Path<String>,
    Json(item): Json<InventoryItem>,
) -> Result<Json<InventoryItem>, AppError> {
    let name = clean_name(&name)?;
    check_item(&name, &item)?;

    state.store.upsert(&name, &item).await?;
    info!("Saved {name}");

    Ok(Json(item))
}

pub async fn headline_handler(
    AppState(state): AppState<Arc<State>>,
) -> Result<Json<Headline>, AppError> {
    let headline = state
        .store
        .get_headline()
        .await
        .map_err(AppError::StoreUnavailable)?;

    Ok(Json(Headline { headline }))
}

pub async fn save_headline_handler(
    AppState(state): AppState<Arc<State>>,
    Json(payload): Json<Headline>,
) -> Result<impl IntoResponse, AppError> {
    state.store.set_headline(&payload.headline).await?;

    Ok((StatusCode::OK, "Headline saved successfully"))
}

pub async fn display_handler(
    AppState(state): AppState<Arc<State>>,
    Query(query): Query<DisplayQuery>,
) -> Result<Json<CustomerDisplay>, AppError> {
    let (inventory, headline) = tokio::try_join!(state.store.get(), state.store.get_headline())
        .map_err(AppError::StoreUnavailable)?;

    let basis = state.config.goal_basis;

    Ok(Json(CustomerDisplay {
        headline,
        mode: query.mode,
        goal_basis: basis,
        generated_at: Utc::now(),
        flavors: customer_view(&inventory, query.mode, basis),
    }))
}
