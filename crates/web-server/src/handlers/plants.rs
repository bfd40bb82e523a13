use super::parse_id;
use crate::{error::AppError, form::FormData, views, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use core_types::NewPlant;
use maud::Markup;
use std::sync::Arc;

/// Value of the `cross` select that marks a plant as a cross.
const CROSS_YES: &str = "Yes";

type GridResponse = ([(&'static str, &'static str); 1], Markup);

/// # GET /
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Markup, AppError> {
    let plants = state.plants.list_plants_with_care_dates().await?;
    Ok(views::plants_page(&plants))
}

/// Every unmatched route renders the plant list, with a 404 status.
pub async fn fallback(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let page = list(State(state)).await?;
    Ok((StatusCode::NOT_FOUND, page))
}

/// # GET /plants/new
pub async fn new_form() -> Markup {
    views::new_plant_form()
}

/// # POST /plants/create
pub async fn create(
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<GridResponse, AppError> {
    let mut plant = plant_from_form(&form)?;

    if let Some(upload) = form.image() {
        plant.image_path = Some(state.files.save(None, &upload.file_name, &upload.bytes).await?);
    }

    let created = state.plants.create_plant(&plant).await?;
    tracing::info!(plant_id = created.id, name = %created.name, "Created plant.");

    grid_response(&state).await
}

/// # GET /plants/:id/edit
pub async fn edit_form(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Markup, AppError> {
    let id = parse_id("id", &id)?;
    let plant = state.plants.get_plant(id).await?;
    Ok(views::edit_plant_form(&plant))
}

/// # PUT /plants/:id
///
/// A new upload replaces the stored image; without one the current image is kept.
pub async fn update(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    form: FormData,
) -> Result<GridResponse, AppError> {
    let id = parse_id("id", &id)?;
    let existing = state.plants.get_plant(id).await?;

    let mut plant = plant_from_form(&form)?;
    plant.image_path = existing.image_path.clone();

    if let Some(upload) = form.image() {
        if let Some(old) = &existing.image_path {
            state.files.delete_logged(old).await;
        }
        plant.image_path = Some(state.files.save(None, &upload.file_name, &upload.bytes).await?);
    }

    state.plants.update_plant(id, &plant).await?;
    tracing::info!(plant_id = id, "Updated plant.");

    grid_response(&state).await
}

/// # DELETE /plants/:id
pub async fn delete(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Html<&'static str>, AppError> {
    let id = parse_id("id", &id)?;
    let plant = state.plants.get_plant(id).await?;

    if let Some(image) = &plant.image_path {
        state.files.delete_logged(image).await;
    }
    state.plants.soft_delete_plant(id).await?;
    tracing::info!(plant_id = id, "Deleted plant.");

    Ok(Html(""))
}

/// The grid fragment, with a trigger telling the page to close the form modal.
async fn grid_response(state: &AppState) -> Result<GridResponse, AppError> {
    let plants = state.plants.list_plants_with_care_dates().await?;
    Ok(([("HX-Trigger", "closeModal")], views::plants_grid(&plants)))
}

fn plant_from_form(form: &FormData) -> Result<NewPlant, AppError> {
    let is_cross = form.text("cross") == CROSS_YES;
    let generation = is_cross
        .then(|| form.text("generation").trim())
        .filter(|g| !g.is_empty())
        .map(str::to_string);

    Ok(NewPlant {
        name: form.required("name")?,
        species: form.parse("species")?,
        health: form.parse("health")?,
        growth_stage: form.parse("growth_stage")?,
        planting_date: form.date("planting_date")?,
        image_path: None,
        notes: form.text("notes").to_string(),
        is_cross,
        generation,
    })
}
