//! Request handlers; each one is a thin wrapper over a [`Ledger`](crate::service::Ledger) call.

use super::AppState;
use crate::{
    core::{
        aggregate::Stats,
        view::{SortDirection, SortKey, SortSpec},
    },
    entities::{customer, financial_record},
    errors::Result,
    models::{AnnotatedRecord, CustomerProfile, NewCustomer, RecordInput},
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

/// Liveness body.
#[derive(Debug, Serialize)]
pub struct Health {
    /// Always `"ok"`
    pub status: &'static str,
}

/// Id of a deleted entity.
#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
    /// The deleted id
    pub id: String,
}

/// Query string for the record list.
#[derive(Debug, Default, Deserialize)]
pub struct RecordQuery {
    /// Case-insensitive substring over description and type
    #[serde(default)]
    pub filter: String,
    /// Column to sort by; store order when absent
    pub sort: Option<SortKey>,
    /// Sort direction, ascending when absent
    #[serde(default)]
    pub direction: SortDirection,
}

/// Summary response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryBody {
    /// Summary paragraph or the fallback text
    pub summary: String,
}

/// A customer's records to summarize.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    /// Customer the records belong to
    pub customer_id: String,
    /// Records as shown to the user
    pub records: Vec<AnnotatedRecord>,
}

/// Records to highlight.
#[derive(Debug, Deserialize)]
pub struct HighlightRequest {
    /// Records as shown to the user, possibly with earlier annotations
    pub records: Vec<AnnotatedRecord>,
}

/// `GET /health`
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// `GET /api/customers`
pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<customer::Model>>> {
    Ok(Json(state.ledger.list_customers().await?))
}

/// `POST /api/customers`
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<NewCustomer>,
) -> Result<(StatusCode, Json<customer::Model>)> {
    let customer = state.ledger.add_customer(input).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// `GET /api/customers/{id}`
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<customer::Model>> {
    Ok(Json(state.ledger.get_customer(&id).await?))
}

/// `PUT /api/customers/{id}`; the path id wins over any id in the body.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewCustomer>,
) -> Result<Json<customer::Model>> {
    let customer = customer::Model {
        id,
        name: input.name,
        email: input.email,
        phone: input.phone,
    };
    Ok(Json(state.ledger.update_customer(customer).await?))
}

/// `DELETE /api/customers/{id}`
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>> {
    let id = state.ledger.delete_customer(&id).await?;
    Ok(Json(Deleted { id }))
}

/// `GET /api/customers/{id}/records`
pub async fn list_records(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RecordQuery>,
) -> Result<Json<Vec<financial_record::Model>>> {
    let sort = query.sort.map(|key| SortSpec {
        key,
        direction: query.direction,
    });
    Ok(Json(
        state.ledger.view_records(&id, &query.filter, sort).await?,
    ))
}

/// `POST /api/customers/{id}/records`
pub async fn create_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RecordInput>,
) -> Result<(StatusCode, Json<financial_record::Model>)> {
    let record = state.ledger.add_record(&id, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/customers/{id}/stats`
pub async fn customer_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Stats>> {
    Ok(Json(state.ledger.stats(&id).await?))
}

/// `GET /api/customers/{id}/profile`
pub async fn customer_profile(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerProfile>> {
    Ok(Json(state.ledger.profile(&id).await?))
}

/// `POST /api/customers/{id}/summary`
pub async fn summarize_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SummaryBody>> {
    let summary = state.ledger.summarize(&id).await?;
    Ok(Json(SummaryBody { summary }))
}

/// `POST /api/summary`
pub async fn summarize_records(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryBody>> {
    let records: Vec<financial_record::Model> = request
        .records
        .into_iter()
        .map(AnnotatedRecord::into_record)
        .collect();
    let summary = state
        .ledger
        .summarize_records(&request.customer_id, &records)
        .await?;
    Ok(Json(SummaryBody { summary }))
}

/// `POST /api/customers/{id}/highlights`
pub async fn highlight_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<AnnotatedRecord>>> {
    Ok(Json(state.ledger.highlight(&id).await?))
}

/// `POST /api/highlights`
pub async fn highlight_records(
    State(state): State<AppState>,
    Json(request): Json<HighlightRequest>,
) -> Result<Json<Vec<AnnotatedRecord>>> {
    Ok(Json(state.ledger.highlight_records(request.records).await?))
}

/// `PUT /api/records/{id}`
pub async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RecordInput>,
) -> Result<Json<financial_record::Model>> {
    Ok(Json(state.ledger.edit_record(&id, input).await?))
}

/// `DELETE /api/records/{id}`
pub async fn delete_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>> {
    let id = state.ledger.delete_record(&id).await?;
    Ok(Json(Deleted { id }))
}
