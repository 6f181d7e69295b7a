use actix_web::{web, HttpResponse, Responder};

use crate::core::{apply_filters, dashboard, quick_search, report};
use crate::models::{Client, Property, Reminder, SearchFilters, SearchQuery, TenantId};
use crate::routes::{internal_error, AppState};
use crate::services::{Collection, StoreError};

/// Configure dashboard, report and search routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/tenants/{tenant}/dashboard", web::get().to(get_dashboard))
        .route("/tenants/{tenant}/reports", web::get().to(get_report))
        .route("/tenants/{tenant}/search", web::get().to(search))
        .route("/tenants/{tenant}/search", web::post().to(filtered_search));
}

struct TenantRecords {
    properties: Vec<Property>,
    clients: Vec<Client>,
    reminders: Vec<Reminder>,
}

async fn load_all(state: &AppState, tenant: &TenantId) -> Result<TenantRecords, StoreError> {
    let (properties, clients, reminders) = tokio::try_join!(
        state.store.load(tenant, Collection::Properties),
        state.store.load(tenant, Collection::Clients),
        state.store.load(tenant, Collection::Reminders),
    )?;

    Ok(TenantRecords {
        properties,
        clients,
        reminders,
    })
}

async fn get_dashboard(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let tenant = TenantId::new(&path.into_inner());

    match load_all(&state, &tenant).await {
        Ok(records) => HttpResponse::Ok().json(dashboard(
            &records.properties,
            &records.clients,
            &records.reminders,
        )),
        Err(e) => {
            tracing::error!("Failed to build dashboard for {}: {}", tenant, e);
            internal_error("Failed to load records", e.to_string())
        }
    }
}

async fn get_report(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let tenant = TenantId::new(&path.into_inner());

    match load_all(&state, &tenant).await {
        Ok(records) => HttpResponse::Ok().json(report(
            &records.properties,
            &records.clients,
            &records.reminders,
        )),
        Err(e) => {
            tracing::error!("Failed to build report for {}: {}", tenant, e);
            internal_error("Failed to load records", e.to_string())
        }
    }
}

/// GET /api/v1/tenants/{tenant}/search?q=bandra
async fn search(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    let tenant = TenantId::new(&path.into_inner());

    match load_all(&state, &tenant).await {
        Ok(records) => {
            let results = quick_search(&query.q, &records.properties, &records.clients);
            HttpResponse::Ok().json(results)
        }
        Err(e) => {
            tracing::error!("Search failed for {}: {}", tenant, e);
            internal_error("Failed to load records", e.to_string())
        }
    }
}

/// POST /api/v1/tenants/{tenant}/search
///
/// Request body:
/// ```json
/// {
///   "bhk": "2",
///   "city": "Mumbai",
///   "maxPrice": 60000,
///   "transactionType": "rent",
///   "clientName": "ravi"
/// }
/// ```
async fn filtered_search(
    state: web::Data<AppState>,
    path: web::Path<String>,
    filters: web::Json<SearchFilters>,
) -> impl Responder {
    let tenant = TenantId::new(&path.into_inner());

    match load_all(&state, &tenant).await {
        Ok(records) => {
            let results = apply_filters(&filters, &records.properties, &records.clients);
            HttpResponse::Ok().json(results)
        }
        Err(e) => {
            tracing::error!("Filtered search failed for {}: {}", tenant, e);
            internal_error("Failed to load records", e.to_string())
        }
    }
}
