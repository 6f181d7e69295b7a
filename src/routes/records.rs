use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::models::{
    Client, CompleteReminderRequest, Property, Reminder, RescheduleReminderRequest, TenantId,
};
use crate::routes::{bad_request, internal_error, not_found, AppState};
use crate::services::Collection;

/// A record kept in one of the tenant collections
trait StoredRecord: Serialize + DeserializeOwned + Validate + Clone + 'static {
    const COLLECTION: Collection;
    const LABEL: &'static str;
    /// Whether writes must drop memoized rankings
    const AFFECTS_RANKING: bool;

    fn id(&self) -> &str;

    /// Fill in the server-owned fields of a newly created record
    fn assign_identity(&mut self, tenant: &TenantId);

    /// Carry the server-owned fields over from the stored version
    fn inherit(&mut self, existing: &Self);
}

trait Favorite {
    fn toggle_favorite(&mut self);
}

fn new_id(current: &str) -> String {
    if current.trim().is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        current.to_string()
    }
}

impl StoredRecord for Property {
    const COLLECTION: Collection = Collection::Properties;
    const LABEL: &'static str = "Property";
    const AFFECTS_RANKING: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_identity(&mut self, tenant: &TenantId) {
        self.id = new_id(&self.id);
        self.tenant_id = tenant.to_string();
        self.created_at = Some(Utc::now());
    }

    fn inherit(&mut self, existing: &Self) {
        self.id = existing.id.clone();
        self.tenant_id = existing.tenant_id.clone();
        self.created_at = existing.created_at;
    }
}

impl Favorite for Property {
    fn toggle_favorite(&mut self) {
        self.is_favorite = !self.is_favorite;
    }
}

impl StoredRecord for Client {
    const COLLECTION: Collection = Collection::Clients;
    const LABEL: &'static str = "Client";
    const AFFECTS_RANKING: bool = true;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_identity(&mut self, tenant: &TenantId) {
        self.id = new_id(&self.id);
        self.tenant_id = tenant.to_string();
        self.created_at = Some(Utc::now());
    }

    fn inherit(&mut self, existing: &Self) {
        self.id = existing.id.clone();
        self.tenant_id = existing.tenant_id.clone();
        self.created_at = existing.created_at;
    }
}

impl Favorite for Client {
    fn toggle_favorite(&mut self) {
        self.is_favorite = !self.is_favorite;
    }
}

impl StoredRecord for Reminder {
    const COLLECTION: Collection = Collection::Reminders;
    const LABEL: &'static str = "Reminder";
    const AFFECTS_RANKING: bool = false;

    fn id(&self) -> &str {
        &self.id
    }

    fn assign_identity(&mut self, _tenant: &TenantId) {
        self.id = new_id(&self.id);
        self.created_at = Some(Utc::now());
    }

    fn inherit(&mut self, existing: &Self) {
        self.id = existing.id.clone();
        self.created_at = existing.created_at;
    }
}

/// Configure record CRUD routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/tenants/{tenant}/properties", web::get().to(list_records::<Property>))
        .route("/tenants/{tenant}/properties", web::post().to(create_record::<Property>))
        .route("/tenants/{tenant}/properties/{id}", web::get().to(get_record::<Property>))
        .route("/tenants/{tenant}/properties/{id}", web::put().to(update_record::<Property>))
        .route("/tenants/{tenant}/properties/{id}", web::delete().to(delete_record::<Property>))
        .route(
            "/tenants/{tenant}/properties/{id}/favorite",
            web::post().to(toggle_favorite::<Property>),
        )
        .route("/tenants/{tenant}/clients", web::get().to(list_records::<Client>))
        .route("/tenants/{tenant}/clients", web::post().to(create_record::<Client>))
        .route("/tenants/{tenant}/clients/{id}", web::get().to(get_record::<Client>))
        .route("/tenants/{tenant}/clients/{id}", web::put().to(update_record::<Client>))
        .route("/tenants/{tenant}/clients/{id}", web::delete().to(delete_record::<Client>))
        .route(
            "/tenants/{tenant}/clients/{id}/favorite",
            web::post().to(toggle_favorite::<Client>),
        )
        .route("/tenants/{tenant}/reminders", web::get().to(list_reminders))
        .route("/tenants/{tenant}/reminders", web::post().to(create_record::<Reminder>))
        .route("/tenants/{tenant}/reminders/{id}", web::delete().to(delete_record::<Reminder>))
        .route("/tenants/{tenant}/reminders/{id}/toggle", web::post().to(toggle_reminder))
        .route("/tenants/{tenant}/reminders/{id}/complete", web::post().to(complete_reminder))
        .route("/tenants/{tenant}/reminders/{id}/reschedule", web::post().to(reschedule_reminder));
}

/// Drop memoized rankings after a write that can change them
fn after_write<R: StoredRecord>(state: &AppState, tenant: &TenantId) {
    if R::AFFECTS_RANKING {
        if let Err(e) = state.rankings.invalidate_tenant(tenant) {
            tracing::warn!("Failed to invalidate rankings for {}: {}", tenant, e);
        }
    }
}

async fn list_records<R: StoredRecord>(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let tenant = TenantId::new(&path.into_inner());

    match state.store.load::<R>(&tenant, R::COLLECTION).await {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(e) => {
            tracing::error!("Failed to load {} for {}: {}", R::COLLECTION.as_str(), tenant, e);
            internal_error("Failed to load records", e.to_string())
        }
    }
}

async fn get_record<R: StoredRecord>(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (tenant, id) = path.into_inner();
    let tenant = TenantId::new(&tenant);

    match state.store.load::<R>(&tenant, R::COLLECTION).await {
        Ok(items) => match items.into_iter().find(|r| r.id() == id) {
            Some(record) => HttpResponse::Ok().json(record),
            None => not_found(R::LABEL, &id),
        },
        Err(e) => {
            tracing::error!("Failed to load {} for {}: {}", R::COLLECTION.as_str(), tenant, e);
            internal_error("Failed to load records", e.to_string())
        }
    }
}

/// Create a record; new records go to the front of the list
async fn create_record<R: StoredRecord>(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<R>,
) -> impl Responder {
    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for new {}: {:?}", R::LABEL, errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let tenant = TenantId::new(&path.into_inner());
    let mut record = body.into_inner();
    record.assign_identity(&tenant);

    let stored = record.clone();
    let outcome = state
        .store
        .update(&tenant, R::COLLECTION, move |items: &mut Vec<R>| {
            if items.iter().any(|r| r.id() == record.id()) {
                return None;
            }
            items.insert(0, record);
            Some(())
        })
        .await;

    match outcome {
        Ok(Some(())) => {
            after_write::<R>(&state, &tenant);
            tracing::debug!("Created {} {} for {}", R::LABEL, stored.id(), tenant);
            HttpResponse::Created().json(stored)
        }
        Ok(None) => bad_request(
            "Duplicate id",
            format!("{} {} already exists", R::LABEL, stored.id()),
        ),
        Err(e) => {
            tracing::error!("Failed to create {} for {}: {}", R::LABEL, tenant, e);
            internal_error("Failed to save record", e.to_string())
        }
    }
}

async fn update_record<R: StoredRecord>(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<R>,
) -> impl Responder {
    if let Err(errors) = body.validate() {
        return bad_request("Validation failed", errors.to_string());
    }

    let (tenant, id) = path.into_inner();
    let tenant = TenantId::new(&tenant);
    let record = body.into_inner();

    let target = id.clone();
    let outcome = state
        .store
        .update(&tenant, R::COLLECTION, move |items: &mut Vec<R>| {
            let pos = items.iter().position(|r| r.id() == target)?;
            let mut record = record;
            record.inherit(&items[pos]);
            items[pos] = record.clone();
            Some(record)
        })
        .await;

    match outcome {
        Ok(Some(record)) => {
            after_write::<R>(&state, &tenant);
            HttpResponse::Ok().json(record)
        }
        Ok(None) => not_found(R::LABEL, &id),
        Err(e) => {
            tracing::error!("Failed to update {} {} for {}: {}", R::LABEL, id, tenant, e);
            internal_error("Failed to save record", e.to_string())
        }
    }
}

async fn delete_record<R: StoredRecord>(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (tenant, id) = path.into_inner();
    let tenant = TenantId::new(&tenant);

    let target = id.clone();
    let outcome = state
        .store
        .update(&tenant, R::COLLECTION, move |items: &mut Vec<R>| {
            let pos = items.iter().position(|r| r.id() == target)?;
            items.remove(pos);
            Some(())
        })
        .await;

    match outcome {
        Ok(Some(())) => {
            after_write::<R>(&state, &tenant);
            HttpResponse::NoContent().finish()
        }
        Ok(None) => not_found(R::LABEL, &id),
        Err(e) => {
            tracing::error!("Failed to delete {} {} for {}: {}", R::LABEL, id, tenant, e);
            internal_error("Failed to save record", e.to_string())
        }
    }
}

async fn toggle_favorite<R: StoredRecord + Favorite>(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (tenant, id) = path.into_inner();
    let tenant = TenantId::new(&tenant);

    let target = id.clone();
    let outcome = state
        .store
        .update(&tenant, R::COLLECTION, move |items: &mut Vec<R>| {
            let record = items.iter_mut().find(|r| r.id() == target)?;
            record.toggle_favorite();
            Some(record.clone())
        })
        .await;

    match outcome {
        Ok(Some(record)) => {
            after_write::<R>(&state, &tenant);
            HttpResponse::Ok().json(record)
        }
        Ok(None) => not_found(R::LABEL, &id),
        Err(e) => {
            tracing::error!("Failed to toggle favorite on {} {}: {}", R::LABEL, id, e);
            internal_error("Failed to save record", e.to_string())
        }
    }
}

/// Reminders, earliest first
async fn list_reminders(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let tenant = TenantId::new(&path.into_inner());

    match state.store.load::<Reminder>(&tenant, Collection::Reminders).await {
        Ok(mut reminders) => {
            reminders.sort_by_key(|r| r.time);
            HttpResponse::Ok().json(reminders)
        }
        Err(e) => {
            tracing::error!("Failed to load reminders for {}: {}", tenant, e);
            internal_error("Failed to load records", e.to_string())
        }
    }
}

async fn mutate_reminder<F>(state: &AppState, tenant: &str, id: &str, apply: F) -> HttpResponse
where
    F: FnOnce(&mut Reminder),
{
    let tenant = TenantId::new(tenant);

    let outcome = state
        .store
        .update(&tenant, Collection::Reminders, |items: &mut Vec<Reminder>| {
            let reminder = items.iter_mut().find(|r| r.id == id)?;
            apply(reminder);
            Some(reminder.clone())
        })
        .await;

    match outcome {
        Ok(Some(reminder)) => HttpResponse::Ok().json(reminder),
        Ok(None) => not_found("Reminder", id),
        Err(e) => {
            tracing::error!("Failed to update reminder {} for {}: {}", id, tenant, e);
            internal_error("Failed to save record", e.to_string())
        }
    }
}

async fn toggle_reminder(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (tenant, id) = path.into_inner();
    mutate_reminder(&state, &tenant, &id, Reminder::toggle).await
}

async fn complete_reminder(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<CompleteReminderRequest>,
) -> impl Responder {
    let (tenant, id) = path.into_inner();
    let outcome = body.into_inner();
    mutate_reminder(&state, &tenant, &id, |reminder| {
        reminder.complete(outcome.client_present, outcome.owner_present)
    })
    .await
}

async fn reschedule_reminder(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<RescheduleReminderRequest>,
) -> impl Responder {
    let (tenant, id) = path.into_inner();
    let time = body.time;
    mutate_reminder(&state, &tenant, &id, |reminder| reminder.reschedule(time)).await
}
