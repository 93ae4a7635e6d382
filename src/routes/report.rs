use actix_web::{HttpResponse, get, web};
use serde::Deserialize;

use crate::cache::TtlCache;
use crate::domain::user::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::services::report::DashboardSummary;
use crate::services::{ServiceError, report as report_service};

#[derive(Debug, Deserialize)]
struct DashboardParams {
    /// Bypass and refill the cache.
    #[serde(default)]
    refresh: bool,
}

#[get("/reports/dashboard")]
pub async fn dashboard(
    params: web::Query<DashboardParams>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    cache: web::Data<TtlCache<DashboardSummary>>,
) -> Result<HttpResponse, ServiceError> {
    if params.refresh {
        cache.invalidate();
    }

    if let Some(summary) = cache.get() {
        return Ok(HttpResponse::Ok().json(summary));
    }

    let summary = report_service::dashboard_summary(repo.get_ref(), &user)?;
    cache.put(summary.clone());
    Ok(HttpResponse::Ok().json(summary))
}
