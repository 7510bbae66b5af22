//! JSON option feeds for the report form dropdowns.

use crate::db::get_db_pool;
use crate::natural::NaturalKey;
use crate::orm::{clients, error_reports, log_reports, msp_reports};
use actix_web::{error, get, web, Error, HttpResponse};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QuerySelect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(client_options)
        .service(error_components)
        .service(solideo_options)
        .service(leave_options);
}

fn natural_sorted(values: BTreeSet<String>) -> Vec<String> {
    let mut values: Vec<String> = values.into_iter().collect();
    values.sort_by_key(|v| NaturalKey::new(v));
    values
}

/// Distinct non-empty values of one nullable column, trimmed.
async fn distinct_opt<E>(
    column: impl ColumnTrait,
    filter: Option<sea_orm::Condition>,
) -> Result<BTreeSet<String>, Error>
where
    E: EntityTrait,
{
    let mut query = E::find().select_only().column(column).distinct();
    if let Some(cond) = filter {
        query = query.filter(cond);
    }
    let rows: Vec<Option<String>> = query
        .into_tuple()
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;
    Ok(rows
        .into_iter()
        .flatten()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .collect())
}

/// Distinct client names across all three report tables.
async fn report_client_names() -> Result<BTreeSet<String>, Error> {
    let mut names = distinct_opt::<msp_reports::Entity>(msp_reports::Column::ClientName, None).await?;
    names.extend(
        distinct_opt::<error_reports::Entity>(error_reports::Column::ClientName, None).await?,
    );
    names.extend(distinct_opt::<log_reports::Entity>(log_reports::Column::ClientName, None).await?);
    Ok(names)
}

/// Distinct system names and target envs for one client, across all three
/// report tables.
async fn report_systems_envs(client: &str) -> Result<(BTreeSet<String>, BTreeSet<String>), Error> {
    let mut systems = distinct_opt::<msp_reports::Entity>(
        msp_reports::Column::SystemName,
        Some(sea_orm::Condition::all().add(msp_reports::Column::ClientName.eq(client))),
    )
    .await?;
    systems.extend(
        distinct_opt::<error_reports::Entity>(
            error_reports::Column::SystemName,
            Some(sea_orm::Condition::all().add(error_reports::Column::ClientName.eq(client))),
        )
        .await?,
    );
    systems.extend(
        distinct_opt::<log_reports::Entity>(
            log_reports::Column::SystemName,
            Some(sea_orm::Condition::all().add(log_reports::Column::ClientName.eq(client))),
        )
        .await?,
    );

    let mut envs = distinct_opt::<msp_reports::Entity>(
        msp_reports::Column::TargetEnv,
        Some(sea_orm::Condition::all().add(msp_reports::Column::ClientName.eq(client))),
    )
    .await?;
    envs.extend(
        distinct_opt::<error_reports::Entity>(
            error_reports::Column::TargetEnv,
            Some(sea_orm::Condition::all().add(error_reports::Column::ClientName.eq(client))),
        )
        .await?,
    );
    envs.extend(
        distinct_opt::<log_reports::Entity>(
            log_reports::Column::TargetEnv,
            Some(sea_orm::Condition::all().add(log_reports::Column::ClientName.eq(client))),
        )
        .await?,
    );

    Ok((systems, envs))
}

#[derive(Deserialize)]
pub struct ClientOptionsQuery {
    client_name: String,
}

#[derive(Serialize)]
struct ClientOptions {
    system_names: Vec<String>,
    target_envs: Vec<String>,
    target_components: Vec<String>,
}

/// Registry-backed per-client dropdown values for the report forms.
#[get("/client/options")]
pub async fn client_options(query: web::Query<ClientOptionsQuery>) -> Result<HttpResponse, Error> {
    let rows = clients::Entity::find()
        .filter(clients::Column::ClientName.eq(&query.client_name))
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    let mut system_names = BTreeSet::new();
    let mut target_envs = BTreeSet::new();
    let mut target_components = BTreeSet::new();
    for row in rows {
        if let Some(v) = row.system_name {
            system_names.insert(v);
        }
        if let Some(v) = row.target_env {
            target_envs.insert(v);
        }
        if let Some(v) = row.target_component {
            target_components.insert(v);
        }
    }

    Ok(HttpResponse::Ok().json(ClientOptions {
        system_names: system_names.into_iter().collect(),
        target_envs: target_envs.into_iter().collect(),
        target_components: target_components.into_iter().collect(),
    }))
}

#[derive(Serialize)]
struct ComponentOptions {
    components: Vec<String>,
}

/// Distinct non-null components seen in past error reports.
#[get("/error/components")]
pub async fn error_components() -> Result<HttpResponse, Error> {
    let components =
        distinct_opt::<error_reports::Entity>(error_reports::Column::TargetComponent, None).await?;
    Ok(HttpResponse::Ok().json(ComponentOptions {
        components: components.into_iter().collect(),
    }))
}

#[derive(Deserialize)]
pub struct ScopedOptionsQuery {
    #[serde(default)]
    client: String,
}

#[derive(Serialize)]
struct ScopedOptions {
    clients: Vec<String>,
    systems: Vec<String>,
    envs: Vec<String>,
}

/// Dropdown values for the daily-duty form, naturally sorted.
#[get("/solideo/options")]
pub async fn solideo_options(query: web::Query<ScopedOptionsQuery>) -> Result<HttpResponse, Error> {
    if query.client.is_empty() {
        return Ok(HttpResponse::Ok().json(ScopedOptions {
            clients: natural_sorted(report_client_names().await?),
            systems: Vec::new(),
            envs: Vec::new(),
        }));
    }

    let (systems, envs) = report_systems_envs(&query.client).await?;
    Ok(HttpResponse::Ok().json(ScopedOptions {
        clients: Vec::new(),
        systems: natural_sorted(systems),
        envs: natural_sorted(envs),
    }))
}

/// Dropdown values for the leave form, plain lexicographic order.
#[get("/leave/options")]
pub async fn leave_options(query: web::Query<ScopedOptionsQuery>) -> Result<HttpResponse, Error> {
    if query.client.is_empty() {
        return Ok(HttpResponse::Ok().json(ScopedOptions {
            clients: report_client_names().await?.into_iter().collect(),
            systems: Vec::new(),
            envs: Vec::new(),
        }));
    }

    let (systems, envs) = report_systems_envs(&query.client).await?;
    Ok(HttpResponse::Ok().json(ScopedOptions {
        clients: Vec::new(),
        systems: systems.into_iter().collect(),
        envs: envs.into_iter().collect(),
    }))
}
