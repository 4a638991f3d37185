use crate::domain::auth::Principal;
use crate::domain::client::{ClientRecord, NewClientRecord};
use crate::domain::types::SalesRepId;
use crate::dto::api::{ClientsPage, ListQueryParams, RecentQueryParams};
use crate::forms::client::ClientPayload;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};
use crate::services::{DUPLICATE_CLIENT_MESSAGE, ServiceError, ServiceResult};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
}

/// 1-based page number; absent, non-numeric or non-positive values select the first page.
pub fn clamp_page(raw: Option<&str>) -> usize {
    match parse_number(raw) {
        Some(page) if page >= 1 => page as usize,
        _ => 1,
    }
}

/// Page size (or recent limit) within `1..=MAX_PAGE_SIZE`.
pub fn clamp_page_size(raw: Option<&str>) -> usize {
    match parse_number(raw) {
        Some(size) if size < 1 => DEFAULT_PAGE_SIZE,
        Some(size) => (size as usize).min(MAX_PAGE_SIZE),
        None => DEFAULT_PAGE_SIZE,
    }
}

fn owner_of(principal: &Principal) -> ServiceResult<SalesRepId> {
    principal
        .sales_rep_id()
        .map_err(|_| ServiceError::Unauthorized("Invalid token".to_string()))
}

/// Returns the requested page of clients owned by the principal.
pub fn list_clients<R>(
    repo: &R,
    principal: &Principal,
    params: &ListQueryParams,
) -> ServiceResult<ClientsPage>
where
    R: ClientReader + ?Sized,
{
    let page = clamp_page(params.page.as_deref());
    let page_size = clamp_page_size(params.page_size.as_deref());

    let mut query = ClientListQuery::new(owner_of(principal)?).paginate(page, page_size);
    if let Some(search) = &params.search {
        query = query.search(search.as_str());
    }

    let (total, clients) = repo.list_clients(query)?;

    Ok(ClientsPage {
        clients,
        total,
        page,
        page_size,
    })
}

/// Returns the principal's most recently created clients.
pub fn recent_clients<R>(
    repo: &R,
    principal: &Principal,
    params: &RecentQueryParams,
) -> ServiceResult<Vec<ClientRecord>>
where
    R: ClientReader + ?Sized,
{
    let limit = clamp_page_size(params.limit.as_deref());
    let query = ClientListQuery::new(owner_of(principal)?).paginate(1, limit);
    let (_total, clients) = repo.list_clients(query)?;
    Ok(clients)
}

/// Validates the payload and binds it to the principal.
pub fn prepare_client(
    principal: &Principal,
    payload: ClientPayload,
) -> ServiceResult<NewClientRecord> {
    let owner = owner_of(principal)?;
    Ok(payload.into_domain(owner)?)
}

/// Rejects a client whose id or `(client_name, insurance_provider)` is already taken.
pub fn ensure_unique<R>(repo: &R, client: &NewClientRecord) -> ServiceResult<()>
where
    R: ClientReader + ?Sized,
{
    if repo.get_client_by_id(&client.id)?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Client with id {} already exists",
            client.id
        )));
    }

    if repo
        .find_client_by_name_and_provider(&client.client_name, &client.insurance_provider)?
        .is_some()
    {
        return Err(ServiceError::Conflict(DUPLICATE_CLIENT_MESSAGE.to_string()));
    }

    Ok(())
}

/// Persists an already validated client. A unique index violation surfaces as a conflict.
pub fn insert_client<R>(repo: &R, client: &NewClientRecord) -> ServiceResult<ClientRecord>
where
    R: ClientWriter + ?Sized,
{
    repo.create_client(client).map_err(ServiceError::from)
}

/// Creates a client owned by the principal.
pub fn create_client<R>(
    repo: &R,
    principal: &Principal,
    payload: ClientPayload,
) -> ServiceResult<ClientRecord>
where
    R: ClientReader + ClientWriter + ?Sized,
{
    let client = prepare_client(principal, payload)?;
    ensure_unique(repo, &client)?;
    let created = insert_client(repo, &client)?;
    log::info!(
        "Client {} created by sales rep {}",
        created.id,
        created.sales_rep_id
    );
    Ok(created)
}
