use crate::{
    db::{DbConnection, DbPool},
    domain::{
        client::{ClientRecord, NewClientRecord},
        types::{ClientId, ClientName, InsuranceProvider, SalesRepId},
    },
    repository::errors::RepositoryResult,
};

pub mod client;
pub mod errors;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Number of rows to skip for the requested page (pages are 1-based).
    ///
    /// `None` when the offset does not fit a SQL integer; such a page lies past
    /// the end of any table.
    pub fn offset(&self) -> Option<i64> {
        (self.page.max(1) - 1)
            .checked_mul(self.per_page)
            .and_then(|offset| i64::try_from(offset).ok())
    }
}

/// Listing of clients owned by a single sales rep, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientListQuery {
    pub sales_rep_id: SalesRepId,
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl ClientListQuery {
    pub fn new(sales_rep_id: SalesRepId) -> Self {
        Self {
            sales_rep_id,
            search: None,
            pagination: None,
        }
    }

    /// Restricts the listing to clients matching `term`. Blank terms are ignored.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().trim().to_string();
        self.search = if term.is_empty() { None } else { Some(term) };
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait ClientReader {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<ClientRecord>>;
    fn find_client_by_name_and_provider(
        &self,
        client_name: &ClientName,
        insurance_provider: &InsuranceProvider,
    ) -> RepositoryResult<Option<ClientRecord>>;
    /// Returns the total number of matching clients along with the requested page.
    fn list_clients(&self, query: ClientListQuery)
    -> RepositoryResult<(usize, Vec<ClientRecord>)>;
}

pub trait ClientWriter {
    /// Inserts the client stamping its creation time and returns the stored row.
    fn create_client(&self, new_client: &NewClientRecord) -> RepositoryResult<ClientRecord>;
}

/// Diesel-backed repository shared by all request handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}
