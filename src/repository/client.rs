use chrono::Utc;
use diesel::prelude::*;

use crate::{
    domain::{
        client::{ClientRecord, NewClientRecord},
        types::{ClientId, ClientName, InsuranceProvider},
    },
    models::client::{Client as DbClient, NewClient as DbNewClient},
    repository::{
        ClientListQuery, ClientReader, ClientWriter, DieselRepository,
        errors::{RepositoryError, RepositoryResult},
    },
};

/// Escapes `LIKE` wildcards so the term is matched literally as a substring.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn into_domain(rows: Vec<DbClient>) -> RepositoryResult<Vec<ClientRecord>> {
    rows.into_iter()
        .map(|row| ClientRecord::try_from(row).map_err(RepositoryError::from))
        .collect()
}

impl ClientReader for DieselRepository {
    fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<ClientRecord>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .find(id.as_str())
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(|c| ClientRecord::try_from(c).map_err(RepositoryError::from))
            .transpose()
    }

    fn find_client_by_name_and_provider(
        &self,
        client_name: &ClientName,
        insurance_provider: &InsuranceProvider,
    ) -> RepositoryResult<Option<ClientRecord>> {
        use crate::schema::clients;

        let mut conn = self.conn()?;
        let client = clients::table
            .filter(clients::client_name.eq(client_name.as_str()))
            .filter(clients::insurance_provider.eq(insurance_provider.as_str()))
            .first::<DbClient>(&mut conn)
            .optional()?;

        client
            .map(|c| ClientRecord::try_from(c).map_err(RepositoryError::from))
            .transpose()
    }

    fn list_clients(
        &self,
        query: ClientListQuery,
    ) -> RepositoryResult<(usize, Vec<ClientRecord>)> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let pattern = query.search.as_deref().map(like_pattern);

        let query_builder = || {
            let mut items = clients::table
                .filter(clients::sales_rep_id.eq(query.sales_rep_id.as_str()))
                .into_boxed::<diesel::sqlite::Sqlite>();

            // SQLite LIKE is case-insensitive for ASCII text.
            if let Some(pattern) = &pattern {
                items = items.filter(
                    clients::client_name
                        .like(pattern.clone())
                        .escape('\\')
                        .or(clients::email
                            .assume_not_null()
                            .like(pattern.clone())
                            .escape('\\'))
                        .or(clients::mobile_number.like(pattern.clone()).escape('\\'))
                        .or(clients::product.like(pattern.clone()).escape('\\'))
                        .or(clients::insurance_provider
                            .like(pattern.clone())
                            .escape('\\'))
                        .or(clients::policy_number
                            .assume_not_null()
                            .like(pattern.clone())
                            .escape('\\')),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = query_builder()
            .order((clients::created_at.desc(), clients::id.desc()));

        if let Some(pagination) = &query.pagination {
            let Some(offset) = pagination.offset() else {
                return Ok((total, Vec::new()));
            };
            items = items
                .offset(offset)
                .limit(i64::try_from(pagination.per_page).unwrap_or(i64::MAX));
        }

        let rows = items.load::<DbClient>(&mut conn)?;

        Ok((total, into_domain(rows)?))
    }
}

impl ClientWriter for DieselRepository {
    fn create_client(&self, new_client: &NewClientRecord) -> RepositoryResult<ClientRecord> {
        use crate::schema::clients;

        let mut conn = self.conn()?;

        let insertable = DbNewClient::from_domain(new_client, Utc::now().naive_utc());

        let stored = diesel::insert_into(clients::table)
            .values(&insertable)
            .get_result::<DbClient>(&mut conn)?;

        ClientRecord::try_from(stored).map_err(RepositoryError::from)
    }
}
