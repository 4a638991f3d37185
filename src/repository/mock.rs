//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::client::{ClientRecord, NewClientRecord};
use crate::domain::types::{ClientId, ClientName, InsuranceProvider};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientListQuery, ClientReader, ClientWriter};

mock! {
    pub Repository {}

    impl ClientReader for Repository {
        fn get_client_by_id(&self, id: &ClientId) -> RepositoryResult<Option<ClientRecord>>;
        fn find_client_by_name_and_provider(
            &self,
            client_name: &ClientName,
            insurance_provider: &InsuranceProvider,
        ) -> RepositoryResult<Option<ClientRecord>>;
        fn list_clients(&self, query: ClientListQuery) -> RepositoryResult<(usize, Vec<ClientRecord>)>;
    }

    impl ClientWriter for Repository {
        fn create_client(&self, new_client: &NewClientRecord) -> RepositoryResult<ClientRecord>;
    }
}
