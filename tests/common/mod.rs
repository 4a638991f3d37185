//! Helpers shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use jsonwebtoken::{EncodingKey, Header, encode, get_current_timestamp};
use serde_json::json;
use tempfile::TempDir;

use sales_clients::db::{DbPool, establish_connection_pool};
use sales_clients::domain::client::{ClientDetails, NewClientRecord};
use sales_clients::domain::types::{
    ClientId, ClientName, CustomerType, InsuranceProvider, MobileNumber, ProductName, SalesRepId,
};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub const JWT_SECRET: &str = "integration-secret";

/// SQLite database living in a temporary directory, migrated on creation.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"), 4)
            .expect("failed to build pool");

        let mut conn = pool.get().expect("failed to get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("failed to run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn new_client(name: &str, provider: &str, owner: &str) -> NewClientRecord {
    NewClientRecord {
        id: ClientId::generate(),
        customer_type: CustomerType::new("individual").unwrap(),
        product: ProductName::new("Health Plus").unwrap(),
        insurance_provider: InsuranceProvider::new(provider).unwrap(),
        client_name: ClientName::new(name).unwrap(),
        mobile_number: MobileNumber::new("9876543210").unwrap(),
        details: ClientDetails {
            email: Some(format!(
                "{}@example.com",
                name.to_lowercase().replace(' ', ".")
            )),
            policy_number: Some(format!("POL-{}", name.len())),
            policy_start_date: NaiveDate::from_ymd_opt(2025, 1, 1),
            sum_insured: Some(500000.0),
            ..ClientDetails::default()
        },
        sales_rep_id: SalesRepId::new(owner).unwrap(),
    }
}

/// HS256 token signed with [`JWT_SECRET`] and valid for an hour.
pub fn token(id: serde_json::Value, role: &str) -> String {
    signed(json!({
        "id": id,
        "email": "rep@example.com",
        "role": role,
        "exp": get_current_timestamp() + 3600,
    }))
}

pub fn signed(claims: serde_json::Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to sign token")
}
