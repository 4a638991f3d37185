use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::client::{
    ClientDetails, ClientRecord as DomainClientRecord, NewClientRecord as DomainNewClientRecord,
};
use crate::domain::types::{
    ClientId, ClientName, CustomerType, InsuranceProvider, MobileNumber, ProductName, SalesRepId,
    TypeConstraintError,
};

#[derive(Debug, Clone, Identifiable, Queryable)]
#[diesel(table_name = crate::schema::clients)]
/// Diesel model for [`crate::domain::client::ClientRecord`].
pub struct Client {
    pub id: String,
    pub customer_type: String,
    pub product: String,
    pub insurance_provider: String,
    pub client_name: String,
    pub mobile_number: String,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub pan_number: Option<String>,
    pub aadhar_number: Option<String>,
    pub nominee_name: Option<String>,
    pub pan_card_url: Option<String>,
    pub aadhar_card_url: Option<String>,
    pub photo_url: Option<String>,
    pub policy_document_url: Option<String>,
    pub policy_number: Option<String>,
    pub policy_type: Option<String>,
    pub policy_start_date: Option<NaiveDate>,
    pub policy_end_date: Option<NaiveDate>,
    pub sum_insured: Option<f64>,
    pub premium_amount: Option<f64>,
    pub commission_amount: Option<f64>,
    pub payment_mode: Option<String>,
    pub remarks: Option<String>,
    pub sales_rep_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::clients)]
/// Insertable form of [`Client`].
pub struct NewClient<'a> {
    pub id: &'a str,
    pub customer_type: &'a str,
    pub product: &'a str,
    pub insurance_provider: &'a str,
    pub client_name: &'a str,
    pub mobile_number: &'a str,
    pub email: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<&'a str>,
    pub address: Option<&'a str>,
    pub city: Option<&'a str>,
    pub state: Option<&'a str>,
    pub pincode: Option<&'a str>,
    pub pan_number: Option<&'a str>,
    pub aadhar_number: Option<&'a str>,
    pub nominee_name: Option<&'a str>,
    pub pan_card_url: Option<&'a str>,
    pub aadhar_card_url: Option<&'a str>,
    pub photo_url: Option<&'a str>,
    pub policy_document_url: Option<&'a str>,
    pub policy_number: Option<&'a str>,
    pub policy_type: Option<&'a str>,
    pub policy_start_date: Option<NaiveDate>,
    pub policy_end_date: Option<NaiveDate>,
    pub sum_insured: Option<f64>,
    pub premium_amount: Option<f64>,
    pub commission_amount: Option<f64>,
    pub payment_mode: Option<&'a str>,
    pub remarks: Option<&'a str>,
    pub sales_rep_id: &'a str,
    pub created_at: NaiveDateTime,
}

impl<'a> NewClient<'a> {
    /// Builds the insertable row, stamping the creation time.
    pub fn from_domain(client: &'a DomainNewClientRecord, created_at: NaiveDateTime) -> Self {
        let details = &client.details;
        Self {
            id: client.id.as_str(),
            customer_type: client.customer_type.as_str(),
            product: client.product.as_str(),
            insurance_provider: client.insurance_provider.as_str(),
            client_name: client.client_name.as_str(),
            mobile_number: client.mobile_number.as_str(),
            email: details.email.as_deref(),
            date_of_birth: details.date_of_birth,
            gender: details.gender.as_deref(),
            address: details.address.as_deref(),
            city: details.city.as_deref(),
            state: details.state.as_deref(),
            pincode: details.pincode.as_deref(),
            pan_number: details.pan_number.as_deref(),
            aadhar_number: details.aadhar_number.as_deref(),
            nominee_name: details.nominee_name.as_deref(),
            pan_card_url: details.pan_card_url.as_deref(),
            aadhar_card_url: details.aadhar_card_url.as_deref(),
            photo_url: details.photo_url.as_deref(),
            policy_document_url: details.policy_document_url.as_deref(),
            policy_number: details.policy_number.as_deref(),
            policy_type: details.policy_type.as_deref(),
            policy_start_date: details.policy_start_date,
            policy_end_date: details.policy_end_date,
            sum_insured: details.sum_insured,
            premium_amount: details.premium_amount,
            commission_amount: details.commission_amount,
            payment_mode: details.payment_mode.as_deref(),
            remarks: details.remarks.as_deref(),
            sales_rep_id: client.sales_rep_id.as_str(),
            created_at,
        }
    }
}

impl TryFrom<Client> for DomainClientRecord {
    type Error = TypeConstraintError;

    fn try_from(client: Client) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ClientId::new(client.id)?,
            customer_type: CustomerType::new(client.customer_type)?,
            product: ProductName::new(client.product)?,
            insurance_provider: InsuranceProvider::new(client.insurance_provider)?,
            client_name: ClientName::new(client.client_name)?,
            mobile_number: MobileNumber::new(client.mobile_number)?,
            details: ClientDetails {
                email: client.email,
                date_of_birth: client.date_of_birth,
                gender: client.gender,
                address: client.address,
                city: client.city,
                state: client.state,
                pincode: client.pincode,
                pan_number: client.pan_number,
                aadhar_number: client.aadhar_number,
                nominee_name: client.nominee_name,
                pan_card_url: client.pan_card_url,
                aadhar_card_url: client.aadhar_card_url,
                photo_url: client.photo_url,
                policy_document_url: client.policy_document_url,
                policy_number: client.policy_number,
                policy_type: client.policy_type,
                policy_start_date: client.policy_start_date,
                policy_end_date: client.policy_end_date,
                sum_insured: client.sum_insured,
                premium_amount: client.premium_amount,
                commission_amount: client.commission_amount,
                payment_mode: client.payment_mode,
                remarks: client.remarks,
            },
            sales_rep_id: SalesRepId::new(client.sales_rep_id)?,
            created_at: client.created_at,
        })
    }
}
