use serde::Deserialize;

use crate::{
    domain::{
        client::{ClientDetails, NewClientRecord},
        types::{
            ClientId, ClientName, CustomerType, InsuranceProvider, MobileNumber, ProductName,
            SalesRepId,
        },
    },
    forms::FormError,
};

/// Client data accepted by the create endpoints.
///
/// Required attributes are optional here so that a missing value surfaces as a
/// validation error listing every absent field rather than a parse failure.
/// Unknown keys, including any owner or timestamp supplied by the caller, are
/// ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ClientPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub insurance_provider: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(flatten)]
    pub details: ClientDetails,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|s| s.trim().is_empty())
}

impl ClientPayload {
    /// Validates the payload and builds the record owned by `sales_rep_id`,
    /// generating an identifier when none was supplied.
    pub fn into_domain(self, sales_rep_id: SalesRepId) -> Result<NewClientRecord, FormError> {
        let missing = [
            ("customer_type", &self.customer_type),
            ("product", &self.product),
            ("insurance_provider", &self.insurance_provider),
            ("client_name", &self.client_name),
            ("mobile_number", &self.mobile_number),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value))
        .map(|(name, _)| name)
        .collect::<Vec<_>>();

        if !missing.is_empty() {
            return Err(FormError::MissingFields(missing.join(", ")));
        }

        let id = match self.id.filter(|id| !id.trim().is_empty()) {
            Some(id) => ClientId::new(id).map_err(|source| FormError::invalid("id", source))?,
            None => ClientId::generate(),
        };

        Ok(NewClientRecord {
            id,
            customer_type: CustomerType::new(self.customer_type.unwrap_or_default())
                .map_err(|source| FormError::invalid("customer_type", source))?,
            product: ProductName::new(self.product.unwrap_or_default())
                .map_err(|source| FormError::invalid("product", source))?,
            insurance_provider: InsuranceProvider::new(
                self.insurance_provider.unwrap_or_default(),
            )
            .map_err(|source| FormError::invalid("insurance_provider", source))?,
            client_name: ClientName::new(self.client_name.unwrap_or_default())
                .map_err(|source| FormError::invalid("client_name", source))?,
            mobile_number: MobileNumber::new(self.mobile_number.unwrap_or_default())
                .map_err(|source| FormError::invalid("mobile_number", source))?,
            details: self
                .details
                .normalize()
                .map_err(|source| FormError::invalid("client details", source))?,
            sales_rep_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn owner() -> SalesRepId {
        SalesRepId::new("17").unwrap()
    }

    fn valid_json() -> serde_json::Value {
        json!({
            "customer_type": "individual",
            "product": "Health Plus",
            "insurance_provider": "Test Insurance Co",
            "client_name": "  Test Client ",
            "mobile_number": "9876543210",
            "email": "Test@Example.com",
            "sum_insured": 500000,
            "policy_start_date": "2025-01-01",
            "city": "   ",
        })
    }

    #[test]
    fn valid_payload_builds_owned_record_with_generated_id() {
        let payload: ClientPayload = serde_json::from_value(valid_json()).unwrap();
        let client = payload.into_domain(owner()).unwrap();

        assert!(ClientId::new(client.id.as_str()).is_ok());
        assert_eq!(client.client_name.as_str(), "Test Client");
        assert_eq!(client.details.email.as_deref(), Some("test@example.com"));
        assert_eq!(client.details.sum_insured, Some(500000.0));
        assert_eq!(client.details.city, None);
        assert_eq!(client.sales_rep_id, owner());
    }

    #[test]
    fn caller_supplied_owner_is_ignored() {
        let mut value = valid_json();
        value["sales_rep_id"] = json!("someone-else");
        value["created_at"] = json!("1999-01-01T00:00:00");
        let payload: ClientPayload = serde_json::from_value(value).unwrap();
        let client = payload.into_domain(owner()).unwrap();
        assert_eq!(client.sales_rep_id.as_str(), "17");
    }

    #[test]
    fn supplied_id_is_kept_when_well_formed() {
        let mut value = valid_json();
        value["id"] = json!("Cdeadbeef");
        let payload: ClientPayload = serde_json::from_value(value).unwrap();
        let client = payload.into_domain(owner()).unwrap();
        assert_eq!(client.id.as_str(), "Cdeadbeef");

        let mut value = valid_json();
        value["id"] = json!("client-1");
        let payload: ClientPayload = serde_json::from_value(value).unwrap();
        assert!(matches!(
            payload.into_domain(owner()),
            Err(FormError::InvalidField { field: "id", .. })
        ));
    }

    #[test]
    fn missing_required_fields_are_reported_together() {
        let payload: ClientPayload = serde_json::from_value(json!({
            "customer_type": "individual",
            "product": " ",
            "client_name": "Acme Corp",
        }))
        .unwrap();

        match payload.into_domain(owner()) {
            Err(FormError::MissingFields(fields)) => {
                assert_eq!(fields, "product, insurance_provider, mobile_number");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut value = valid_json();
        value["email"] = json!("nope");
        let payload: ClientPayload = serde_json::from_value(value).unwrap();
        assert!(matches!(
            payload.into_domain(owner()),
            Err(FormError::InvalidField { .. })
        ));
    }
}
