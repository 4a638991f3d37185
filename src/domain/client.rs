use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientEmail, ClientId, ClientName, CustomerType, InsuranceProvider, MobileNumber,
    ProductName, Remarks, SalesRepId, TypeConstraintError,
};

/// Optional descriptive, document, policy and financial attributes of a client.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ClientDetails {
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
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ClientDetails {
    /// Trims every text attribute, drops blank ones, validates the email and
    /// sanitizes remarks.
    pub fn normalize(self) -> Result<Self, TypeConstraintError> {
        let email = trimmed(self.email)
            .map(ClientEmail::new)
            .transpose()?
            .map(ClientEmail::into_inner);
        let remarks = trimmed(self.remarks)
            .map(Remarks::new)
            .transpose()
            .or_else(|err| match err {
                // Markup-only remarks sanitize down to nothing.
                TypeConstraintError::EmptyString => Ok(None),
                other => Err(other),
            })?
            .map(Remarks::into_inner);

        for amount in [self.sum_insured, self.premium_amount, self.commission_amount]
            .into_iter()
            .flatten()
        {
            if !amount.is_finite() || amount < 0.0 {
                return Err(TypeConstraintError::InvalidValue(
                    "amounts must be non-negative numbers".to_string(),
                ));
            }
        }

        if let (Some(start), Some(end)) = (self.policy_start_date, self.policy_end_date) {
            if end < start {
                return Err(TypeConstraintError::InvalidValue(
                    "policy_end_date precedes policy_start_date".to_string(),
                ));
            }
        }

        Ok(Self {
            email,
            date_of_birth: self.date_of_birth,
            gender: trimmed(self.gender),
            address: trimmed(self.address),
            city: trimmed(self.city),
            state: trimmed(self.state),
            pincode: trimmed(self.pincode),
            pan_number: trimmed(self.pan_number).map(|s| s.to_uppercase()),
            aadhar_number: trimmed(self.aadhar_number),
            nominee_name: trimmed(self.nominee_name),
            pan_card_url: trimmed(self.pan_card_url),
            aadhar_card_url: trimmed(self.aadhar_card_url),
            photo_url: trimmed(self.photo_url),
            policy_document_url: trimmed(self.policy_document_url),
            policy_number: trimmed(self.policy_number),
            policy_type: trimmed(self.policy_type),
            policy_start_date: self.policy_start_date,
            policy_end_date: self.policy_end_date,
            sum_insured: self.sum_insured,
            premium_amount: self.premium_amount,
            commission_amount: self.commission_amount,
            payment_mode: trimmed(self.payment_mode),
            remarks,
        })
    }

    /// Records the URL of an uploaded document in its matching attribute.
    pub fn set_document_url(&mut self, kind: DocumentKind, url: String) {
        let slot = match kind {
            DocumentKind::PanCard => &mut self.pan_card_url,
            DocumentKind::AadharCard => &mut self.aadhar_card_url,
            DocumentKind::Photo => &mut self.photo_url,
            DocumentKind::PolicyDocument => &mut self.policy_document_url,
        };
        *slot = Some(url);
    }
}

/// Documents that can be attached to a client at creation time.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    PanCard,
    AadharCard,
    Photo,
    PolicyDocument,
}

impl DocumentKind {
    /// Name of the multipart field carrying this document.
    pub fn field_name(self) -> &'static str {
        match self {
            DocumentKind::PanCard => "pan_card",
            DocumentKind::AadharCard => "aadhar_card",
            DocumentKind::Photo => "photo",
            DocumentKind::PolicyDocument => "policy_document",
        }
    }
}

/// File submitted for one of the document slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentUpload {
    pub kind: DocumentKind,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientRecord {
    pub id: ClientId,
    pub customer_type: CustomerType,
    pub product: ProductName,
    pub insurance_provider: InsuranceProvider,
    pub client_name: ClientName,
    pub mobile_number: MobileNumber,
    #[serde(flatten)]
    pub details: ClientDetails,
    pub sales_rep_id: SalesRepId,
    pub created_at: NaiveDateTime,
}

/// Validated client ready to be inserted. The creation timestamp is stamped by
/// the repository at insert time.
#[derive(Clone, Debug, PartialEq)]
pub struct NewClientRecord {
    pub id: ClientId,
    pub customer_type: CustomerType,
    pub product: ProductName,
    pub insurance_provider: InsuranceProvider,
    pub client_name: ClientName,
    pub mobile_number: MobileNumber,
    pub details: ClientDetails,
    pub sales_rep_id: SalesRepId,
}
