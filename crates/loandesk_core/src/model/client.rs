//! Client (lead) domain model.
//!
//! # Responsibility
//! - Define the lead/client record that moves through the loan pipeline.
//! - Carry loan amounts and borrower profile data as nested documents.
//!
//! # Invariants
//! - `name` is never blank.
//! - `contact_date` is a calendar date without a time component.
//! - Loan amounts are whole currency units and never negative.

use crate::model::validation::{require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Pipeline stage of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientStatus {
    Lead,
    #[serde(rename = "Follow-up")]
    FollowUp,
    Approved,
    Active,
    Rejected,
}

impl ClientStatus {
    pub const ALL: [ClientStatus; 5] = [
        Self::Lead,
        Self::FollowUp,
        Self::Approved,
        Self::Active,
        Self::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::FollowUp => "Follow-up",
            Self::Approved => "Approved",
            Self::Active => "Active",
            Self::Rejected => "Rejected",
        }
    }
}

impl Display for ClientStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lender-side processing state of the loan application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Verification,
    Sanctioned,
    Disbursed,
}

/// Investment risk appetite captured during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RiskProfile {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

/// Requested, approved and disbursed amounts for one loan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDetails {
    pub requested_amount: u64,
    pub approved_amount: u64,
    pub disbursed_amount: u64,
    pub approval_date: Option<NaiveDate>,
}

/// Borrower profile data collected by agents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralInformation {
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub occupation: Option<String>,
    pub monthly_income: Option<u64>,
}

/// One existing holding listed in the client's portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub name: String,
    pub value: u64,
}

/// Canonical client record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub loan_type: String,
    pub lead_source: String,
    /// User id of the owning agent. `None` means unassigned.
    pub assigned_to: Option<String>,
    pub created_by: String,
    pub contact_date: NaiveDate,
    /// Next date the owner should reach out, used by follow-up reminders.
    pub follow_up_date: Option<NaiveDate>,
    pub risk_profile: RiskProfile,
    pub financial_goals: Vec<String>,
    pub portfolio: Vec<Holding>,
    pub loan_details: LoanDetails,
    pub application_status: ApplicationStatus,
    pub general_information: GeneralInformation,
}

/// Caller input for creating a client. Defaults are filled by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub loan_type: String,
    pub lead_source: String,
    pub requested_amount: u64,
    pub assigned_to: Option<String>,
    pub follow_up_date: Option<NaiveDate>,
    pub general_information: GeneralInformation,
}

impl Client {
    /// Validates record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.id, "client id")?;
        require_text(&self.name, "client name")?;
        Ok(())
    }

    /// Returns whether the client is owned by the given user.
    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_to.as_deref() == Some(user_id)
    }
}
