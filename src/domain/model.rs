use crate::domain::validation::{
    one_of, required_amount, required_text, FieldViolation, ValidationErrors,
};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sending,
    Receiving,
}

impl Direction {
    pub const VALUES: &'static [&'static str] = &["sending", "receiving"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Sending => "sending",
            Direction::Receiving => "receiving",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "sending" => Some(Direction::Sending),
            "receiving" => Some(Direction::Receiving),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated transfer record, as stored in and read back from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountingInfo {
    /// Assigned by the store on creation.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub account_number: String,
    pub account_name: String,
    pub iban: String,
    pub address: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub direction: Direction,
}

/// Untrusted input. Missing fields decode to their zero value so the rule set
/// can report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountingInfoRequest {
    pub account_number: String,
    pub account_name: String,
    pub iban: String,
    pub address: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub direction: String,
}

impl Validate for AccountingInfoRequest {
    type Error = ValidationErrors;

    fn validate(&self) -> Result<(), ValidationErrors> {
        ValidationErrors::from_checks([
            required_text("accountNumber", &self.account_number),
            required_text("accountName", &self.account_name),
            required_text("iban", &self.iban),
            required_text("address", &self.address),
            required_amount("amount", self.amount),
            one_of("direction", &self.direction, Direction::VALUES),
        ])
    }
}

impl AccountingInfoRequest {
    /// Validates the draft and converts it, unchanged, into a storable record.
    pub fn into_record(self) -> Result<AccountingInfo, ValidationErrors> {
        self.validate()?;

        let direction =
            Direction::parse(&self.direction).ok_or(FieldViolation::InvalidEnumValue {
                field: "direction",
                allowed: Direction::VALUES,
            })?;

        Ok(AccountingInfo {
            id: None,
            account_number: self.account_number,
            account_name: self.account_name,
            iban: self.iban,
            address: self.address,
            amount: self.amount,
            direction,
        })
    }
}
