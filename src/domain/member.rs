use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::form::validation::format_date_time;

/// A member of the registry as persisted by the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberRecord {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_start: Option<NaiveDateTime>,
}

impl MemberRecord {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            home_address: None,
            zip: None,
            phone_number: None,
            email: None,
            membership_start: None,
        }
    }

    /// Empty record used as the starting point for `add`.
    pub fn blank() -> Self {
        Self::new("", "")
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Text shown for `field`; absent values render as an empty string.
    pub fn display_value(&self, field: MemberField) -> String {
        match field {
            MemberField::FirstName => self.first_name.clone(),
            MemberField::LastName => self.last_name.clone(),
            MemberField::HomeAddress => self.home_address.clone().unwrap_or_default(),
            MemberField::Zip => self.zip.clone().unwrap_or_default(),
            MemberField::Phone => self.phone_number.clone().unwrap_or_default(),
            MemberField::Email => self.email.clone().unwrap_or_default(),
            MemberField::MembershipStart => self
                .membership_start
                .as_ref()
                .map(format_date_time)
                .unwrap_or_default(),
        }
    }

    /// Fields whose stored values differ between `self` and `other`.
    pub fn changed_fields(&self, other: &MemberRecord) -> Vec<MemberField> {
        MemberField::ALL
            .into_iter()
            .filter(|field| match field {
                MemberField::FirstName => self.first_name != other.first_name,
                MemberField::LastName => self.last_name != other.last_name,
                MemberField::HomeAddress => self.home_address != other.home_address,
                MemberField::Zip => self.zip != other.zip,
                MemberField::Phone => self.phone_number != other.phone_number,
                MemberField::Email => self.email != other.email,
                MemberField::MembershipStart => self.membership_start != other.membership_start,
            })
            .collect()
    }
}

impl Displayable for MemberRecord {
    fn display_label(&self) -> String {
        match self.email.as_deref() {
            Some(email) if !email.is_empty() => format!("{} <{}>", self.full_name(), email),
            _ => self.full_name(),
        }
    }
}

/// Editable member fields in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberField {
    FirstName,
    LastName,
    HomeAddress,
    Zip,
    Phone,
    Email,
    MembershipStart,
}

impl MemberField {
    pub const ALL: [MemberField; 7] = [
        MemberField::FirstName,
        MemberField::LastName,
        MemberField::HomeAddress,
        MemberField::Zip,
        MemberField::Phone,
        MemberField::Email,
        MemberField::MembershipStart,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MemberField::FirstName => "First name",
            MemberField::LastName => "Last name",
            MemberField::HomeAddress => "Home address",
            MemberField::Zip => "ZIP",
            MemberField::Phone => "Phone",
            MemberField::Email => "Email",
            MemberField::MembershipStart => "Membership start",
        }
    }
}
