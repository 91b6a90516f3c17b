use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(BillId);
id_newtype!(FileId);

/// VAT percentage applied when the form value does not parse.
pub const DEFAULT_VAT_PCT: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseType {
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Restaurants et bars")]
    RestaurantsAndBars,
    #[serde(rename = "Hôtel et logement")]
    HotelAndLodging,
    #[serde(rename = "Services en ligne")]
    OnlineServices,
    #[serde(rename = "IT et électronique")]
    ItAndElectronics,
    #[serde(rename = "Equipement et matériel")]
    EquipmentAndHardware,
    #[serde(rename = "Fournitures de bureau")]
    OfficeSupplies,
}

impl ExpenseType {
    pub const ALL: [ExpenseType; 7] = [
        ExpenseType::Transport,
        ExpenseType::RestaurantsAndBars,
        ExpenseType::HotelAndLodging,
        ExpenseType::OnlineServices,
        ExpenseType::ItAndElectronics,
        ExpenseType::EquipmentAndHardware,
        ExpenseType::OfficeSupplies,
    ];

    /// Label as shown in the expense-type selector and stored on the wire.
    pub fn label(self) -> &'static str {
        match self {
            ExpenseType::Transport => "Transport",
            ExpenseType::RestaurantsAndBars => "Restaurants et bars",
            ExpenseType::HotelAndLodging => "Hôtel et logement",
            ExpenseType::OnlineServices => "Services en ligne",
            ExpenseType::ItAndElectronics => "IT et électronique",
            ExpenseType::EquipmentAndHardware => "Equipement et matériel",
            ExpenseType::OfficeSupplies => "Fournitures de bureau",
        }
    }
}

impl fmt::Display for ExpenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown expense type '{0}'")]
pub struct UnknownExpenseType(pub String);

impl FromStr for ExpenseType {
    type Err = UnknownExpenseType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        ExpenseType::ALL
            .into_iter()
            .find(|kind| kind.label() == value)
            .ok_or_else(|| UnknownExpenseType(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Employee,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BillId>,
    pub email: String,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub name: String,
    pub date: String,
    pub amount: i64,
    #[serde(default)]
    pub vat: String,
    pub pct: i64,
    #[serde(default)]
    pub commentary: String,
    pub file_url: String,
    pub file_name: String,
    #[serde(default)]
    pub status: BillStatus,
}
