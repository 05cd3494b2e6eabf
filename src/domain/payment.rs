use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the supplier is paid. Has no effect on pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Pix,
    Card,
    Cash,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pix => write!(f, "pix"),
            Self::Card => write!(f, "card"),
            Self::Cash => write!(f, "cash"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pix" => Ok(Self::Pix),
            "card" => Ok(Self::Card),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentType {
    #[default]
    #[serde(rename = "full")]
    PayInFull,
    #[serde(rename = "installments")]
    Installments,
}

/// Payment terms as entered by the user.
///
/// The installment schedule is kept as the raw comma-separated text and only
/// parsed when installments are generated, so whatever was typed survives a
/// save/load round trip.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfig {
    pub method: PaymentMethod,
    pub r#type: PaymentType,
    #[serde(default)]
    pub installment_schedule: String,
}

impl PaymentConfig {
    pub fn pay_in_full(method: PaymentMethod) -> Self {
        Self {
            method,
            r#type: PaymentType::PayInFull,
            installment_schedule: String::new(),
        }
    }

    pub fn installments(method: PaymentMethod, schedule: impl Into<String>) -> Self {
        Self {
            method,
            r#type: PaymentType::Installments,
            installment_schedule: schedule.into(),
        }
    }

    pub fn schedule(&self) -> InstallmentSchedule {
        InstallmentSchedule::parse(&self.installment_schedule)
    }
}

/// Day offsets from the order date, one per installment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstallmentSchedule(Vec<i64>);

impl InstallmentSchedule {
    /// Parses `"30,60,90"`-style text. Tokens that are not integers count as
    /// a zero-day offset; blank input yields an empty schedule.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        Self(
            raw.split(',')
                .map(|token| token.trim().parse::<i64>().unwrap_or(0))
                .collect(),
        )
    }

    pub fn offsets(&self) -> &[i64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    /// 1-based position in the schedule.
    pub number: usize,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}
