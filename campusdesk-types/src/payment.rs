use crate::StudentId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a fee payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    Upi,
    Cheque,
    Online,
}

impl PaymentMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Card => "Card",
            Self::BankTransfer => "Bank Transfer",
            Self::Upi => "UPI",
            Self::Cheque => "Cheque",
            Self::Online => "Online",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "cash" => Ok(Self::Cash),
            "card" | "creditcard" | "debitcard" => Ok(Self::Card),
            "banktransfer" | "bank" | "neft" => Ok(Self::BankTransfer),
            "upi" => Ok(Self::Upi),
            "cheque" | "check" => Ok(Self::Cheque),
            "online" => Ok(Self::Online),
            _ => Err(crate::Error::UnknownVariant {
                kind: "payment method",
                value: s.to_string(),
            }),
        }
    }
}

/// A recorded fee payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: String,
    pub student_id: StudentId,
    /// Positive amount in whole currency units.
    pub amount: i64,
    pub method: PaymentMethod,
    pub date: NaiveDate,
    pub receipt_number: String,
    pub collected_by: String,
}
