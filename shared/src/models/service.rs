//! Service Model (服务项目)

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of service an appointment books
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    #[serde(rename = "CUT")]
    Cut,
    #[serde(rename = "BEARD")]
    Beard,
    #[serde(rename = "CUT_AND_BEARD")]
    CutAndBeard,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cut => "CUT",
            Self::Beard => "BEARD",
            Self::CutAndBeard => "CUT_AND_BEARD",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CUT" => Some(Self::Cut),
            "BEARD" => Some(Self::Beard),
            "CUT_AND_BEARD" => Some(Self::CutAndBeard),
            _ => None,
        }
    }
}

/// A bookable service as listed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: i64,
    pub kind: ServiceKind,
    pub name: String,
    pub price: Decimal,
    /// Duration in minutes (informational; slots are fixed at 60 minutes)
    pub duration_minutes: i32,
    pub active: bool,
}

/// Create service payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub kind: ServiceKind,
    pub name: String,
    pub price: Decimal,
    pub duration_minutes: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_strings() {
        assert_eq!(ServiceKind::parse("CUT_AND_BEARD"), Some(ServiceKind::CutAndBeard));
        assert_eq!(ServiceKind::parse("cut"), None);
        assert_eq!(
            serde_json::to_string(&ServiceKind::Beard).unwrap(),
            "\"BEARD\""
        );
    }

    #[test]
    fn test_create_payload_accepts_string_price() {
        let payload: ServiceCreate = serde_json::from_str(
            r#"{"kind":"CUT","name":"Corte Infantil","price":"35.00","duration_minutes":45}"#,
        )
        .unwrap();
        assert_eq!(payload.kind, ServiceKind::Cut);
        assert_eq!(payload.price, Decimal::new(3500, 2));
    }

    #[test]
    fn test_price_serializes_as_string() {
        let offering = ServiceOffering {
            id: 1,
            kind: ServiceKind::Cut,
            name: "Corte de Cabelo".into(),
            price: Decimal::from_str("50.00").unwrap(),
            duration_minutes: 60,
            active: true,
        };
        let json = serde_json::to_value(&offering).unwrap();
        assert_eq!(json["price"], "50.00");
        assert_eq!(json["kind"], "CUT");
    }
}
