//! Modelos de la sección Battery: ventas y servicio de baterías

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;
use crate::utils::errors::ClientResult;
use crate::utils::forms::{
    date_input, decimal_text, iso_date, lenient_decimal, lenient_integer, parse_date_input,
    parse_decimal, parse_integer,
};

/// Venta de batería
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatterySale {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub invoice_no: String,
    #[serde(with = "iso_date")]
    pub sale_date: Option<DateTime<Utc>>,
    pub customer_name: String,
    pub mobile_no: String,
    pub battery_type: String,
    pub battery_serial_no: String,
    #[serde(with = "lenient_integer")]
    pub warranty_months: i64,
    #[serde(with = "lenient_decimal")]
    pub amount: Decimal,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct BatterySaleDraft {
    #[validate(length(min = 1))]
    pub invoice_no: String,
    #[validate(length(min = 1))]
    pub sale_date: String,
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub mobile_no: String,
    #[validate(length(min = 1))]
    pub battery_type: String,
    #[validate(length(min = 1))]
    pub battery_serial_no: String,
    pub warranty_months: String,
    #[validate(length(min = 1))]
    pub amount: String,
}

pub struct BatterySaleResource;

impl Entity for BatterySaleResource {
    type Record = BatterySale;
    type Draft = BatterySaleDraft;

    const RESOURCE: &'static str = "/battery/sales";
    const LABEL: &'static str = "Battery Sale";
    const COLUMNS: &'static [&'static str] =
        &["Invoice No", "Date", "Customer", "Type", "Serial No", "Warranty", "Amount"];

    fn record_id(record: &BatterySale) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &BatterySale) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &BatterySale) -> Vec<&str> {
        vec![
            record.customer_name.as_str(),
            record.battery_serial_no.as_str(),
            record.invoice_no.as_str(),
        ]
    }

    fn row(record: &BatterySale) -> Vec<String> {
        vec![
            record.invoice_no.clone(),
            date_input(record.sale_date.as_ref()),
            record.customer_name.clone(),
            record.battery_type.clone(),
            record.battery_serial_no.clone(),
            format!("{} m", record.warranty_months),
            decimal_text(record.amount),
        ]
    }

    fn to_draft(record: &BatterySale) -> BatterySaleDraft {
        BatterySaleDraft {
            invoice_no: record.invoice_no.clone(),
            sale_date: date_input(record.sale_date.as_ref()),
            customer_name: record.customer_name.clone(),
            mobile_no: record.mobile_no.clone(),
            battery_type: record.battery_type.clone(),
            battery_serial_no: record.battery_serial_no.clone(),
            warranty_months: record.warranty_months.to_string(),
            amount: decimal_text(record.amount),
        }
    }

    fn to_record(draft: &BatterySaleDraft) -> ClientResult<BatterySale> {
        Ok(BatterySale {
            invoice_no: draft.invoice_no.trim().to_string(),
            sale_date: parse_date_input("sale_date", &draft.sale_date)?,
            customer_name: draft.customer_name.trim().to_string(),
            mobile_no: draft.mobile_no.trim().to_string(),
            battery_type: draft.battery_type.trim().to_string(),
            battery_serial_no: draft.battery_serial_no.trim().to_string(),
            warranty_months: parse_integer("warranty_months", &draft.warranty_months)?,
            amount: parse_decimal("amount", &draft.amount)?,
            ..BatterySale::default()
        })
    }
}

/// Servicio/garantía de batería recibida en taller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BatteryService {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub customer_name: String,
    pub mobile_no: String,
    pub battery_serial_no: String,
    pub complaint: String,
    #[serde(with = "iso_date")]
    pub received_date: Option<DateTime<Utc>>,
    #[serde(with = "lenient_decimal")]
    pub service_charge: Decimal,
    pub status: String,
    #[serde(with = "iso_date")]
    pub delivered_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct BatteryServiceDraft {
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub mobile_no: String,
    #[validate(length(min = 1))]
    pub battery_serial_no: String,
    #[validate(length(min = 1))]
    pub complaint: String,
    #[validate(length(min = 1))]
    pub received_date: String,
    pub service_charge: String,
    pub status: String,
    pub delivered_date: String,
}

pub struct BatteryServiceResource;

impl Entity for BatteryServiceResource {
    type Record = BatteryService;
    type Draft = BatteryServiceDraft;

    const RESOURCE: &'static str = "/battery/service";
    const LABEL: &'static str = "Battery Service";
    const COLUMNS: &'static [&'static str] =
        &["Customer", "Serial No", "Complaint", "Received", "Charge", "Status"];

    fn record_id(record: &BatteryService) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &BatteryService) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &BatteryService) -> Vec<&str> {
        vec![
            record.customer_name.as_str(),
            record.battery_serial_no.as_str(),
            record.complaint.as_str(),
        ]
    }

    fn row(record: &BatteryService) -> Vec<String> {
        vec![
            record.customer_name.clone(),
            record.battery_serial_no.clone(),
            record.complaint.clone(),
            date_input(record.received_date.as_ref()),
            decimal_text(record.service_charge),
            record.status.clone(),
        ]
    }

    fn to_draft(record: &BatteryService) -> BatteryServiceDraft {
        BatteryServiceDraft {
            customer_name: record.customer_name.clone(),
            mobile_no: record.mobile_no.clone(),
            battery_serial_no: record.battery_serial_no.clone(),
            complaint: record.complaint.clone(),
            received_date: date_input(record.received_date.as_ref()),
            service_charge: decimal_text(record.service_charge),
            status: record.status.clone(),
            delivered_date: date_input(record.delivered_date.as_ref()),
        }
    }

    fn to_record(draft: &BatteryServiceDraft) -> ClientResult<BatteryService> {
        Ok(BatteryService {
            customer_name: draft.customer_name.trim().to_string(),
            mobile_no: draft.mobile_no.trim().to_string(),
            battery_serial_no: draft.battery_serial_no.trim().to_string(),
            complaint: draft.complaint.trim().to_string(),
            received_date: parse_date_input("received_date", &draft.received_date)?,
            service_charge: parse_decimal("service_charge", &draft.service_charge)?,
            status: draft.status.trim().to_string(),
            delivered_date: parse_date_input("delivered_date", &draft.delivered_date)?,
            ..BatteryService::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_required_fields() {
        let draft = BatterySaleDraft {
            invoice_no: "B-1".to_string(),
            sale_date: "2024-01-15".to_string(),
            ..BatterySaleDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("customer_name"));
        assert!(fields.contains_key("battery_serial_no"));
        assert!(fields.contains_key("amount"));
        assert!(!fields.contains_key("mobile_no"));
    }

    #[test]
    fn test_service_without_delivery_date_sends_null() {
        let draft = BatteryServiceDraft {
            customer_name: "Mohan".to_string(),
            battery_serial_no: "EX-778".to_string(),
            complaint: "Not charging".to_string(),
            received_date: "2024-02-01".to_string(),
            ..BatteryServiceDraft::default()
        };
        let payload = serde_json::to_value(BatteryServiceResource::to_record(&draft).unwrap()).unwrap();
        assert!(payload["deliveredDate"].is_null());
        assert_eq!(payload["receivedDate"], "2024-02-01T00:00:00.000Z");
        assert_eq!(payload["serviceCharge"], serde_json::json!(0.0));
    }
}
