//! Modelos de la sección E-Rickshaw
//!
//! RC books, facturas de venta, órdenes de venta y préstamos.

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

// ---------------------------------------------------------------------------
// RC Book
// ---------------------------------------------------------------------------

/// RC book (certificado de registro) de un vehículo vendido
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RcBook {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub customer_name: String,
    pub mobile_no: String,
    pub chassis_no: String,
    pub motor_no: String,
    pub registration_no: String,
    #[serde(with = "iso_date")]
    pub rc_received_date: Option<DateTime<Utc>>,
    pub remarks: String,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct RcBookDraft {
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub mobile_no: String,
    #[validate(length(min = 1))]
    pub chassis_no: String,
    pub motor_no: String,
    pub registration_no: String,
    pub rc_received_date: String,
    pub remarks: String,
}

pub struct RcBookResource;

impl Entity for RcBookResource {
    type Record = RcBook;
    type Draft = RcBookDraft;

    const RESOURCE: &'static str = "/rickshaw/rcbook";
    const LABEL: &'static str = "RC Book";
    const COLUMNS: &'static [&'static str] = &[
        "Customer",
        "Mobile",
        "Chassis No",
        "Registration No",
        "RC Received",
    ];

    fn record_id(record: &RcBook) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &RcBook) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &RcBook) -> Vec<&str> {
        vec![record.customer_name.as_str(), record.chassis_no.as_str(), record.registration_no.as_str()]
    }

    fn row(record: &RcBook) -> Vec<String> {
        vec![
            record.customer_name.clone(),
            record.mobile_no.clone(),
            record.chassis_no.clone(),
            record.registration_no.clone(),
            date_input(record.rc_received_date.as_ref()),
        ]
    }

    fn to_draft(record: &RcBook) -> RcBookDraft {
        RcBookDraft {
            customer_name: record.customer_name.clone(),
            mobile_no: record.mobile_no.clone(),
            chassis_no: record.chassis_no.clone(),
            motor_no: record.motor_no.clone(),
            registration_no: record.registration_no.clone(),
            rc_received_date: date_input(record.rc_received_date.as_ref()),
            remarks: record.remarks.clone(),
        }
    }

    fn to_record(draft: &RcBookDraft) -> ClientResult<RcBook> {
        Ok(RcBook {
            customer_name: draft.customer_name.trim().to_string(),
            mobile_no: draft.mobile_no.trim().to_string(),
            chassis_no: draft.chassis_no.trim().to_string(),
            motor_no: draft.motor_no.trim().to_string(),
            registration_no: draft.registration_no.trim().to_string(),
            rc_received_date: parse_date_input("rc_received_date", &draft.rc_received_date)?,
            remarks: draft.remarks.clone(),
            ..RcBook::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Sales Invoice
// ---------------------------------------------------------------------------

/// Factura de venta de un e-rickshaw
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesInvoice {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub invoice_no: String,
    #[serde(with = "iso_date")]
    pub invoice_date: Option<DateTime<Utc>>,
    pub customer_name: String,
    pub mobile_no: String,
    pub chassis_no: String,
    pub model: String,
    #[serde(with = "lenient_decimal")]
    pub amount: Decimal,
    pub payment_mode: String,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SalesInvoiceDraft {
    #[validate(length(min = 1))]
    pub invoice_no: String,
    #[validate(length(min = 1))]
    pub invoice_date: String,
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub mobile_no: String,
    #[validate(length(min = 1))]
    pub chassis_no: String,
    pub model: String,
    #[validate(length(min = 1))]
    pub amount: String,
    pub payment_mode: String,
}

pub struct SalesInvoiceResource;

impl Entity for SalesInvoiceResource {
    type Record = SalesInvoice;
    type Draft = SalesInvoiceDraft;

    const RESOURCE: &'static str = "/rickshaw/salesinv";
    const LABEL: &'static str = "Sales Invoice";
    const COLUMNS: &'static [&'static str] =
        &["Invoice No", "Date", "Customer", "Chassis No", "Model", "Amount"];

    fn record_id(record: &SalesInvoice) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &SalesInvoice) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &SalesInvoice) -> Vec<&str> {
        vec![record.invoice_no.as_str(), record.customer_name.as_str(), record.chassis_no.as_str()]
    }

    fn row(record: &SalesInvoice) -> Vec<String> {
        vec![
            record.invoice_no.clone(),
            date_input(record.invoice_date.as_ref()),
            record.customer_name.clone(),
            record.chassis_no.clone(),
            record.model.clone(),
            decimal_text(record.amount),
        ]
    }

    fn to_draft(record: &SalesInvoice) -> SalesInvoiceDraft {
        SalesInvoiceDraft {
            invoice_no: record.invoice_no.clone(),
            invoice_date: date_input(record.invoice_date.as_ref()),
            customer_name: record.customer_name.clone(),
            mobile_no: record.mobile_no.clone(),
            chassis_no: record.chassis_no.clone(),
            model: record.model.clone(),
            amount: decimal_text(record.amount),
            payment_mode: record.payment_mode.clone(),
        }
    }

    fn to_record(draft: &SalesInvoiceDraft) -> ClientResult<SalesInvoice> {
        Ok(SalesInvoice {
            invoice_no: draft.invoice_no.trim().to_string(),
            invoice_date: parse_date_input("invoice_date", &draft.invoice_date)?,
            customer_name: draft.customer_name.trim().to_string(),
            mobile_no: draft.mobile_no.trim().to_string(),
            chassis_no: draft.chassis_no.trim().to_string(),
            model: draft.model.trim().to_string(),
            amount: parse_decimal("amount", &draft.amount)?,
            payment_mode: draft.payment_mode.trim().to_string(),
            ..SalesInvoice::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Sales Order
// ---------------------------------------------------------------------------

/// Orden de venta (reserva) de un e-rickshaw
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalesOrder {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub order_no: String,
    #[serde(with = "iso_date")]
    pub order_date: Option<DateTime<Utc>>,
    pub customer_name: String,
    pub mobile_no: String,
    pub model: String,
    pub color: String,
    #[serde(with = "lenient_integer")]
    pub quantity: i64,
    #[serde(with = "lenient_decimal")]
    pub booking_amount: Decimal,
    #[serde(with = "iso_date")]
    pub delivery_date: Option<DateTime<Utc>>,
    pub status: String,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SalesOrderDraft {
    #[validate(length(min = 1))]
    pub order_no: String,
    #[validate(length(min = 1))]
    pub order_date: String,
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub mobile_no: String,
    #[validate(length(min = 1))]
    pub model: String,
    pub color: String,
    pub quantity: String,
    pub booking_amount: String,
    pub delivery_date: String,
    pub status: String,
}

pub struct SalesOrderResource;

impl Entity for SalesOrderResource {
    type Record = SalesOrder;
    type Draft = SalesOrderDraft;

    const RESOURCE: &'static str = "/rickshaw/salesorder";
    const LABEL: &'static str = "Sales Order";
    const COLUMNS: &'static [&'static str] =
        &["Order No", "Date", "Customer", "Model", "Qty", "Booking", "Status"];

    fn record_id(record: &SalesOrder) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &SalesOrder) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &SalesOrder) -> Vec<&str> {
        vec![record.order_no.as_str(), record.customer_name.as_str(), record.model.as_str()]
    }

    fn row(record: &SalesOrder) -> Vec<String> {
        vec![
            record.order_no.clone(),
            date_input(record.order_date.as_ref()),
            record.customer_name.clone(),
            record.model.clone(),
            record.quantity.to_string(),
            decimal_text(record.booking_amount),
            record.status.clone(),
        ]
    }

    fn to_draft(record: &SalesOrder) -> SalesOrderDraft {
        SalesOrderDraft {
            order_no: record.order_no.clone(),
            order_date: date_input(record.order_date.as_ref()),
            customer_name: record.customer_name.clone(),
            mobile_no: record.mobile_no.clone(),
            model: record.model.clone(),
            color: record.color.clone(),
            quantity: record.quantity.to_string(),
            booking_amount: decimal_text(record.booking_amount),
            delivery_date: date_input(record.delivery_date.as_ref()),
            status: record.status.clone(),
        }
    }

    fn to_record(draft: &SalesOrderDraft) -> ClientResult<SalesOrder> {
        Ok(SalesOrder {
            order_no: draft.order_no.trim().to_string(),
            order_date: parse_date_input("order_date", &draft.order_date)?,
            customer_name: draft.customer_name.trim().to_string(),
            mobile_no: draft.mobile_no.trim().to_string(),
            model: draft.model.trim().to_string(),
            color: draft.color.trim().to_string(),
            quantity: parse_integer("quantity", &draft.quantity)?,
            booking_amount: parse_decimal("booking_amount", &draft.booking_amount)?,
            delivery_date: parse_date_input("delivery_date", &draft.delivery_date)?,
            status: draft.status.trim().to_string(),
            ..SalesOrder::default()
        })
    }
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

/// Seguimiento de préstamo de financiación de un vehículo
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Loan {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub customer_name: String,
    pub mobile_no: String,
    pub financer: String,
    pub loan_account_no: String,
    #[serde(with = "lenient_decimal")]
    pub loan_amount: Decimal,
    #[serde(with = "lenient_decimal")]
    pub emi_amount: Decimal,
    #[serde(with = "lenient_integer")]
    pub tenure_months: i64,
    #[serde(with = "iso_date")]
    pub disbursement_date: Option<DateTime<Utc>>,
    pub status: String,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct LoanDraft {
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub mobile_no: String,
    #[validate(length(min = 1))]
    pub financer: String,
    pub loan_account_no: String,
    #[validate(length(min = 1))]
    pub loan_amount: String,
    pub emi_amount: String,
    pub tenure_months: String,
    pub disbursement_date: String,
    pub status: String,
}

pub struct LoanResource;

impl Entity for LoanResource {
    type Record = Loan;
    type Draft = LoanDraft;

    const RESOURCE: &'static str = "/rickshaw/loan";
    const LABEL: &'static str = "Loan";
    const COLUMNS: &'static [&'static str] =
        &["Customer", "Financer", "Account No", "Amount", "EMI", "Tenure", "Status"];

    fn record_id(record: &Loan) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &Loan) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &Loan) -> Vec<&str> {
        vec![record.customer_name.as_str(), record.financer.as_str(), record.loan_account_no.as_str()]
    }

    fn row(record: &Loan) -> Vec<String> {
        vec![
            record.customer_name.clone(),
            record.financer.clone(),
            record.loan_account_no.clone(),
            decimal_text(record.loan_amount),
            decimal_text(record.emi_amount),
            record.tenure_months.to_string(),
            record.status.clone(),
        ]
    }

    fn to_draft(record: &Loan) -> LoanDraft {
        LoanDraft {
            customer_name: record.customer_name.clone(),
            mobile_no: record.mobile_no.clone(),
            financer: record.financer.clone(),
            loan_account_no: record.loan_account_no.clone(),
            loan_amount: decimal_text(record.loan_amount),
            emi_amount: decimal_text(record.emi_amount),
            tenure_months: record.tenure_months.to_string(),
            disbursement_date: date_input(record.disbursement_date.as_ref()),
            status: record.status.clone(),
        }
    }

    fn to_record(draft: &LoanDraft) -> ClientResult<Loan> {
        Ok(Loan {
            customer_name: draft.customer_name.trim().to_string(),
            mobile_no: draft.mobile_no.trim().to_string(),
            financer: draft.financer.trim().to_string(),
            loan_account_no: draft.loan_account_no.trim().to_string(),
            loan_amount: parse_decimal("loan_amount", &draft.loan_amount)?,
            emi_amount: parse_decimal("emi_amount", &draft.emi_amount)?,
            tenure_months: parse_integer("tenure_months", &draft.tenure_months)?,
            disbursement_date: parse_date_input("disbursement_date", &draft.disbursement_date)?,
            status: draft.status.trim().to_string(),
            ..Loan::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_rc_book_edit_converts_dates_and_keeps_fields() {
        let record: RcBook = serde_json::from_value(json!({
            "_id": "665f1c",
            "customerName": "Ravi Kumar",
            "mobileNo": "9876543210",
            "chassisNo": "MA1ER2024X",
            "registrationNo": "",
            "rcReceivedDate": "2024-05-02T10:15:00.000Z",
            "createdAt": "2024-05-01T08:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(RcBookResource::record_id(&record), Some("665f1c"));

        let mut draft = RcBookResource::to_draft(&record);
        assert_eq!(draft.rc_received_date, "2024-05-02");

        draft.registration_no = "UP32 AB 1234".to_string();
        let payload = serde_json::to_value(RcBookResource::to_record(&draft).unwrap()).unwrap();
        assert_eq!(payload["registrationNo"], "UP32 AB 1234");
        assert_eq!(payload["chassisNo"], "MA1ER2024X");
        assert_eq!(payload["rcReceivedDate"], "2024-05-02T00:00:00.000Z");
        assert!(payload.get("_id").is_none());
        assert!(payload.get("createdAt").is_none());
    }

    #[test]
    fn test_invoice_amount_is_sent_as_number() {
        let draft = SalesInvoiceDraft {
            invoice_no: "INV-101".to_string(),
            invoice_date: "2024-06-10".to_string(),
            customer_name: "Asha".to_string(),
            chassis_no: "CH-9".to_string(),
            amount: "125000.50".to_string(),
            ..SalesInvoiceDraft::default()
        };
        let record = SalesInvoiceResource::to_record(&draft).unwrap();
        assert_eq!(
            record.invoice_date,
            Some(Utc.with_ymd_and_hms(2024, 6, 10, 0, 0, 0).unwrap())
        );
        let payload = serde_json::to_value(&record).unwrap();
        assert_eq!(payload["amount"], json!(125000.5));
    }

    #[test]
    fn test_garbage_number_is_rejected() {
        let draft = LoanDraft {
            customer_name: "Asha".to_string(),
            financer: "Shriram".to_string(),
            loan_amount: "lots".to_string(),
            ..LoanDraft::default()
        };
        assert!(LoanResource::to_record(&draft).is_err());
    }

    #[test]
    fn test_sales_order_accepts_numeric_id_alias() {
        let order: SalesOrder = serde_json::from_value(json!({
            "id": "so-1",
            "orderNo": "SO-1",
            "quantity": 2,
            "bookingAmount": 5000
        }))
        .unwrap();
        assert_eq!(order.id.as_deref(), Some("so-1"));
        assert_eq!(order.quantity, 2);
        assert_eq!(decimal_text(order.booking_amount), "5000");
    }
}
