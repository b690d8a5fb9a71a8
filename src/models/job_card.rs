//! Job card de taller y cálculo de totales derivados
//!
//! Los campos `total` y `grand_total` nunca se editan directamente: se
//! recalculan cada vez que cambia la cantidad, el precio unitario (MSP) o la
//! mano de obra, y se envían tal cual al backend.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

use super::Entity;
use crate::utils::errors::ClientResult;
use crate::utils::forms::{
    date_input, decimal_or_zero, decimal_text, integer_or_zero, iso_date, lenient_decimal,
    lenient_integer, parse_date_input,
};

/// Totales derivados de una job card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobCardTotals {
    pub line_total: Decimal,
    pub grand_total: Decimal,
}

impl JobCardTotals {
    /// `line_total = quantity × msp`, `grand_total = line_total + labour`
    ///
    /// Los valores negativos se tratan como cero. Si el resultado no cabe en
    /// un `Decimal` se satura en `Decimal::MAX`.
    pub fn compute(quantity: i64, msp: Decimal, labour_charges: Decimal) -> Self {
        let quantity = Decimal::from(quantity.max(0));
        let msp = msp.max(Decimal::ZERO);
        let labour_charges = labour_charges.max(Decimal::ZERO);

        let line_total = quantity.checked_mul(msp).unwrap_or_else(|| {
            warn!("⚠️ Total de línea fuera de rango ({} × {}), se satura", quantity, msp);
            Decimal::MAX
        });
        let grand_total = line_total.checked_add(labour_charges).unwrap_or_else(|| {
            warn!("⚠️ Total general fuera de rango, se satura");
            Decimal::MAX
        });
        Self {
            line_total,
            grand_total,
        }
    }

    /// Recalcular a partir del texto de los inputs; vacío o inválido es cero
    pub fn from_inputs(quantity: &str, msp: &str, labour_charges: &str) -> Self {
        Self::compute(
            integer_or_zero(quantity),
            decimal_or_zero(msp),
            decimal_or_zero(labour_charges),
        )
    }
}

/// Job card tal como la guarda el backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobCard {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub job_card_no: String,
    #[serde(with = "iso_date")]
    pub job_date: Option<DateTime<Utc>>,
    pub customer_name: String,
    pub mobile_no: String,
    pub vehicle_no: String,
    pub part_name: String,
    #[serde(with = "lenient_integer")]
    pub quantity: i64,
    #[serde(with = "lenient_decimal")]
    pub msp: Decimal,
    #[serde(with = "lenient_decimal")]
    pub total: Decimal,
    #[serde(with = "lenient_decimal")]
    pub labour_charges: Decimal,
    #[serde(with = "lenient_decimal")]
    pub grand_total: Decimal,
    pub mechanic: String,
    pub status: String,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Borrador de job card
///
/// Los inputs numéricos se modifican sólo con los setters, que mantienen
/// los totales derivados al día.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct JobCardDraft {
    #[validate(length(min = 1))]
    pub job_card_no: String,
    #[validate(length(min = 1))]
    pub job_date: String,
    #[validate(length(min = 1))]
    pub customer_name: String,
    pub mobile_no: String,
    #[validate(length(min = 1))]
    pub vehicle_no: String,
    pub part_name: String,
    pub mechanic: String,
    pub status: String,
    quantity: String,
    msp: String,
    labour_charges: String,
    totals: JobCardTotals,
}

impl JobCardDraft {
    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    pub fn msp(&self) -> &str {
        &self.msp
    }

    pub fn labour_charges(&self) -> &str {
        &self.labour_charges
    }

    pub fn set_quantity(&mut self, value: impl Into<String>) {
        self.quantity = value.into();
        self.recompute();
    }

    pub fn set_msp(&mut self, value: impl Into<String>) {
        self.msp = value.into();
        self.recompute();
    }

    pub fn set_labour_charges(&mut self, value: impl Into<String>) {
        self.labour_charges = value.into();
        self.recompute();
    }

    pub fn totals(&self) -> JobCardTotals {
        self.totals
    }

    pub fn line_total(&self) -> Decimal {
        self.totals.line_total
    }

    pub fn grand_total(&self) -> Decimal {
        self.totals.grand_total
    }

    fn recompute(&mut self) {
        self.totals = JobCardTotals::from_inputs(&self.quantity, &self.msp, &self.labour_charges);
    }
}

pub struct JobCardResource;

impl Entity for JobCardResource {
    type Record = JobCard;
    type Draft = JobCardDraft;

    const RESOURCE: &'static str = "/spares/jobcard";
    const LABEL: &'static str = "Job Card";
    const COLUMNS: &'static [&'static str] = &[
        "Job Card No",
        "Date",
        "Customer",
        "Vehicle No",
        "Part",
        "Qty",
        "MSP",
        "Labour",
        "Grand Total",
    ];

    fn record_id(record: &JobCard) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &JobCard) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &JobCard) -> Vec<&str> {
        vec![
            record.job_card_no.as_str(),
            record.customer_name.as_str(),
            record.vehicle_no.as_str(),
        ]
    }

    fn row(record: &JobCard) -> Vec<String> {
        vec![
            record.job_card_no.clone(),
            date_input(record.job_date.as_ref()),
            record.customer_name.clone(),
            record.vehicle_no.clone(),
            record.part_name.clone(),
            record.quantity.to_string(),
            decimal_text(record.msp),
            decimal_text(record.labour_charges),
            decimal_text(record.grand_total),
        ]
    }

    fn to_draft(record: &JobCard) -> JobCardDraft {
        let mut draft = JobCardDraft {
            job_card_no: record.job_card_no.clone(),
            job_date: date_input(record.job_date.as_ref()),
            customer_name: record.customer_name.clone(),
            mobile_no: record.mobile_no.clone(),
            vehicle_no: record.vehicle_no.clone(),
            part_name: record.part_name.clone(),
            mechanic: record.mechanic.clone(),
            status: record.status.clone(),
            quantity: record.quantity.to_string(),
            msp: decimal_text(record.msp),
            labour_charges: decimal_text(record.labour_charges),
            totals: JobCardTotals::default(),
        };
        // lo guardado puede estar desfasado; el formulario muestra el valor recalculado
        draft.recompute();
        draft
    }

    fn to_record(draft: &JobCardDraft) -> ClientResult<JobCard> {
        let totals = draft.totals();
        Ok(JobCard {
            job_card_no: draft.job_card_no.trim().to_string(),
            job_date: parse_date_input("job_date", &draft.job_date)?,
            customer_name: draft.customer_name.trim().to_string(),
            mobile_no: draft.mobile_no.trim().to_string(),
            vehicle_no: draft.vehicle_no.trim().to_string(),
            part_name: draft.part_name.trim().to_string(),
            quantity: integer_or_zero(&draft.quantity).max(0),
            msp: decimal_or_zero(&draft.msp).max(Decimal::ZERO),
            total: totals.line_total,
            labour_charges: decimal_or_zero(&draft.labour_charges).max(Decimal::ZERO),
            grand_total: totals.grand_total,
            mechanic: draft.mechanic.trim().to_string(),
            status: draft.status.trim().to_string(),
            ..JobCard::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn test_totals_follow_every_input_change() {
        let mut draft = JobCardDraft::default();
        assert_eq!(draft.grand_total(), Decimal::ZERO);

        draft.set_quantity("3");
        assert_eq!(draft.line_total(), Decimal::ZERO);

        draft.set_msp("150.00");
        assert_eq!(draft.line_total(), dec("450"));
        assert_eq!(draft.grand_total(), dec("450"));

        draft.set_labour_charges("50.00");
        assert_eq!(draft.grand_total(), dec("500"));

        draft.set_quantity("");
        assert_eq!(draft.line_total(), Decimal::ZERO);
        assert_eq!(draft.grand_total(), dec("50"));

        draft.set_quantity("2");
        draft.set_labour_charges("abc");
        assert_eq!(draft.line_total(), dec("300"));
        assert_eq!(draft.grand_total(), dec("300"));
    }

    #[test]
    fn test_totals_invariant_over_many_inputs() {
        let quantities = ["", "0", "1", "7", "x", "-2"];
        let prices = ["", "0.5", "99.99", "150", "n/a"];
        let labours = ["", "0", "25.25", "-10"];

        for q in quantities {
            for p in prices {
                for l in labours {
                    let totals = JobCardTotals::from_inputs(q, p, l);
                    let qty = Decimal::from(integer_or_zero(q).max(0));
                    let price = decimal_or_zero(p).max(Decimal::ZERO);
                    let labour = decimal_or_zero(l).max(Decimal::ZERO);
                    assert_eq!(totals.line_total, qty * price);
                    assert_eq!(totals.grand_total, totals.line_total + labour);
                }
            }
        }
    }

    #[test]
    fn test_submitted_payload_carries_derived_values() {
        let mut draft = JobCardDraft {
            job_card_no: "JC-0042".to_string(),
            job_date: "2024-07-01".to_string(),
            customer_name: "Suresh".to_string(),
            vehicle_no: "UP32 ER 0042".to_string(),
            ..JobCardDraft::default()
        };
        draft.set_quantity("3");
        draft.set_msp("150.00");
        draft.set_labour_charges("50.00");

        let payload = serde_json::to_value(JobCardResource::to_record(&draft).unwrap()).unwrap();
        assert_eq!(payload["quantity"], json!(3));
        assert_eq!(payload["msp"], json!(150.0));
        assert_eq!(payload["total"], json!(450.0));
        assert_eq!(payload["labourCharges"], json!(50.0));
        assert_eq!(payload["grandTotal"], json!(500.0));
    }

    #[test]
    fn test_extreme_inputs_saturate_instead_of_overflowing() {
        let mut draft = JobCardDraft::default();
        draft.set_quantity("9223372036854775807");
        draft.set_msp("79228162514264337593543950335");
        assert_eq!(draft.line_total(), Decimal::MAX);
        assert_eq!(draft.grand_total(), Decimal::MAX);

        let mut draft = JobCardDraft::default();
        draft.set_quantity("1");
        draft.set_msp(&Decimal::MAX.to_string());
        draft.set_labour_charges("1");
        assert_eq!(draft.line_total(), Decimal::MAX);
        assert_eq!(draft.grand_total(), Decimal::MAX);

        // fuera del rango de i64 / Decimal el texto cuenta como cero
        draft.set_quantity("99999999999999999999999");
        assert_eq!(draft.line_total(), Decimal::ZERO);
        assert_eq!(draft.grand_total(), Decimal::ONE);
    }

    #[test]
    fn test_stored_row_with_loose_numbers() {
        let stored: JobCard = serde_json::from_value(json!({
            "_id": "jc2",
            "quantity": "4",
            "msp": null,
            "labourCharges": 12.5,
            "grandTotal": ""
        }))
        .unwrap();
        assert_eq!(stored.quantity, 4);
        assert_eq!(stored.msp, Decimal::ZERO);
        assert_eq!(stored.labour_charges, dec("12.5"));
        assert_eq!(stored.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_edit_recomputes_stale_stored_totals() {
        let stored: JobCard = serde_json::from_value(json!({
            "_id": "jc1",
            "jobCardNo": "JC-1",
            "quantity": 2,
            "msp": 100,
            "total": 999,
            "labourCharges": 20,
            "grandTotal": 999
        }))
        .unwrap();
        let draft = JobCardResource::to_draft(&stored);
        assert_eq!(draft.quantity(), "2");
        assert_eq!(draft.line_total(), dec("200"));
        assert_eq!(draft.grand_total(), dec("220"));
    }
}
