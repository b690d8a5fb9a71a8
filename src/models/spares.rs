//! Inventario de repuestos

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;
use crate::utils::errors::ClientResult;
use crate::utils::forms::{
    decimal_text, iso_date, lenient_decimal, lenient_integer, parse_decimal, parse_integer,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SparePart {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub part_no: String,
    pub part_name: String,
    pub category: String,
    #[serde(with = "lenient_integer")]
    pub quantity: i64,
    #[serde(with = "lenient_decimal")]
    pub unit_price: Decimal,
    #[serde(with = "lenient_integer")]
    pub reorder_level: i64,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SparePart {
    /// Stock en o por debajo del nivel de reposición
    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }
}

#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct SparePartDraft {
    #[validate(length(min = 1))]
    pub part_no: String,
    #[validate(length(min = 1))]
    pub part_name: String,
    pub category: String,
    pub quantity: String,
    pub unit_price: String,
    pub reorder_level: String,
}

pub struct SparesInventoryResource;

impl Entity for SparesInventoryResource {
    type Record = SparePart;
    type Draft = SparePartDraft;

    const RESOURCE: &'static str = "/spares/inventory";
    const LABEL: &'static str = "Spares Inventory";
    const COLUMNS: &'static [&'static str] =
        &["Part No", "Part Name", "Category", "Qty", "Unit Price", "Reorder"];

    fn record_id(record: &SparePart) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &SparePart) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &SparePart) -> Vec<&str> {
        vec![record.part_no.as_str(), record.part_name.as_str()]
    }

    fn row(record: &SparePart) -> Vec<String> {
        vec![
            record.part_no.clone(),
            record.part_name.clone(),
            record.category.clone(),
            record.quantity.to_string(),
            decimal_text(record.unit_price),
            if record.needs_reorder() { "yes".to_string() } else { String::new() },
        ]
    }

    fn to_draft(record: &SparePart) -> SparePartDraft {
        SparePartDraft {
            part_no: record.part_no.clone(),
            part_name: record.part_name.clone(),
            category: record.category.clone(),
            quantity: record.quantity.to_string(),
            unit_price: decimal_text(record.unit_price),
            reorder_level: record.reorder_level.to_string(),
        }
    }

    fn to_record(draft: &SparePartDraft) -> ClientResult<SparePart> {
        Ok(SparePart {
            part_no: draft.part_no.trim().to_string(),
            part_name: draft.part_name.trim().to_string(),
            category: draft.category.trim().to_string(),
            quantity: parse_integer("quantity", &draft.quantity)?,
            unit_price: parse_decimal("unit_price", &draft.unit_price)?,
            reorder_level: parse_integer("reorder_level", &draft.reorder_level)?,
            ..SparePart::default()
        })
    }
}
