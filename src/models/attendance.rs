use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::Entity;
use crate::utils::errors::ClientResult;
use crate::utils::forms::{date_input, iso_date, parse_date_input};

/// Registro de asistencia diaria de un empleado
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attendance {
    #[serde(rename = "_id", alias = "id", skip_serializing)]
    pub id: Option<String>,
    pub employee_name: String,
    #[serde(with = "iso_date")]
    pub date: Option<DateTime<Utc>>,
    pub status: String,
    pub check_in: String,
    pub check_out: String,
    pub remarks: String,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing, deserialize_with = "iso_date::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct AttendanceDraft {
    #[validate(length(min = 1))]
    pub employee_name: String,
    #[validate(length(min = 1))]
    pub date: String,
    #[validate(length(min = 1))]
    pub status: String,
    pub check_in: String,
    pub check_out: String,
    pub remarks: String,
}

impl Default for AttendanceDraft {
    fn default() -> Self {
        Self {
            employee_name: String::new(),
            date: String::new(),
            status: "Present".to_string(),
            check_in: String::new(),
            check_out: String::new(),
            remarks: String::new(),
        }
    }
}

pub struct AttendanceResource;

impl Entity for AttendanceResource {
    type Record = Attendance;
    type Draft = AttendanceDraft;

    const RESOURCE: &'static str = "/attendance";
    const LABEL: &'static str = "Attendance";
    const COLUMNS: &'static [&'static str] = &["Employee", "Date", "Status", "In", "Out"];

    fn record_id(record: &Attendance) -> Option<&str> {
        record.id.as_deref()
    }

    fn created_at(record: &Attendance) -> Option<DateTime<Utc>> {
        record.created_at
    }

    fn search_fields(record: &Attendance) -> Vec<&str> {
        vec![record.employee_name.as_str(), record.status.as_str()]
    }

    fn row(record: &Attendance) -> Vec<String> {
        vec![
            record.employee_name.clone(),
            date_input(record.date.as_ref()),
            record.status.clone(),
            record.check_in.clone(),
            record.check_out.clone(),
        ]
    }

    fn to_draft(record: &Attendance) -> AttendanceDraft {
        AttendanceDraft {
            employee_name: record.employee_name.clone(),
            date: date_input(record.date.as_ref()),
            status: record.status.clone(),
            check_in: record.check_in.clone(),
            check_out: record.check_out.clone(),
            remarks: record.remarks.clone(),
        }
    }

    fn to_record(draft: &AttendanceDraft) -> ClientResult<Attendance> {
        Ok(Attendance {
            employee_name: draft.employee_name.trim().to_string(),
            date: parse_date_input("date", &draft.date)?,
            status: draft.status.trim().to_string(),
            check_in: draft.check_in.trim().to_string(),
            check_out: draft.check_out.trim().to_string(),
            remarks: draft.remarks.clone(),
            ..Attendance::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter_records;
    use serde_json::json;

    #[test]
    fn test_new_draft_defaults_to_present() {
        let draft = AttendanceDraft::default();
        assert_eq!(draft.status, "Present");
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_record_payload_uses_iso_date() {
        let draft = AttendanceDraft {
            employee_name: " Ravi ".to_string(),
            date: "2024-03-05".to_string(),
            check_in: "09:30".to_string(),
            ..AttendanceDraft::default()
        };
        let record = AttendanceResource::to_record(&draft).unwrap();
        let body = serde_json::to_value(&record).unwrap();
        assert_eq!(body["employeeName"], "Ravi");
        assert_eq!(body["date"], "2024-03-05T00:00:00.000Z");
        assert_eq!(body["status"], "Present");
        assert!(body.get("_id").is_none());
    }

    #[test]
    fn test_search_by_status() {
        let records: Vec<Attendance> = serde_json::from_value(json!([
            {"_id": "1", "employeeName": "Ravi", "status": "Present"},
            {"_id": "2", "employeeName": "Sita", "status": "Absent"}
        ]))
        .unwrap();
        let found = filter_records::<AttendanceResource>(&records, "absent");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].employee_name, "Sita");
    }
}
