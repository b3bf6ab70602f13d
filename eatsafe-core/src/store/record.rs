use std::fmt::Display;

use chrono::{DateTime, Utc};
use rusqlite::{Row, ToSql, params};

use crate::{
    Comment, ComplianceCategory, ComplianceDescription, ComplianceResult, Facility,
    FacilityCategory, FacilityCoordinate, Inspection, Question, RiskLevel, Validate,
};

/// Mapping between an entity and its SQLite table.
///
/// `COLUMNS` lists every stored column with the key first; [`values`]
/// returns parameters in the same order. The generic CRUD methods on
/// [`SqliteFacilityStore`](super::SqliteFacilityStore) build their SQL from
/// these constants, so filters can only name columns listed here.
///
/// [`values`]: Record::values
pub trait Record: Validate + Sized {
    /// Type of the primary key.
    type Key: ToSql + Display + ?Sized;

    /// Table holding the rows.
    const TABLE: &'static str;

    /// Stored columns, key first.
    const COLUMNS: &'static [&'static str];

    /// `ORDER BY` clause used by listings.
    const ORDER_BY: &'static str = "id ASC";

    /// Decode a row selected with [`COLUMNS`](Record::COLUMNS).
    ///
    /// # Errors
    /// Propagates type conversion failures from `rusqlite`.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Column values in [`COLUMNS`](Record::COLUMNS) order.
    fn values(&self) -> Vec<&dyn ToSql>;

    /// Primary key of this row.
    fn key(&self) -> &Self::Key;

    /// Called before insertion with the current time.
    fn stamp_created(&mut self, _now: DateTime<Utc>) {}

    /// Called before every update with the current time.
    fn stamp_updated(&mut self, _now: DateTime<Utc>) {}
}

impl Record for Facility {
    type Key = str;

    const TABLE: &'static str = "facilities";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "street_number",
        "street_name",
        "postal_code",
        "phone",
        "area_en",
        "city",
        "lat",
        "lon",
        "facility_category_id",
        "created_at",
        "updated_at",
    ];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            street_number: row.get("street_number")?,
            street_name: row.get("street_name")?,
            postal_code: row.get("postal_code")?,
            phone: row.get("phone")?,
            area_en: row.get("area_en")?,
            city: row.get("city")?,
            lat: row.get("lat")?,
            lon: row.get("lon")?,
            facility_category_id: row.get("facility_category_id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        params![
            self.id,
            self.name,
            self.street_number,
            self.street_name,
            self.postal_code,
            self.phone,
            self.area_en,
            self.city,
            self.lat,
            self.lon,
            self.facility_category_id,
            self.created_at,
            self.updated_at,
        ]
        .to_vec()
    }

    fn key(&self) -> &str {
        &self.id
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
        self.updated_at.get_or_insert(now);
    }

    fn stamp_updated(&mut self, now: DateTime<Utc>) {
        self.updated_at = Some(now);
    }
}

impl Record for FacilityCoordinate {
    type Key = str;

    const TABLE: &'static str = "facility_coordinates";
    const COLUMNS: &'static [&'static str] = &["id", "lat", "lon", "created_at"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            lat: row.get("lat")?,
            lon: row.get("lon")?,
            created_at: row.get("created_at")?,
        })
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        params![self.id, self.lat, self.lon, self.created_at].to_vec()
    }

    fn key(&self) -> &str {
        &self.id
    }

    fn stamp_created(&mut self, now: DateTime<Utc>) {
        self.created_at.get_or_insert(now);
    }
}

impl Record for Inspection {
    type Key = str;

    const TABLE: &'static str = "inspections";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "facility_id",
        "inspection_date",
        "in_compliance",
        "closure_date",
        "report_number",
    ];
    const ORDER_BY: &'static str = "inspection_date DESC, id ASC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            facility_id: row.get("facility_id")?,
            inspection_date: row.get("inspection_date")?,
            in_compliance: row.get("in_compliance")?,
            closure_date: row.get("closure_date")?,
            report_number: row.get("report_number")?,
        })
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        params![
            self.id,
            self.facility_id,
            self.inspection_date,
            self.in_compliance,
            self.closure_date,
            self.report_number,
        ]
        .to_vec()
    }

    fn key(&self) -> &str {
        &self.id
    }
}

impl Record for Question {
    type Key = i64;

    const TABLE: &'static str = "questions";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "inspection_id",
        "sort",
        "compliance_result_id",
        "compliance_category_id",
        "compliance_description_id",
    ];
    const ORDER_BY: &'static str = "sort ASC, id ASC";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            inspection_id: row.get("inspection_id")?,
            sort: row.get("sort")?,
            compliance_result_id: row.get("compliance_result_id")?,
            compliance_category_id: row.get("compliance_category_id")?,
            compliance_description_id: row.get("compliance_description_id")?,
        })
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        params![
            self.id,
            self.inspection_id,
            self.sort,
            self.compliance_result_id,
            self.compliance_category_id,
            self.compliance_description_id,
        ]
        .to_vec()
    }

    fn key(&self) -> &i64 {
        &self.id
    }
}

impl Record for Comment {
    type Key = i64;

    const TABLE: &'static str = "comments";
    const COLUMNS: &'static [&'static str] = &["id", "question_id", "text_en"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            question_id: row.get("question_id")?,
            text_en: row.get("text_en")?,
        })
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        params![self.id, self.question_id, self.text_en].to_vec()
    }

    fn key(&self) -> &i64 {
        &self.id
    }
}

impl Record for ComplianceDescription {
    type Key = str;

    const TABLE: &'static str = "compliance_descriptions";
    const COLUMNS: &'static [&'static str] = &["id", "text_en", "risk_level_id"];

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            text_en: row.get("text_en")?,
            risk_level_id: row.get("risk_level_id")?,
        })
    }

    fn values(&self) -> Vec<&dyn ToSql> {
        params![self.id, self.text_en, self.risk_level_id].to_vec()
    }

    fn key(&self) -> &str {
        &self.id
    }
}

macro_rules! lookup_record {
    ($name:ident, $table:literal) => {
        impl Record for $name {
            type Key = str;

            const TABLE: &'static str = $table;
            const COLUMNS: &'static [&'static str] = &["id", "text_en"];

            fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
                Ok(Self {
                    id: row.get("id")?,
                    text_en: row.get("text_en")?,
                })
            }

            fn values(&self) -> Vec<&dyn ToSql> {
                params![self.id, self.text_en].to_vec()
            }

            fn key(&self) -> &str {
                &self.id
            }
        }
    };
}

lookup_record!(ComplianceResult, "compliance_results");
lookup_record!(ComplianceCategory, "compliance_categories");
lookup_record!(RiskLevel, "risk_levels");
lookup_record!(FacilityCategory, "facility_categories");
