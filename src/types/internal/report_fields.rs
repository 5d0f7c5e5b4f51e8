use sea_orm::{ColumnTrait, Condition};

use crate::catalog;
use crate::errors::internal::ReportError;
use crate::types::db::report;

/// Editable columns of a report, as submitted by the form or an import row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFields {
    pub province: String,
    pub unit_name: String,
    pub month: String,
    pub year: String,
    pub staff_payment: Option<String>,
    pub faculty_payment: Option<String>,
    pub arrears_payment: Option<String>,
}

impl ReportFields {
    /// Trim every value; empty payment fields become `None`
    pub fn normalized(self) -> Self {
        Self {
            province: self.province.trim().to_string(),
            unit_name: self.unit_name.trim().to_string(),
            month: self.month.trim().to_string(),
            year: self.year.trim().to_string(),
            staff_payment: optional(self.staff_payment),
            faculty_payment: optional(self.faculty_payment),
            arrears_payment: optional(self.arrears_payment),
        }
    }

    /// Required fields must be non-empty; province, unit and month must
    /// come from the fixed catalog. The year is a free label.
    pub fn validate(&self) -> Result<(), ReportError> {
        for (name, value) in [
            ("province", &self.province),
            ("unit_name", &self.unit_name),
            ("month", &self.month),
            ("year", &self.year),
        ] {
            if value.trim().is_empty() {
                return Err(ReportError::missing_field(name));
            }
        }

        if !catalog::is_province(&self.province) {
            return Err(ReportError::Validation(format!("unknown province {}", self.province)));
        }
        if !catalog::is_unit_of(&self.province, &self.unit_name) {
            return Err(ReportError::Validation(format!(
                "{} is not a unit of {}",
                self.unit_name, self.province
            )));
        }
        if !catalog::is_month(&self.month) {
            return Err(ReportError::Validation(format!("unknown month {}", self.month)));
        }

        Ok(())
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Optional equality filters for the report listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub province: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl ReportFilter {
    /// Conjunction of one equality predicate per non-empty field
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add_option(non_empty(&self.province).map(|v| report::Column::Province.eq(v)))
            .add_option(non_empty(&self.month).map(|v| report::Column::Month.eq(v)))
            .add_option(non_empty(&self.year).map(|v| report::Column::Year.eq(v)))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Which branch of the submit handler ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(i32),
    Updated(i32),
}
