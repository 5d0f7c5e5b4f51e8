use serde::Deserialize;

use crate::catalog;
use crate::types::internal::{ReportFields, ReportFilter};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /submit`; absent fields deserialize as empty and fail validation
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReportForm {
    pub report_id: Option<String>,
    pub province: String,
    pub unit_name: String,
    pub month: String,
    pub year: String,
    pub staff_payment: Option<String>,
    pub faculty_payment: Option<String>,
    pub arrears_payment: Option<String>,
}

impl ReportForm {
    /// `None` for a new report; `Err` carries the unparsable value
    pub fn report_id(&self) -> Result<Option<i32>, String> {
        match self.report_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| raw.to_string()),
        }
    }

    pub fn fields(self) -> ReportFields {
        ReportFields {
            province: self.province,
            unit_name: self.unit_name,
            month: self.month,
            year: self.year,
            staff_payment: self.staff_payment,
            faculty_payment: self.faculty_payment,
            arrears_payment: self.arrears_payment,
        }
    }
}

/// Query string of the report listing
#[derive(Debug, Default, Deserialize)]
pub struct ReportFilterQuery {
    pub province: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl ReportFilterQuery {
    /// An absent `year` selects the default year; an empty one selects all years
    pub fn into_filter(self) -> ReportFilter {
        ReportFilter {
            province: self.province,
            month: self.month,
            year: Some(self.year.unwrap_or_else(|| catalog::DEFAULT_YEAR.to_string())),
        }
    }
}

/// Body of `POST /submit_user`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub user_id: Option<String>,
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_id_parsing() {
        let mut form = ReportForm::default();
        assert_eq!(form.report_id(), Ok(None));

        form.report_id = Some(" ".to_string());
        assert_eq!(form.report_id(), Ok(None));

        form.report_id = Some("12".to_string());
        assert_eq!(form.report_id(), Ok(Some(12)));

        form.report_id = Some("abc".to_string());
        assert_eq!(form.report_id(), Err("abc".to_string()));
    }

    #[test]
    fn test_filter_year_defaults_only_when_absent() {
        let filter = ReportFilterQuery::default().into_filter();
        assert_eq!(filter.year.as_deref(), Some("1404"));

        let filter = ReportFilterQuery { year: Some(String::new()), ..Default::default() }.into_filter();
        assert_eq!(filter.year.as_deref(), Some(""));
    }
}
