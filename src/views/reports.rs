use std::fmt::Write;

use crate::catalog;
use crate::types::db::report;
use crate::types::internal::{CurrentUser, Flash, ReportFilter};
use crate::views::format::{format_timestamp, html_escape, to_persian_digits};
use crate::views::layout::{self, options};

const UNIT_LOADER_SCRIPT: &str = r#"<script>
document.getElementById('province').addEventListener('change', async (event) => {
  const select = document.getElementById('unit_name');
  select.replaceChildren(new Option('', ''));
  if (!event.target.value) return;
  const response = await fetch('/get_units/' + encodeURIComponent(event.target.value));
  if (!response.ok) return;
  for (const unit of await response.json()) select.add(new Option(unit, unit));
});
</script>"#;

fn optional_cell(value: &Option<String>) -> String {
    value.as_deref().map(|v| html_escape(&to_persian_digits(v))).unwrap_or_default()
}

/// Report listing with filters, per-row actions and bulk delete
pub fn index(user: &CurrentUser, flashes: &[Flash], reports: &[report::Model], filter: &ReportFilter) -> String {
    let selected_province = filter.province.as_deref().unwrap_or("");
    let selected_month = filter.month.as_deref().unwrap_or("");
    let selected_year = filter.year.as_deref().unwrap_or("");
    let years = catalog::years();

    let mut body = String::new();
    let _ = write!(
        body,
        r#"<h1 class="h3 mb-3">گزارش‌های پرداخت</h1>
<form method="get" action="/" class="row g-2 mb-4">
<div class="col"><select name="province" class="form-select"><option value="">همه استان‌ها</option>{}</select></div>
<div class="col"><select name="month" class="form-select"><option value="">همه ماه‌ها</option>{}</select></div>
<div class="col"><select name="year" class="form-select"><option value="">همه سال‌ها</option>{}</select></div>
<div class="col-auto"><button type="submit" class="btn btn-primary">فیلتر</button></div>
</form>
"#,
        options(catalog::provinces(), selected_province),
        options(catalog::MONTHS, selected_month),
        options(years.iter().map(String::as_str), selected_year),
    );

    if reports.is_empty() {
        body.push_str(r#"<p class="text-muted">گزارشی یافت نشد.</p>"#);
        return layout::render("گزارش‌ها", Some(user), flashes, &body);
    }

    body.push_str(
        r#"<form method="post" action="/bulk_delete">
<table class="table table-striped align-middle">
<thead><tr><th></th><th>استان</th><th>واحد</th><th>ماه</th><th>سال</th><th>پرداخت کارکنان</th><th>پرداخت هیئت علمی</th><th>پرداخت معوقات</th><th>تاریخ ثبت</th><th>ثبت‌کننده</th><th></th></tr></thead>
<tbody>
"#,
    );

    for report in reports {
        let _ = write!(
            body,
            r#"<tr><td><input type="checkbox" class="form-check-input" name="report_ids" value="{id}"></td><td>{province}</td><td>{unit}</td><td>{month}</td><td>{year}</td><td>{staff}</td><td>{faculty}</td><td>{arrears}</td><td>{submitted_at}</td><td>{submitter}</td>
<td><a class="btn btn-sm btn-outline-secondary" href="/edit/{id}">ویرایش</a> <button type="submit" class="btn btn-sm btn-outline-danger" formaction="/delete/{id}">حذف</button></td></tr>
"#,
            id = report.id,
            province = html_escape(&report.province),
            unit = html_escape(&report.unit_name),
            month = html_escape(&report.month),
            year = html_escape(&to_persian_digits(&report.year)),
            staff = optional_cell(&report.staff_payment),
            faculty = optional_cell(&report.faculty_payment),
            arrears = optional_cell(&report.arrears_payment),
            submitted_at = format_timestamp(report.submission_date),
            submitter = report.submitted_by.as_deref().map(html_escape).unwrap_or_default(),
        );
    }

    body.push_str(
        r#"</tbody></table>
<button type="submit" class="btn btn-danger">حذف موارد انتخاب‌شده</button>
</form>
"#,
    );

    layout::render("گزارش‌ها", Some(user), flashes, &body)
}

/// Add form when `report` is `None`, edit form otherwise
pub fn form(user: &CurrentUser, flashes: &[Flash], report: Option<&report::Model>) -> String {
    let province = report.map(|r| r.province.as_str()).unwrap_or("");
    let unit = report.map(|r| r.unit_name.as_str()).unwrap_or("");
    let month = report.map(|r| r.month.as_str()).unwrap_or("");
    let year = report.map(|r| r.year.as_str()).unwrap_or(catalog::DEFAULT_YEAR);
    let mut years = catalog::years();
    // Keep a stored year outside the fixed range selectable
    if !years.iter().any(|y| y == year) {
        years.insert(0, year.to_string());
    }

    let (title, hidden_id) = match report {
        Some(r) => ("ویرایش گزارش", format!(r#"<input type="hidden" name="report_id" value="{}">"#, r.id)),
        None => ("ثبت گزارش جدید", String::new()),
    };

    let body = format!(
        r#"<h1 class="h3 mb-3">{title}</h1>
<form method="post" action="/submit" class="row g-3">
{hidden_id}
<div class="col-md-6"><label class="form-label" for="province">استان</label>
<select id="province" name="province" class="form-select" required><option value=""></option>{provinces}</select></div>
<div class="col-md-6"><label class="form-label" for="unit_name">نام واحد</label>
<select id="unit_name" name="unit_name" class="form-select" required><option value=""></option>{units}</select></div>
<div class="col-md-6"><label class="form-label" for="month">ماه</label>
<select id="month" name="month" class="form-select" required><option value=""></option>{months}</select></div>
<div class="col-md-6"><label class="form-label" for="year">سال</label>
<select id="year" name="year" class="form-select" required>{years}</select></div>
<div class="col-md-4"><label class="form-label" for="staff_payment">پرداخت کارکنان</label>
<input id="staff_payment" name="staff_payment" class="form-control" value="{staff}"></div>
<div class="col-md-4"><label class="form-label" for="faculty_payment">پرداخت هیئت علمی</label>
<input id="faculty_payment" name="faculty_payment" class="form-control" value="{faculty}"></div>
<div class="col-md-4"><label class="form-label" for="arrears_payment">پرداخت معوقات</label>
<input id="arrears_payment" name="arrears_payment" class="form-control" value="{arrears}"></div>
<div class="col-12"><button type="submit" class="btn btn-primary">ذخیره</button> <a href="/" class="btn btn-link">بازگشت</a></div>
</form>
{script}"#,
        provinces = options(catalog::provinces(), province),
        units = options(catalog::units_for(province).iter().copied(), unit),
        months = options(catalog::MONTHS, month),
        years = options(years.iter().map(String::as_str), year),
        staff = report.and_then(|r| r.staff_payment.as_deref()).map(html_escape).unwrap_or_default(),
        faculty = report.and_then(|r| r.faculty_payment.as_deref()).map(html_escape).unwrap_or_default(),
        arrears = report.and_then(|r| r.arrears_payment.as_deref()).map(html_escape).unwrap_or_default(),
        script = UNIT_LOADER_SCRIPT,
    );

    layout::render(title, Some(user), flashes, &body)
}

/// Reports with outstanding arrears
pub fn arrears(user: &CurrentUser, flashes: &[Flash], reports: &[report::Model]) -> String {
    let mut body = String::from(r#"<h1 class="h3 mb-3">گزارش معوقات</h1>"#);

    if reports.is_empty() {
        body.push_str(r#"<p class="text-muted">معوقه‌ای ثبت نشده است.</p>"#);
        return layout::render("گزارش معوقات", Some(user), flashes, &body);
    }

    body.push_str(
        r#"<table class="table table-striped">
<thead><tr><th>استان</th><th>واحد</th><th>ماه</th><th>سال</th><th>پرداخت معوقات</th><th>تاریخ ثبت</th><th>ثبت‌کننده</th></tr></thead>
<tbody>
"#,
    );
    for report in reports {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            html_escape(&report.province),
            html_escape(&report.unit_name),
            html_escape(&report.month),
            html_escape(&to_persian_digits(&report.year)),
            optional_cell(&report.arrears_payment),
            format_timestamp(report.submission_date),
            report.submitted_by.as_deref().map(html_escape).unwrap_or_default(),
        );
    }
    body.push_str("</tbody></table>\n");

    layout::render("گزارش معوقات", Some(user), flashes, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::Role;

    fn user() -> CurrentUser {
        CurrentUser {
            id: "u1".to_string(),
            username: "sara".to_string(),
            display_name: "Sara".to_string(),
            role: Role::Editor,
        }
    }

    fn report() -> report::Model {
        report::Model {
            id: 7,
            province: "کردستان".to_string(),
            unit_name: "سقز".to_string(),
            month: "تیر".to_string(),
            year: "1403".to_string(),
            staff_payment: Some("60%".to_string()),
            faculty_payment: None,
            arrears_payment: Some("<script>".to_string()),
            submission_date: 1_742_545_800,
            submitted_by: Some("Ali".to_string()),
        }
    }

    #[test]
    fn test_index_renders_rows_and_escapes() {
        let html = index(&user(), &[], &[report()], &ReportFilter::default());

        assert!(html.contains(r#"name="report_ids" value="7""#));
        assert!(html.contains(r#"formaction="/delete/7""#));
        assert!(html.contains("۱۴۰۳"));
        assert!(html.contains("۶۰%"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_edit_form_is_prefilled() {
        let model = report();
        let html = form(&user(), &[], Some(&model));

        assert!(html.contains(r#"name="report_id" value="7""#));
        assert!(html.contains(r#"<option value="سقز" selected>"#));
        assert!(html.contains(r#"value="60%""#));
    }

    #[test]
    fn test_edit_form_keeps_year_outside_fixed_range() {
        for label in ["1399", "۱۴۰۴"] {
            let model = report::Model { year: label.to_string(), ..report() };
            let html = form(&user(), &[], Some(&model));

            assert!(html.contains(&format!(r#"<option value="{label}" selected>"#)));
            assert_eq!(html.matches(" selected>").count(), 4);
        }
    }

    #[test]
    fn test_add_form_defaults_year() {
        let html = form(&user(), &[], None);

        assert!(!html.contains("report_id"));
        assert!(html.contains(r#"<option value="1404" selected>"#));
    }
}
