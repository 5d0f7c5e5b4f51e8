use std::fmt::Write;

use crate::types::internal::{CurrentUser, Flash};
use crate::views::format::html_escape;

/// Wrap a page body in the shared RTL shell with navigation and flashes
pub fn render(title: &str, user: Option<&CurrentUser>, flashes: &[Flash], body: &str) -> String {
    let mut html = String::with_capacity(body.len() + 2048);

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="fa" dir="rtl">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.rtl.min.css">
</head>
<body>
"#,
        title = html_escape(title),
    );

    if let Some(user) = user {
        html.push_str(&navigation(user));
    }

    html.push_str(r#"<main class="container py-4">"#);
    for flash in flashes {
        let _ = write!(
            html,
            r#"<div class="alert alert-{}" role="alert">{}</div>"#,
            flash.category.as_str(),
            html_escape(&flash.message)
        );
    }
    html.push_str(body);
    html.push_str("</main>\n</body>\n</html>\n");

    html
}

fn navigation(user: &CurrentUser) -> String {
    let mut links = vec![("/", "گزارش‌ها"), ("/add", "ثبت گزارش")];
    if user.role.is_editor_or_admin() {
        links.push(("/bulk_upload", "بارگذاری گروهی"));
        links.push(("/arrears_report", "گزارش معوقات"));
    }
    if user.role.is_admin() {
        links.push(("/users", "کاربران"));
        links.push(("/backup", "پشتیبان‌گیری"));
    }

    let mut nav = String::from(
        r#"<nav class="navbar navbar-expand bg-body-tertiary"><div class="container"><ul class="navbar-nav">"#,
    );
    for (href, label) in links {
        let _ = write!(nav, r#"<li class="nav-item"><a class="nav-link" href="{href}">{label}</a></li>"#);
    }
    let _ = write!(
        nav,
        r#"</ul><span class="navbar-text">{} ({}) <a href="/logout">خروج</a></span></div></nav>"#,
        html_escape(&user.display_name),
        user.role.label()
    );

    nav
}

/// `<option>` list with `selected` marked on the matching value
pub fn options<'a>(values: impl IntoIterator<Item = &'a str>, selected: &str) -> String {
    let mut html = String::new();
    for value in values {
        let marker = if value == selected { " selected" } else { "" };
        let escaped = html_escape(value);
        let _ = write!(html, r#"<option value="{escaped}"{marker}>{escaped}</option>"#);
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::{FlashCategory, Role};

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: "u1".to_string(),
            username: "sara".to_string(),
            display_name: "<Sara>".to_string(),
            role,
        }
    }

    #[test]
    fn test_navigation_follows_role() {
        let viewer = render("t", Some(&user(Role::Viewer)), &[], "");
        assert!(!viewer.contains("/users"));
        assert!(!viewer.contains("/arrears_report"));

        let editor = render("t", Some(&user(Role::Editor)), &[], "");
        assert!(editor.contains("/arrears_report"));
        assert!(!editor.contains("/backup"));

        let admin = render("t", Some(&user(Role::Admin)), &[], "");
        assert!(admin.contains("/users"));
        assert!(admin.contains("/backup"));
        assert!(admin.contains("&lt;Sara&gt;"));
    }

    #[test]
    fn test_flashes_are_escaped() {
        let flashes = [Flash::new(FlashCategory::Danger, "<b>oops</b>")];
        let html = render("t", None, &flashes, "<p>body</p>");

        assert!(html.contains(r#"alert-danger"#));
        assert!(html.contains("&lt;b&gt;oops&lt;/b&gt;"));
        assert!(html.contains("<p>body</p>"));
    }

    #[test]
    fn test_options_marks_selected() {
        let html = options(["تیر", "مهر"], "مهر");
        assert!(html.contains(r#"<option value="مهر" selected>"#));
        assert!(html.contains(r#"<option value="تیر">"#));
    }
}
