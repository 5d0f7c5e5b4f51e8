use std::fmt::Write;

use crate::types::db::user;
use crate::types::internal::{CurrentUser, Flash, Role};
use crate::views::format::html_escape;
use crate::views::layout;

fn role_label(role: &str) -> &str {
    role.parse::<Role>().map(|r| r.label()).unwrap_or(role)
}

/// Account list plus the backup and restore controls
pub fn list(current: &CurrentUser, flashes: &[Flash], users: &[user::Model]) -> String {
    let mut body = String::from(
        r#"<div class="d-flex justify-content-between mb-3"><h1 class="h3">کاربران</h1>
<a href="/add_user" class="btn btn-primary">افزودن کاربر</a></div>
<table class="table table-striped align-middle">
<thead><tr><th>نام کاربری</th><th>نام نمایشی</th><th>نقش</th><th></th></tr></thead>
<tbody>
"#,
    );

    for user in users {
        let delete = if user.id == current.id {
            String::new()
        } else {
            format!(
                r#"<form method="post" action="/delete_user/{}" class="d-inline"><button type="submit" class="btn btn-sm btn-outline-danger">حذف</button></form>"#,
                html_escape(&user.id)
            )
        };
        let _ = writeln!(
            body,
            r#"<tr><td>{}</td><td>{}</td><td>{}</td><td><a class="btn btn-sm btn-outline-secondary" href="/edit_user/{}">ویرایش</a> {}</td></tr>"#,
            html_escape(&user.username),
            html_escape(&user.display_name),
            html_escape(role_label(&user.role)),
            html_escape(&user.id),
            delete,
        );
    }

    body.push_str(
        r#"</tbody></table>
<h2 class="h5 mt-5">پشتیبان‌گیری و بازیابی</h2>
<p><a href="/backup" class="btn btn-outline-primary">دریافت نسخه پشتیبان</a></p>
<form method="post" action="/restore" enctype="multipart/form-data" class="row g-2">
<div class="col-md-6"><input type="file" name="backup_file" class="form-control" accept=".db" required></div>
<div class="col-auto"><button type="submit" class="btn btn-warning">بازیابی پایگاه داده</button></div>
</form>
"#,
    );

    layout::render("کاربران", Some(current), flashes, &body)
}

/// New-user form when `editing` is `None`; the username is fixed once created
pub fn form(current: &CurrentUser, flashes: &[Flash], editing: Option<&user::Model>) -> String {
    let selected_role = editing.map(|u| u.role.as_str()).unwrap_or(Role::Viewer.as_str());
    let mut roles = String::new();
    for role in Role::ALL {
        let marker = if role.as_str() == selected_role { " selected" } else { "" };
        let _ = write!(roles, r#"<option value="{}"{}>{}</option>"#, role.as_str(), marker, role.label());
    }

    let (title, identity, password_hint) = match editing {
        Some(user) => (
            "ویرایش کاربر",
            format!(
                r#"<input type="hidden" name="user_id" value="{id}">
<div class="mb-3"><label class="form-label" for="username">نام کاربری</label>
<input id="username" name="username" class="form-control" value="{username}" readonly></div>"#,
                id = html_escape(&user.id),
                username = html_escape(&user.username),
            ),
            r#"<div class="form-text">برای حفظ رمز فعلی خالی بگذارید.</div>"#,
        ),
        None => (
            "افزودن کاربر",
            r#"<div class="mb-3"><label class="form-label" for="username">نام کاربری</label>
<input id="username" name="username" class="form-control" required></div>"#
                .to_string(),
            "",
        ),
    };

    let body = format!(
        r#"<h1 class="h3 mb-3">{title}</h1>
<form method="post" action="/submit_user" class="col-md-6">
{identity}
<div class="mb-3"><label class="form-label" for="display_name">نام نمایشی</label>
<input id="display_name" name="display_name" class="form-control" value="{display_name}" required></div>
<div class="mb-3"><label class="form-label" for="password">رمز عبور</label>
<input id="password" name="password" type="password" class="form-control" autocomplete="new-password">{password_hint}</div>
<div class="mb-3"><label class="form-label" for="role">نقش</label>
<select id="role" name="role" class="form-select">{roles}</select></div>
<button type="submit" class="btn btn-primary">ذخیره</button> <a href="/users" class="btn btn-link">بازگشت</a>
</form>"#,
        display_name = editing.map(|u| html_escape(&u.display_name)).unwrap_or_default(),
    );

    layout::render(title, Some(current), flashes, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> CurrentUser {
        CurrentUser {
            id: "admin-id".to_string(),
            username: "admin".to_string(),
            display_name: "Admin".to_string(),
            role: Role::Admin,
        }
    }

    fn account(id: &str, username: &str, role: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            display_name: username.to_string(),
            role: role.to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_list_hides_delete_for_self() {
        let users = [account("admin-id", "admin", "admin"), account("other-id", "sara", "editor")];
        let html = list(&admin(), &[], &users);

        assert!(!html.contains("/delete_user/admin-id"));
        assert!(html.contains("/delete_user/other-id"));
        assert!(html.contains("ویرایشگر"));
        assert!(!html.contains("hash"));
    }

    #[test]
    fn test_edit_form_locks_username() {
        let editing = account("other-id", "sara", "editor");
        let html = form(&admin(), &[], Some(&editing));

        assert!(html.contains(r#"name="user_id" value="other-id""#));
        assert!(html.contains("readonly"));
        assert!(html.contains(r#"<option value="editor" selected>"#));
    }
}
