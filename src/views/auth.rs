use crate::types::internal::Flash;
use crate::views::layout;

pub fn login(flashes: &[Flash]) -> String {
    let body = r#"<div class="row justify-content-center"><div class="col-md-4">
<h1 class="h3 mb-3">ورود</h1>
<form method="post" action="/login">
<div class="mb-3"><label class="form-label" for="username">نام کاربری</label>
<input id="username" name="username" class="form-control" autocomplete="username" required></div>
<div class="mb-3"><label class="form-label" for="password">رمز عبور</label>
<input id="password" name="password" type="password" class="form-control" autocomplete="current-password" required></div>
<button type="submit" class="btn btn-primary w-100">ورود</button>
</form>
</div></div>"#;

    layout::render("ورود", None, flashes, body)
}
