use crate::types::internal::{CurrentUser, Flash};
use crate::views::layout;

pub fn upload(user: &CurrentUser, flashes: &[Flash]) -> String {
    let body = r#"<h1 class="h3 mb-3">بارگذاری گروهی گزارش‌ها</h1>
<p>ردیف اول فایل باید عنوان ستون‌ها باشد. ستون‌های <strong>استان</strong>، <strong>نام واحد</strong>، <strong>ماه</strong> و <strong>سال</strong> الزامی هستند؛
ستون‌های پرداخت کارکنان، پرداخت هیئت علمی و پرداخت معوقات اختیاری‌اند.</p>
<p class="text-muted">در صورت خطا در هر ردیف، هیچ گزارشی از فایل ثبت نمی‌شود.</p>
<form method="post" action="/process_bulk_upload" enctype="multipart/form-data" class="row g-2">
<div class="col-md-6"><input type="file" name="file" class="form-control" accept=".xlsx,.xls,.xlsb,.ods" required></div>
<div class="col-auto"><button type="submit" class="btn btn-primary">بارگذاری</button></div>
</form>"#;

    layout::render("بارگذاری گروهی", Some(user), flashes, body)
}
