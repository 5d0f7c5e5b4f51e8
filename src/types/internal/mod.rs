// Internal types shared between layers
pub mod current_user;
pub mod flash;
pub mod report_fields;
pub mod role;

pub use current_user::CurrentUser;
pub use flash::{Flash, FlashCategory};
pub use report_fields::{ReportFields, ReportFilter, SubmitOutcome};
pub use role::Role;
