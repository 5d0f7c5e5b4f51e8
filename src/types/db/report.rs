use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub province: String,
    pub unit_name: String,
    pub month: String,
    pub year: String,

    // Free-text percentages, e.g. "75%"
    pub staff_payment: Option<String>,
    pub faculty_payment: Option<String>,
    pub arrears_payment: Option<String>,

    // Unix seconds, set once at creation
    pub submission_date: i64,
    pub submitted_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
