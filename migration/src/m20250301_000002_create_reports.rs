use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // First revision of the reports table: no arrears column, no submitter
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::Province).string().not_null())
                    .col(ColumnDef::new(Reports::UnitName).string().not_null())
                    .col(ColumnDef::new(Reports::Month).string().not_null())
                    .col(ColumnDef::new(Reports::Year).string().not_null())
                    .col(ColumnDef::new(Reports::StaffPayment).string().null())
                    .col(ColumnDef::new(Reports::FacultyPayment).string().null())
                    .col(ColumnDef::new(Reports::SubmissionDate).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reports_year_month")
                    .table(Reports::Table)
                    .col(Reports::Year)
                    .col(Reports::Month)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Reports {
    Table,
    Id,
    Province,
    UnitName,
    Month,
    Year,
    StaffPayment,
    FacultyPayment,
    SubmissionDate,
}
