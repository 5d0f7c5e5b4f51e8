pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users;
mod m20250301_000002_create_reports;
mod m20250315_000001_add_arrears_and_submitter;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users::Migration),
            Box::new(m20250301_000002_create_reports::Migration),
            Box::new(m20250315_000001_add_arrears_and_submitter::Migration),
        ]
    }
}
