use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Select, Set,
    TransactionTrait,
};

use crate::errors::InternalError;
use crate::errors::internal::{ImportError, ReportError};
use crate::types::db::report::{self, ActiveModel, Entity as Report};
use crate::types::internal::{ReportFields, ReportFilter, SubmitOutcome};

/// Literal arrears value meaning "fully paid"; excluded from the arrears report
pub const ARREARS_COMPLETE: &str = "100%";

/// One parsed spreadsheet row waiting to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based spreadsheet row number, header included
    pub row_number: usize,
    pub fields: ReportFields,
}

/// ReportStore owns every read and write of the `reports` table
#[derive(Debug, Default)]
pub struct ReportStore;

impl ReportStore {
    pub fn new() -> Self {
        Self
    }

    /// Listing order: year, month (lexicographic on the name), submission time,
    /// all descending; id breaks ties between reports of the same second
    fn ordered(select: Select<Report>) -> Select<Report> {
        select
            .order_by_desc(report::Column::Year)
            .order_by_desc(report::Column::Month)
            .order_by_desc(report::Column::SubmissionDate)
            .order_by_desc(report::Column::Id)
    }

    /// All reports matching every non-empty filter field
    pub async fn list_reports(
        &self,
        conn: &impl ConnectionTrait,
        filter: &ReportFilter,
    ) -> Result<Vec<report::Model>, InternalError> {
        Self::ordered(Report::find().filter(filter.condition()))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_reports", e))
    }

    /// Reports whose arrears payment is recorded and not complete
    pub async fn list_arrears(&self, conn: &impl ConnectionTrait) -> Result<Vec<report::Model>, InternalError> {
        let condition = Condition::all()
            .add(report::Column::ArrearsPayment.is_not_null())
            .add(report::Column::ArrearsPayment.ne(""))
            .add(report::Column::ArrearsPayment.ne(ARREARS_COMPLETE));

        Self::ordered(Report::find().filter(condition))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_arrears", e))
    }

    pub async fn find_report(
        &self,
        conn: &impl ConnectionTrait,
        report_id: i32,
    ) -> Result<Option<report::Model>, InternalError> {
        Report::find_by_id(report_id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_report", e))
    }

    /// Insert a report stamped with the current time and `submitter`
    ///
    /// # Returns
    /// * `Ok(i32)` - The new report id
    /// * `Err(InternalError)` - Validation when a required field is empty; nothing is written
    pub async fn create_report(
        &self,
        conn: &impl ConnectionTrait,
        fields: &ReportFields,
        submitter: &str,
    ) -> Result<i32, InternalError> {
        let fields = fields.clone().normalized();
        fields.validate()?;

        let model = ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            province: Set(fields.province),
            unit_name: Set(fields.unit_name),
            month: Set(fields.month),
            year: Set(fields.year),
            staff_payment: Set(fields.staff_payment),
            faculty_payment: Set(fields.faculty_payment),
            arrears_payment: Set(fields.arrears_payment),
            submission_date: Set(Utc::now().timestamp()),
            submitted_by: Set(Some(submitter.to_string())),
        };

        let inserted = model
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("create_report", e))?;

        Ok(inserted.id)
    }

    /// Overwrite the editable columns of an existing report
    ///
    /// Submission time and submitter are left untouched.
    pub async fn update_report(
        &self,
        conn: &impl ConnectionTrait,
        report_id: i32,
        fields: &ReportFields,
    ) -> Result<(), InternalError> {
        let fields = fields.clone().normalized();
        fields.validate()?;

        let existing = self
            .find_report(conn, report_id)
            .await?
            .ok_or(ReportError::NotFound(report_id))?;

        let mut model: ActiveModel = existing.into();
        model.province = Set(fields.province);
        model.unit_name = Set(fields.unit_name);
        model.month = Set(fields.month);
        model.year = Set(fields.year);
        model.staff_payment = Set(fields.staff_payment);
        model.faculty_payment = Set(fields.faculty_payment);
        model.arrears_payment = Set(fields.arrears_payment);

        model
            .update(conn)
            .await
            .map_err(|e| InternalError::database("update_report", e))?;

        Ok(())
    }

    /// Create when no id is given, update otherwise
    pub async fn submit_report(
        &self,
        conn: &impl ConnectionTrait,
        report_id: Option<i32>,
        fields: &ReportFields,
        submitter: &str,
    ) -> Result<SubmitOutcome, InternalError> {
        match report_id {
            None => Ok(SubmitOutcome::Created(self.create_report(conn, fields, submitter).await?)),
            Some(id) => {
                self.update_report(conn, id, fields).await?;
                Ok(SubmitOutcome::Updated(id))
            }
        }
    }

    /// Remove one report; absent ids are not an error
    ///
    /// # Returns
    /// * `Ok(bool)` - Whether a row was removed
    pub async fn delete_report(&self, conn: &impl ConnectionTrait, report_id: i32) -> Result<bool, InternalError> {
        let result = Report::delete_by_id(report_id)
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("delete_report", e))?;

        Ok(result.rows_affected > 0)
    }

    /// Remove every listed report in one transaction
    ///
    /// # Returns
    /// * `Ok(u64)` - Rows removed
    /// * `Err(InternalError)` - EmptySelection when `report_ids` is empty; nothing happens
    pub async fn bulk_delete<C>(&self, conn: &C, report_ids: &[i32]) -> Result<u64, InternalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let ids: BTreeSet<i32> = report_ids.iter().copied().collect();
        if ids.is_empty() {
            return Err(ReportError::EmptySelection.into());
        }

        let txn = conn.begin().await.map_err(InternalError::transaction_begin)?;

        let result = Report::delete_many()
            .filter(report::Column::Id.is_in(ids))
            .exec(&txn)
            .await
            .map_err(|e| InternalError::database("bulk_delete", e))?;

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(result.rows_affected)
    }

    /// Insert every row through the create path, all or nothing
    ///
    /// The first failing row aborts the batch; the transaction is dropped
    /// without commit so rows inserted before it are rolled back.
    pub async fn bulk_import<C>(&self, conn: &C, rows: &[ImportRow], submitter: &str) -> Result<usize, InternalError>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let txn = conn.begin().await.map_err(InternalError::transaction_begin)?;

        for row in rows {
            match self.create_report(&txn, &row.fields, submitter).await {
                Ok(_) => {}
                Err(InternalError::Report(cause)) => {
                    return Err(ImportError::Row { row: row.row_number, cause: cause.to_string() }.into());
                }
                Err(other) => return Err(other),
            }
        }

        txn.commit().await.map_err(InternalError::transaction_commit)?;

        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};

    async fn setup_test_db() -> (DatabaseConnection, ReportStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        (db, ReportStore::new())
    }

    fn fields(province: &str, unit: &str, month: &str, year: &str) -> ReportFields {
        ReportFields {
            province: province.to_string(),
            unit_name: unit.to_string(),
            month: month.to_string(),
            year: year.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_report_stamps_submitter_and_time() {
        let (db, store) = setup_test_db().await;

        let before = Utc::now().timestamp();
        let id = store
            .create_report(&db, &fields("همدان", "ملایر", "فروردین", "1404"), "Sara")
            .await
            .unwrap();

        let report = store.find_report(&db, id).await.unwrap().unwrap();
        assert_eq!(report.submitted_by.as_deref(), Some("Sara"));
        assert!(report.submission_date >= before);
        assert_eq!(report.staff_payment, None);
    }

    #[tokio::test]
    async fn test_create_report_rejects_missing_year() {
        let (db, store) = setup_test_db().await;

        let result = store.create_report(&db, &fields("همدان", "ملایر", "فروردین", ""), "Sara").await;

        assert!(matches!(result, Err(InternalError::Report(ReportError::Validation(_)))));
        assert!(store.list_reports(&db, &ReportFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_report_is_not_found() {
        let (db, store) = setup_test_db().await;

        let result = store.update_report(&db, 42, &fields("همدان", "ملایر", "فروردین", "1404")).await;
        assert!(matches!(result, Err(InternalError::Report(ReportError::NotFound(42)))));
    }

    #[tokio::test]
    async fn test_submit_branches_on_report_id() {
        let (db, store) = setup_test_db().await;
        let base = fields("کردستان", "سقز", "تیر", "1403");

        let outcome = store.submit_report(&db, None, &base, "Ali").await.unwrap();
        let SubmitOutcome::Created(id) = outcome else {
            panic!("Expected Created, got {:?}", outcome);
        };

        let changed = ReportFields { staff_payment: Some("60%".to_string()), ..base };
        let outcome = store.submit_report(&db, Some(id), &changed, "Someone Else").await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Updated(id));

        let report = store.find_report(&db, id).await.unwrap().unwrap();
        assert_eq!(report.staff_payment.as_deref(), Some("60%"));
        assert_eq!(report.submitted_by.as_deref(), Some("Ali"));
    }

    #[tokio::test]
    async fn test_bulk_delete_ignores_duplicates_and_unknown_ids() {
        let (db, store) = setup_test_db().await;

        let a = store.create_report(&db, &fields("لرستان", "واحد دورود", "مهر", "1404"), "x").await.unwrap();
        let b = store.create_report(&db, &fields("لرستان", "واحد دورود", "آبان", "1404"), "x").await.unwrap();
        let c = store.create_report(&db, &fields("لرستان", "واحد دورود", "آذر", "1404"), "x").await.unwrap();

        let removed = store.bulk_delete(&db, &[a, a, c, 9999]).await.unwrap();
        assert_eq!(removed, 2);

        let remaining = store.list_reports(&db, &ReportFilter::default()).await.unwrap();
        assert_eq!(remaining.iter().map(|r| r.id).collect::<Vec<_>>(), vec![b]);
    }

    #[tokio::test]
    async fn test_bulk_import_reports_failing_row_number() {
        let (db, store) = setup_test_db().await;

        let rows = vec![
            ImportRow { row_number: 2, fields: fields("همدان", "همدان", "دی", "1404") },
            ImportRow { row_number: 3, fields: fields("همدان", "", "دی", "1404") },
        ];

        let result = store.bulk_import(&db, &rows, "importer").await;
        match result {
            Err(InternalError::Import(ImportError::Row { row, .. })) => assert_eq!(row, 3),
            other => panic!("Expected row error, got {:?}", other),
        }
        assert!(store.list_reports(&db, &ReportFilter::default()).await.unwrap().is_empty());
    }
}
