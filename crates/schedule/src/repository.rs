use orchard_db::table::{Customer as CustomerTable, OneOffItem as OneOffTable, ScheduleEvent};
use orchard_shared::{format_date_key, parse_date_key};
use sea_query::{Expr, ExprTrait, OnConflict, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{
    SqlitePool,
    prelude::FromRow,
    types::{Json, Text},
};
use time::OffsetDateTime;

use crate::occurrence::Kind;
use crate::one_off::OneOffItem;
use crate::range::DateRange;
use crate::schedule::{Customer, ScheduleRecord};
use crate::status::{SkipReason, Status, StatusRecord};
use crate::store::Store;

/// [`Store`] over the SQLite tables created by `orchard_db::migrator`.
#[derive(Clone)]
pub struct SqliteStore(pub SqlitePool);

#[derive(FromRow)]
struct CustomerRow {
    id: String,
    assigned_rep_id: String,
    store_name: String,
    contact_name: String,
    full_address: String,
    phone: String,
    email: String,
    schedule: Json<ScheduleRecord>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            assigned_rep_id: row.assigned_rep_id,
            store_name: row.store_name,
            contact_name: row.contact_name,
            full_address: row.full_address,
            phone: row.phone,
            email: row.email,
            schedule: row.schedule.0,
        }
    }
}

#[derive(FromRow)]
struct OneOffRow {
    id: String,
    kind: Text<Kind>,
    date: String,
    customer_id: Option<String>,
    rep_id: Option<String>,
    note: String,
    is_deleted: bool,
}

impl TryFrom<OneOffRow> for OneOffItem {
    type Error = orchard_shared::Error;

    fn try_from(row: OneOffRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            kind: row.kind.0,
            date: parse_date_key(&row.date)?,
            customer_id: row.customer_id,
            rep_id: row.rep_id,
            note: row.note,
            is_deleted: row.is_deleted,
        })
    }
}

#[derive(FromRow)]
struct StatusRow {
    id: String,
    customer_id: Option<String>,
    kind: Text<Kind>,
    date: String,
    run_index: Option<i64>,
    source_id: Option<String>,
    status: Text<Status>,
    skipped_reason: Option<Text<SkipReason>>,
    skipped_reason_text: Option<String>,
    completed_at: Option<i64>,
}

impl TryFrom<StatusRow> for StatusRecord {
    type Error = orchard_shared::Error;

    fn try_from(row: StatusRow) -> Result<Self, Self::Error> {
        let completed_at = row
            .completed_at
            .map(OffsetDateTime::from_unix_timestamp)
            .transpose()?;

        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            kind: row.kind.0,
            date: parse_date_key(&row.date)?,
            run_index: row.run_index.and_then(|v| u8::try_from(v).ok()),
            source_id: row.source_id,
            status: row.status.0,
            skipped_reason: row.skipped_reason.map(|r| r.0),
            skipped_reason_text: row.skipped_reason_text,
            completed_at,
        })
    }
}

const CUSTOMER_COLUMNS: [CustomerTable; 8] = [
    CustomerTable::Id,
    CustomerTable::AssignedRepId,
    CustomerTable::StoreName,
    CustomerTable::ContactName,
    CustomerTable::FullAddress,
    CustomerTable::Phone,
    CustomerTable::Email,
    CustomerTable::Schedule,
];

const ONE_OFF_COLUMNS: [OneOffTable; 7] = [
    OneOffTable::Id,
    OneOffTable::Kind,
    OneOffTable::Date,
    OneOffTable::CustomerId,
    OneOffTable::RepId,
    OneOffTable::Note,
    OneOffTable::IsDeleted,
];

const STATUS_COLUMNS: [ScheduleEvent; 10] = [
    ScheduleEvent::Id,
    ScheduleEvent::CustomerId,
    ScheduleEvent::Kind,
    ScheduleEvent::Date,
    ScheduleEvent::RunIndex,
    ScheduleEvent::SourceId,
    ScheduleEvent::Status,
    ScheduleEvent::SkippedReason,
    ScheduleEvent::SkippedReasonText,
    ScheduleEvent::CompletedAt,
];

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn customers(&self) -> orchard_shared::Result<Vec<Customer>> {
        let statement = Query::select()
            .columns(CUSTOMER_COLUMNS)
            .from(CustomerTable::Table)
            .order_by(CustomerTable::Id, sea_query::Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, CustomerRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn find_customer(&self, id: &str) -> orchard_shared::Result<Option<Customer>> {
        let statement = Query::select()
            .columns(CUSTOMER_COLUMNS)
            .from(CustomerTable::Table)
            .and_where(Expr::col(CustomerTable::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, CustomerRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        Ok(row.map(Customer::from))
    }

    async fn put_customer(&self, customer: &Customer) -> orchard_shared::Result<()> {
        let schedule = serde_json::to_string(&customer.schedule)?;

        let statement = Query::insert()
            .into_table(CustomerTable::Table)
            .columns(CUSTOMER_COLUMNS)
            .values([
                customer.id.to_owned().into(),
                customer.assigned_rep_id.to_owned().into(),
                customer.store_name.to_owned().into(),
                customer.contact_name.to_owned().into(),
                customer.full_address.to_owned().into(),
                customer.phone.to_owned().into(),
                customer.email.to_owned().into(),
                schedule.into(),
            ])
            .map_err(anyhow::Error::from)?
            .on_conflict(
                OnConflict::column(CustomerTable::Id)
                    .update_columns(CUSTOMER_COLUMNS.into_iter().skip(1))
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }

    async fn one_off_items(&self, range: DateRange) -> orchard_shared::Result<Vec<OneOffItem>> {
        let statement = Query::select()
            .columns(ONE_OFF_COLUMNS)
            .from(OneOffTable::Table)
            .and_where(Expr::col(OneOffTable::Date).gte(format_date_key(range.start())))
            .and_where(Expr::col(OneOffTable::Date).lte(format_date_key(range.end())))
            .order_by(OneOffTable::Date, sea_query::Order::Asc)
            .order_by(OneOffTable::Id, sea_query::Order::Asc)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, OneOffRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        rows.into_iter().map(OneOffItem::try_from).collect()
    }

    async fn find_one_off(&self, id: &str) -> orchard_shared::Result<Option<OneOffItem>> {
        let statement = Query::select()
            .columns(ONE_OFF_COLUMNS)
            .from(OneOffTable::Table)
            .and_where(Expr::col(OneOffTable::Id).eq(id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let row = sqlx::query_as_with::<_, OneOffRow, _>(&sql, values)
            .fetch_optional(&self.0)
            .await?;

        row.map(OneOffItem::try_from).transpose()
    }

    async fn put_one_off(&self, item: &OneOffItem) -> orchard_shared::Result<()> {
        let statement = Query::insert()
            .into_table(OneOffTable::Table)
            .columns(ONE_OFF_COLUMNS)
            .values([
                item.id.to_owned().into(),
                item.kind.to_string().into(),
                format_date_key(item.date).into(),
                item.customer_id.to_owned().into(),
                item.rep_id.to_owned().into(),
                item.note.to_owned().into(),
                item.is_deleted.into(),
            ])
            .map_err(anyhow::Error::from)?
            .on_conflict(
                OnConflict::column(OneOffTable::Id)
                    .update_columns(ONE_OFF_COLUMNS.into_iter().skip(1))
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }

    async fn status_records(&self, range: DateRange) -> orchard_shared::Result<Vec<StatusRecord>> {
        let statement = Query::select()
            .columns(STATUS_COLUMNS)
            .from(ScheduleEvent::Table)
            .and_where(Expr::col(ScheduleEvent::Date).gte(format_date_key(range.start())))
            .and_where(Expr::col(ScheduleEvent::Date).lte(format_date_key(range.end())))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, StatusRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?;

        rows.into_iter().map(StatusRecord::try_from).collect()
    }

    async fn put_status(&self, record: &StatusRecord) -> orchard_shared::Result<()> {
        let statement = Query::insert()
            .into_table(ScheduleEvent::Table)
            .columns(STATUS_COLUMNS)
            .values([
                record.id.to_owned().into(),
                record.customer_id.to_owned().into(),
                record.kind.to_string().into(),
                format_date_key(record.date).into(),
                record.run_index.map(i64::from).into(),
                record.source_id.to_owned().into(),
                record.status.to_string().into(),
                record.skipped_reason.map(|r| r.to_string()).into(),
                record.skipped_reason_text.to_owned().into(),
                record.completed_at.map(|t| t.unix_timestamp()).into(),
            ])
            .map_err(anyhow::Error::from)?
            .on_conflict(
                OnConflict::column(ScheduleEvent::Id)
                    .update_columns(STATUS_COLUMNS.into_iter().skip(1))
                    .to_owned(),
            )
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }

    async fn delete_status(&self, id: &str) -> orchard_shared::Result<()> {
        let statement = Query::delete()
            .from_table(ScheduleEvent::Table)
            .and_where(Expr::col(ScheduleEvent::Id).eq(id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }
}
