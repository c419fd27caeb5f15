use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::ScheduleEvent;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(ScheduleEvent::Table)
        .col(
            ColumnDef::new(ScheduleEvent::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(ColumnDef::new(ScheduleEvent::CustomerId).string().null())
        .col(
            ColumnDef::new(ScheduleEvent::Kind)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(ScheduleEvent::Date)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(ColumnDef::new(ScheduleEvent::RunIndex).integer().null())
        .col(ColumnDef::new(ScheduleEvent::SourceId).string().null())
        .col(
            ColumnDef::new(ScheduleEvent::Status)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(ColumnDef::new(ScheduleEvent::SkippedReason).string().null())
        .col(
            ColumnDef::new(ScheduleEvent::SkippedReasonText)
                .string()
                .null(),
        )
        .col(
            ColumnDef::new(ScheduleEvent::CompletedAt)
                .big_integer()
                .null(),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(ScheduleEvent::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for Operation {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = up_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = down_statement().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
