use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::Customer;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(Customer::Table)
        .col(
            ColumnDef::new(Customer::Id)
                .string()
                .not_null()
                .string_len(64)
                .primary_key(),
        )
        .col(
            ColumnDef::new(Customer::AssignedRepId)
                .string()
                .not_null()
                .default(""),
        )
        .col(ColumnDef::new(Customer::StoreName).string().not_null())
        .col(
            ColumnDef::new(Customer::ContactName)
                .string()
                .not_null()
                .default(""),
        )
        .col(
            ColumnDef::new(Customer::FullAddress)
                .string()
                .not_null()
                .default(""),
        )
        .col(ColumnDef::new(Customer::Phone).string().not_null().default(""))
        .col(ColumnDef::new(Customer::Email).string().not_null().default(""))
        .col(ColumnDef::new(Customer::Schedule).text().not_null())
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(Customer::Table).to_owned()
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
