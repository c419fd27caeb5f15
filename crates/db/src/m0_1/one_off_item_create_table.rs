use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::OneOffItem;

pub struct Operation;

fn up_statement() -> TableCreateStatement {
    Table::create()
        .table(OneOffItem::Table)
        .col(
            ColumnDef::new(OneOffItem::Id)
                .string()
                .not_null()
                .string_len(26)
                .primary_key(),
        )
        .col(
            ColumnDef::new(OneOffItem::Kind)
                .string()
                .not_null()
                .string_len(15),
        )
        .col(
            ColumnDef::new(OneOffItem::Date)
                .string()
                .not_null()
                .string_len(10),
        )
        .col(ColumnDef::new(OneOffItem::CustomerId).string().null())
        .col(ColumnDef::new(OneOffItem::RepId).string().null())
        .col(ColumnDef::new(OneOffItem::Note).string().not_null().default(""))
        .col(
            ColumnDef::new(OneOffItem::IsDeleted)
                .boolean()
                .not_null()
                .default(false),
        )
        .to_owned()
}

fn down_statement() -> TableDropStatement {
    Table::drop().table(OneOffItem::Table).to_owned()
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
