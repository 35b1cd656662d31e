use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum OrderChanges {
    Table,
    Id,
    OrderId,
    UserId,
    ChangeDate,
    Changes,
}

const USER_ID_INDEX: &str = "idx_order_changes_user_id";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderChanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderChanges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OrderChanges::OrderId).uuid().not_null())
                    .col(ColumnDef::new(OrderChanges::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(OrderChanges::ChangeDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OrderChanges::Changes).text().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(USER_ID_INDEX)
                    .table(OrderChanges::Table)
                    .col(OrderChanges::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(USER_ID_INDEX)
                    .table(OrderChanges::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(OrderChanges::Table).to_owned())
            .await
    }
}
