//! Migration: Create the users table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::UserLevel).string_len(16).not_null())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(ColumnDef::new(Users::Address1).string().null())
                    .col(ColumnDef::new(Users::Address2).string().null())
                    .col(ColumnDef::new(Users::City).string().null())
                    .col(ColumnDef::new(Users::State).string().null())
                    .col(ColumnDef::new(Users::ZipCode).string().null())
                    .col(ColumnDef::new(Users::Country).string().null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    UserLevel,
    FirstName,
    LastName,
    #[sea_orm(iden = "address_1")]
    Address1,
    #[sea_orm(iden = "address_2")]
    Address2,
    City,
    State,
    ZipCode,
    Country,
    Phone,
    CreatedAt,
    UpdatedAt,
}
