use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_taxonomy_tables::Migration),
            Box::new(m20250301_000002_create_products_table::Migration),
            Box::new(m20250301_000003_create_images_table::Migration),
            Box::new(m20250301_000004_create_parameter_tables::Migration),
            Box::new(m20250301_000005_create_articles_table::Migration),
            Box::new(m20250301_000006_create_users_table::Migration),
        ]
    }
}

mod m20250301_000001_create_taxonomy_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_taxonomy_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Categories::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::ParentId).uuid().null())
                        .col(ColumnDef::new(Categories::Description).text().null())
                        .col(ColumnDef::new(Categories::Priority).string().null())
                        .col(ColumnDef::new(Categories::ImageId).uuid().null())
                        .col(
                            ColumnDef::new(Categories::Show)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Categories::Slug).string().null())
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Categories::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_categories_parent")
                                .from(Categories::Table, Categories::ParentId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Entities::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Entities::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Entities::Name).string().not_null())
                        .col(ColumnDef::new(Entities::ParentId).uuid().null())
                        .col(ColumnDef::new(Entities::Description).text().null())
                        .col(ColumnDef::new(Entities::Priority).string().null())
                        .col(ColumnDef::new(Entities::ImageId).uuid().null())
                        .col(ColumnDef::new(Entities::EntitySlug).string().null())
                        .col(
                            ColumnDef::new(Entities::Show)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Entities::Keywords).json().not_null())
                        .col(ColumnDef::new(Entities::Price).string().null())
                        .col(
                            ColumnDef::new(Entities::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Entities::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_entities_parent")
                                .from(Entities::Table, Entities::ParentId)
                                .to(Entities::Table, Entities::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_entities_parent_id")
                        .table(Entities::Table)
                        .col(Entities::ParentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_entities_entity_slug")
                        .table(Entities::Table)
                        .col(Entities::EntitySlug)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Brands::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Brands::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Brands::Name).string().not_null())
                        .col(ColumnDef::new(Brands::Description).text().null())
                        .col(
                            ColumnDef::new(Brands::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Brands::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Entities::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        Name,
        ParentId,
        Description,
        Priority,
        ImageId,
        Show,
        Slug,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Entities {
        Table,
        Id,
        Name,
        ParentId,
        Description,
        Priority,
        ImageId,
        EntitySlug,
        Show,
        Keywords,
        Price,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Brands {
        Table,
        Id,
        Name,
        Description,
        CreatedAt,
    }
}

mod m20250301_000002_create_products_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_products_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Products::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Products::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Products::Description).text().null())
                        .col(ColumnDef::new(Products::Info).text().null())
                        .col(ColumnDef::new(Products::Price).string().null())
                        .col(ColumnDef::new(Products::Count).string().null())
                        .col(ColumnDef::new(Products::Position).string().null())
                        .col(ColumnDef::new(Products::Code).string().null())
                        .col(ColumnDef::new(Products::CategoryId).uuid().null())
                        .col(ColumnDef::new(Products::BrandId).uuid().null())
                        .col(ColumnDef::new(Products::EntityId).uuid().null())
                        .col(ColumnDef::new(Products::ImageId).uuid().null())
                        .col(ColumnDef::new(Products::Slug).string().null())
                        .col(ColumnDef::new(Products::Keywords).json().not_null())
                        .col(
                            ColumnDef::new(Products::Generatable)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::Generated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Products::Show)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Products::BaseProductId).uuid().null())
                        .col(ColumnDef::new(Products::GeneratorId).uuid().null())
                        .col(
                            ColumnDef::new(Products::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Products::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_category")
                                .from(Products::Table, Products::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_brand")
                                .from(Products::Table, Products::BrandId)
                                .to(Brands::Table, Brands::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_entity")
                                .from(Products::Table, Products::EntityId)
                                .to(Entities::Table, Entities::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_base_product")
                                .from(Products::Table, Products::BaseProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_products_generator")
                                .from(Products::Table, Products::GeneratorId)
                                .to(Entities::Table, Entities::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // Structural identity of derived products; NULL pairs (hand-made products) never collide
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_products_base_generator")
                        .table(Products::Table)
                        .col(Products::BaseProductId)
                        .col(Products::GeneratorId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            for (name, column) in [
                ("idx_products_category_id", Products::CategoryId),
                ("idx_products_entity_id", Products::EntityId),
                ("idx_products_slug", Products::Slug),
                ("idx_products_generated", Products::Generated),
                ("idx_products_created_at", Products::CreatedAt),
            ] {
                manager
                    .create_index(
                        Index::create()
                            .if_not_exists()
                            .name(name)
                            .table(Products::Table)
                            .col(column)
                            .to_owned(),
                    )
                    .await?;
            }

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        Description,
        Info,
        Price,
        Count,
        Position,
        Code,
        CategoryId,
        BrandId,
        EntityId,
        ImageId,
        Slug,
        Keywords,
        Generatable,
        Generated,
        Show,
        BaseProductId,
        GeneratorId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Brands {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Entities {
        Table,
        Id,
    }
}

mod m20250301_000003_create_images_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_images_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Images::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Images::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Images::Name).string().not_null())
                        .col(ColumnDef::new(Images::ImageUrl).string().not_null())
                        .col(ColumnDef::new(Images::ProductId).uuid().null())
                        .col(ColumnDef::new(Images::CategoryId).uuid().null())
                        .col(
                            ColumnDef::new(Images::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_images_product")
                                .from(Images::Table, Images::ProductId)
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_images_category")
                                .from(Images::Table, Images::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            // Natural key for copying a base product's gallery onto a derived product
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_images_product_url")
                        .table(Images::Table)
                        .col(Images::ProductId)
                        .col(Images::ImageUrl)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Images::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Images {
        Table,
        Id,
        Name,
        ImageUrl,
        ProductId,
        CategoryId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
    }
}

mod m20250301_000004_create_parameter_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_parameter_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ParameterGroups::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ParameterGroups::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ParameterGroups::Name).string().not_null())
                        .col(ColumnDef::new(ParameterGroups::CategoryId).uuid().null())
                        .col(
                            ColumnDef::new(ParameterGroups::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_parameter_groups_category")
                                .from(ParameterGroups::Table, ParameterGroups::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Parameters::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Parameters::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Parameters::Name).string().not_null())
                        .col(ColumnDef::new(Parameters::Description).text().null())
                        .col(
                            ColumnDef::new(Parameters::Type)
                                .string_len(16)
                                .not_null()
                                .default("text"),
                        )
                        .col(ColumnDef::new(Parameters::ParameterGroupId).uuid().null())
                        .col(ColumnDef::new(Parameters::Selectables).json().not_null())
                        .col(ColumnDef::new(Parameters::Priority).string().null())
                        .col(
                            ColumnDef::new(Parameters::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_parameters_group")
                                .from(Parameters::Table, Parameters::ParameterGroupId)
                                .to(ParameterGroups::Table, ParameterGroups::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductParameterValues::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductParameterValues::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductParameterValues::ProductId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductParameterValues::ParameterId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductParameterValues::TextValue).text().null())
                        .col(
                            ColumnDef::new(ProductParameterValues::BoolValue)
                                .boolean()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ProductParameterValues::SelectableValue)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ProductParameterValues::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_ppv_product")
                                .from(
                                    ProductParameterValues::Table,
                                    ProductParameterValues::ProductId,
                                )
                                .to(Products::Table, Products::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_ppv_parameter")
                                .from(
                                    ProductParameterValues::Table,
                                    ProductParameterValues::ParameterId,
                                )
                                .to(Parameters::Table, Parameters::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_ppv_product_parameter")
                        .table(ProductParameterValues::Table)
                        .col(ProductParameterValues::ProductId)
                        .col(ProductParameterValues::ParameterId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ProductParameterValues::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Parameters::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ParameterGroups::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ParameterGroups {
        Table,
        Id,
        Name,
        CategoryId,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Parameters {
        Table,
        Id,
        Name,
        Description,
        Type,
        ParameterGroupId,
        Selectables,
        Priority,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductParameterValues {
        Table,
        Id,
        ProductId,
        ParameterId,
        TextValue,
        BoolValue,
        SelectableValue,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
    }
}

mod m20250301_000005_create_articles_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_articles_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Articles::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Articles::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Articles::Name).string().not_null())
                        .col(ColumnDef::new(Articles::Description).text().null())
                        .col(ColumnDef::new(Articles::ImageId).uuid().null())
                        .col(ColumnDef::new(Articles::Slug).string().null())
                        .col(ColumnDef::new(Articles::Keywords).json().not_null())
                        .col(ColumnDef::new(Articles::CategoryId).uuid().null())
                        .col(
                            ColumnDef::new(Articles::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Articles::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_articles_category")
                                .from(Articles::Table, Articles::CategoryId)
                                .to(Categories::Table, Categories::Id)
                                .on_delete(ForeignKeyAction::SetNull),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_articles_slug")
                        .table(Articles::Table)
                        .col(Articles::Slug)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Articles::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Articles {
        Table,
        Id,
        Name,
        Description,
        ImageId,
        Slug,
        Keywords,
        CategoryId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
    }
}

mod m20250301_000006_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000006_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::Password).string().not_null())
                        .col(
                            ColumnDef::new(Users::IsAdmin)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Users::ResetToken).string().null())
                        .col(
                            ColumnDef::new(Users::ResetTokenExpiresAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_reset_token")
                        .table(Users::Table)
                        .col(Users::ResetToken)
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
        Password,
        IsAdmin,
        ResetToken,
        ResetTokenExpiresAt,
        CreatedAt,
    }
}
