use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_account_tables::Migration),
            Box::new(m20240301_000002_create_catalog_tables::Migration),
            Box::new(m20240301_000003_create_cart_and_order_tables::Migration),
            Box::new(m20240301_000004_create_wallet_tables::Migration),
            Box::new(m20240301_000005_create_scheduled_tasks_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240301_000001_create_account_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_account_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Customers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Customers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Customers::FirstName).string().not_null())
                        .col(ColumnDef::new(Customers::LastName).string().not_null())
                        .col(ColumnDef::new(Customers::Email).string().not_null())
                        .col(ColumnDef::new(Customers::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Customers::Role).string().not_null())
                        .col(ColumnDef::new(Customers::Method).string().not_null())
                        .col(
                            ColumnDef::new(Customers::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Customers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Customers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customers_email")
                        .table(Customers::Table)
                        .col(Customers::Email)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Sellers::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Sellers::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Sellers::FirstName).string().not_null())
                        .col(ColumnDef::new(Sellers::LastName).string().not_null())
                        .col(ColumnDef::new(Sellers::Email).string().not_null())
                        .col(ColumnDef::new(Sellers::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Sellers::Role).string().not_null())
                        .col(ColumnDef::new(Sellers::Status).string().not_null())
                        .col(ColumnDef::new(Sellers::Payment).string().not_null())
                        .col(ColumnDef::new(Sellers::Method).string().not_null())
                        .col(ColumnDef::new(Sellers::Image).string().null())
                        .col(ColumnDef::new(Sellers::ShopInfo).json().null())
                        .col(ColumnDef::new(Sellers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Sellers::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sellers_email")
                        .table(Sellers::Table)
                        .col(Sellers::Email)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sellers_status")
                        .table(Sellers::Table)
                        .col(Sellers::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Admins::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Admins::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Admins::FirstName).string().not_null())
                        .col(ColumnDef::new(Admins::LastName).string().not_null())
                        .col(ColumnDef::new(Admins::Email).string().not_null())
                        .col(ColumnDef::new(Admins::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Admins::Role).string().not_null())
                        .col(ColumnDef::new(Admins::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Admins::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_admins_email")
                        .table(Admins::Table)
                        .col(Admins::Email)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Admins::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Sellers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Customers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Customers {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        PasswordHash,
        Role,
        Method,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Sellers {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        PasswordHash,
        Role,
        Status,
        Payment,
        Method,
        Image,
        ShopInfo,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Admins {
        Table,
        Id,
        FirstName,
        LastName,
        Email,
        PasswordHash,
        Role,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000002_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000002_create_catalog_tables"
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
                        .col(ColumnDef::new(Products::SellerId).uuid().not_null())
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::Slug).string().not_null())
                        .col(ColumnDef::new(Products::ShopName).string().not_null())
                        .col(ColumnDef::new(Products::Category).string().not_null())
                        .col(ColumnDef::new(Products::Description).text().not_null())
                        .col(ColumnDef::new(Products::Brand).string().not_null())
                        .col(ColumnDef::new(Products::Price).decimal().not_null())
                        .col(
                            ColumnDef::new(Products::Discount)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::Stock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Products::Rating)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::Images).json().not_null())
                        .col(ColumnDef::new(Products::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Products::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_slug")
                        .table(Products::Table)
                        .col(Products::Slug)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_seller_id")
                        .table(Products::Table)
                        .col(Products::SellerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::Slug).string().not_null())
                        .col(ColumnDef::new(Categories::Image).string().not_null())
                        .col(ColumnDef::new(Categories::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Categories::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Reviews::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Reviews::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Reviews::ProductId).uuid().not_null())
                        .col(ColumnDef::new(Reviews::ReviewerName).string().not_null())
                        .col(ColumnDef::new(Reviews::Rating).integer().not_null())
                        .col(ColumnDef::new(Reviews::Review).text().not_null())
                        .col(ColumnDef::new(Reviews::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reviews_product_id")
                        .table(Reviews::Table)
                        .col(Reviews::ProductId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Banners::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Banners::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Banners::ProductId).uuid().not_null())
                        .col(ColumnDef::new(Banners::Image).string().not_null())
                        .col(ColumnDef::new(Banners::Link).string().not_null())
                        .col(ColumnDef::new(Banners::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Banners::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WishlistItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WishlistItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(WishlistItems::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(WishlistItems::ProductId).uuid().not_null())
                        .col(
                            ColumnDef::new(WishlistItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_wishlist_items_customer_product")
                        .table(WishlistItems::Table)
                        .col(WishlistItems::CustomerId)
                        .col(WishlistItems::ProductId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WishlistItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Banners::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Reviews::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Products {
        Table,
        Id,
        SellerId,
        Name,
        Slug,
        ShopName,
        Category,
        Description,
        Brand,
        Price,
        Discount,
        Stock,
        Rating,
        Images,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Categories {
        Table,
        Id,
        Name,
        Slug,
        Image,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Reviews {
        Table,
        Id,
        ProductId,
        ReviewerName,
        Rating,
        Review,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum Banners {
        Table,
        Id,
        ProductId,
        Image,
        Link,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum WishlistItems {
        Table,
        Id,
        CustomerId,
        ProductId,
        CreatedAt,
    }
}

mod m20240301_000003_create_cart_and_order_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000003_create_cart_and_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CartItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(CartItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(CartItems::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(CartItems::ProductId).uuid().not_null())
                        .col(ColumnDef::new(CartItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(CartItems::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_cart_items_customer_product")
                        .table(CartItems::Table)
                        .col(CartItems::CustomerId)
                        .col(CartItems::ProductId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(CustomerOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CustomerOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(CustomerOrders::CustomerId).uuid().not_null())
                        .col(ColumnDef::new(CustomerOrders::Items).json().not_null())
                        .col(
                            ColumnDef::new(CustomerOrders::TotalPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerOrders::ShippingAddress)
                                .json()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerOrders::PaymentStatus)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerOrders::DeliveryStatus)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerOrders::PlacedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerOrders::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(CustomerOrders::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customer_orders_customer_id")
                        .table(CustomerOrders::Table)
                        .col(CustomerOrders::CustomerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_customer_orders_delivery_status")
                        .table(CustomerOrders::Table)
                        .col(CustomerOrders::DeliveryStatus)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SellerOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SellerOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerOrders::ParentOrderId)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SellerOrders::SellerId).uuid().not_null())
                        .col(ColumnDef::new(SellerOrders::Items).json().not_null())
                        .col(ColumnDef::new(SellerOrders::Price).decimal().not_null())
                        .col(
                            ColumnDef::new(SellerOrders::PaymentStatus)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerOrders::DeliveryStatus)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerOrders::ShippingOrigin)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SellerOrders::PlacedAt).timestamp().not_null())
                        .col(
                            ColumnDef::new(SellerOrders::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerOrders::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_seller_orders_parent_order_id")
                        .table(SellerOrders::Table)
                        .col(SellerOrders::ParentOrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_seller_orders_seller_id")
                        .table(SellerOrders::Table)
                        .col(SellerOrders::SellerId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SellerOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CustomerOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CartItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum CartItems {
        Table,
        Id,
        CustomerId,
        ProductId,
        Quantity,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum CustomerOrders {
        Table,
        Id,
        CustomerId,
        Items,
        TotalPrice,
        ShippingAddress,
        PaymentStatus,
        DeliveryStatus,
        PlacedAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum SellerOrders {
        Table,
        Id,
        ParentOrderId,
        SellerId,
        Items,
        Price,
        PaymentStatus,
        DeliveryStatus,
        ShippingOrigin,
        PlacedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000004_create_wallet_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000004_create_wallet_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PlatformWalletEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PlatformWalletEntries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlatformWalletEntries::Amount)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlatformWalletEntries::Month)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlatformWalletEntries::Year)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PlatformWalletEntries::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SellerWalletEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SellerWalletEntries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerWalletEntries::SellerId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerWalletEntries::Amount)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerWalletEntries::Month)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerWalletEntries::Year)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SellerWalletEntries::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_seller_wallet_entries_seller_id")
                        .table(SellerWalletEntries::Table)
                        .col(SellerWalletEntries::SellerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PaymentAccounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PaymentAccounts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PaymentAccounts::SellerId).uuid().not_null())
                        .col(
                            ColumnDef::new(PaymentAccounts::ProviderAccountId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentAccounts::ActivationCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PaymentAccounts::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payment_accounts_seller_id")
                        .table(PaymentAccounts::Table)
                        .col(PaymentAccounts::SellerId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WithdrawalRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(WithdrawalRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WithdrawalRequests::SellerId)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WithdrawalRequests::Amount)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WithdrawalRequests::Status)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WithdrawalRequests::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WithdrawalRequests::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_withdrawal_requests_seller_status")
                        .table(WithdrawalRequests::Table)
                        .col(WithdrawalRequests::SellerId)
                        .col(WithdrawalRequests::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WithdrawalRequests::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PaymentAccounts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SellerWalletEntries::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PlatformWalletEntries::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PlatformWalletEntries {
        Table,
        Id,
        Amount,
        Month,
        Year,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum SellerWalletEntries {
        Table,
        Id,
        SellerId,
        Amount,
        Month,
        Year,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum PaymentAccounts {
        Table,
        Id,
        SellerId,
        ProviderAccountId,
        ActivationCode,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum WithdrawalRequests {
        Table,
        Id,
        SellerId,
        Amount,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240301_000005_create_scheduled_tasks_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000005_create_scheduled_tasks_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ScheduledTasks::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ScheduledTasks::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ScheduledTasks::TaskType).string().not_null())
                        .col(ColumnDef::new(ScheduledTasks::SubjectId).uuid().not_null())
                        .col(
                            ColumnDef::new(ScheduledTasks::VisibleAfter)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ScheduledTasks::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_scheduled_tasks_visible_after")
                        .table(ScheduledTasks::Table)
                        .col(ScheduledTasks::VisibleAfter)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ScheduledTasks::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ScheduledTasks {
        Table,
        Id,
        TaskType,
        SubjectId,
        VisibleAfter,
        CreatedAt,
    }
}
