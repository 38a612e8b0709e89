pub mod admin;
pub mod banner;
pub mod cart_item;
pub mod category;
pub mod customer;
pub mod customer_order;
pub mod payment_account;
pub mod platform_wallet_entry;
pub mod product;
pub mod review;
pub mod scheduled_task;
pub mod seller;
pub mod seller_order;
pub mod seller_wallet_entry;
pub mod wishlist_item;
pub mod withdrawal_request;

pub use admin::{Entity as Admins, Model as AdminModel};
pub use banner::{Entity as Banners, Model as BannerModel};
pub use cart_item::{Entity as CartItems, Model as CartItemModel};
pub use category::{Entity as Categories, Model as CategoryModel};
pub use customer::{Entity as Customers, Model as CustomerModel};
pub use customer_order::{Entity as CustomerOrders, Model as CustomerOrderModel};
pub use payment_account::{Entity as PaymentAccounts, Model as PaymentAccountModel};
pub use platform_wallet_entry::{Entity as PlatformWalletEntries, Model as PlatformWalletEntryModel};
pub use product::{Entity as Products, Model as ProductModel};
pub use review::{Entity as Reviews, Model as ReviewModel};
pub use scheduled_task::{Entity as ScheduledTasks, Model as ScheduledTaskModel};
pub use seller::{Entity as Sellers, Model as SellerModel};
pub use seller_order::{Entity as SellerOrders, Model as SellerOrderModel};
pub use seller_wallet_entry::{Entity as SellerWalletEntries, Model as SellerWalletEntryModel};
pub use wishlist_item::{Entity as WishlistItems, Model as WishlistItemModel};
pub use withdrawal_request::{Entity as WithdrawalRequests, Model as WithdrawalRequestModel};
