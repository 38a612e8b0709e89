pub mod admins;
pub mod banners;
pub mod carts;
pub mod catalog_query;
pub mod categories;
pub mod customers;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod products;
pub mod reviews;
pub mod sellers;
pub mod wallets;
pub mod wishlists;

pub use admins::AdminService;
pub use banners::BannerService;
pub use carts::CartService;
pub use categories::CategoryService;
pub use customers::CustomerService;
pub use orders::OrderService;
pub use payments::PaymentService;
pub use products::ProductService;
pub use reviews::ReviewService;
pub use sellers::SellerService;
pub use wallets::WalletService;
pub use wishlists::WishlistService;
