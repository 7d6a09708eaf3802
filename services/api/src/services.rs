//! Business logic of the api service
//!
//! Services are constructed once in `main` over the store traits and shared
//! through the router state.

pub mod cart;
pub mod catalog;
pub mod orders;
pub mod payments;

pub use cart::CartService;
pub use catalog::CatalogService;
pub use orders::OrderService;
pub use payments::PaymentService;
