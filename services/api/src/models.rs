//! API models for request and response payloads

pub mod cart_item;
pub mod order;
pub mod payment;
pub mod pizza;

pub use cart_item::{CartItem, CartItemInput, CartItemPatch};
pub use order::{
    CreateOrderRequest, DeleteOutcome, EditCartItemsRequest, EditOrderRequest, NewOrderItem,
    Order, OrderDetail, OrderStatus, Totals, TotalsOverflow, TransitionError, adjust_totals,
};
pub use payment::{PaymentIntent, PaymentIntentRequest};
pub use pizza::{Pizza, PizzaInput, PizzaPatch};
