//! Shared types for the storefront backend
//!
//! Domain vocabulary used by the server and by clients: owner keys,
//! cart lines and cart arithmetic, shipping addresses, payment and
//! order status enums, and money helpers. No I/O lives here.

pub mod address;
pub mod cart;
pub mod error;
pub mod money;
pub mod owner;
pub mod status;

// Re-exports
pub use address::ShippingAddress;
pub use cart::{CartLine, add_line, compute_total, merge_lines, remove_line, set_line_quantity};
pub use error::DomainError;
pub use owner::OwnerKey;
pub use status::{OrderStatus, PaymentMethod, PaymentStatus};
