mod auth;
mod cart;
mod errors;
mod orders;
mod products;
mod types;

pub use auth::{AdminStats, ChangePasswordRequest, ProfileUpdate, RegisterRequest, UserApi};
pub use cart::{AddToCartRequest, CartApi};
pub use errors::ApiError;
pub use orders::{CheckoutRequest, InitiatePaymentRequest, OrdersApi};
pub use products::{NewCategory, NewProduct, ProductSearch, ProductUpdate, ProductsApi};
pub use types::{
    Cart, CartItem, Category, Order, OrderItem, OrderStatus, Payment, PaymentStatus, Product,
    ProductStatus,
};
