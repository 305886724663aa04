//! marketplace-client - Client library for the marketplace REST API
//!
//! This crate owns the session/token lifecycle (login, local expiry
//! judgement, refresh coalescing, teardown) and exposes typed bindings
//! for the marketplace endpoints on top of a single authenticated-request
//! contract.

mod api;
mod config;
mod session;
mod storage;

pub use config::ClientConfig;

pub use session::{
    AuthError, LoginCredentials, SessionManager, User, UserRole,
};

pub use storage::{
    FileTokenStore, InMemoryTokenStore, StorageError, TokenStore, token_store_from_env,
};

pub use api::{
    AddToCartRequest, AdminStats, ApiError, Cart, CartApi, CartItem, Category, ChangePasswordRequest,
    CheckoutRequest, InitiatePaymentRequest, NewCategory, NewProduct, Order, OrderItem, OrderStatus,
    OrdersApi, Payment, PaymentStatus, Product, ProductSearch, ProductStatus, ProductUpdate,
    ProductsApi, ProfileUpdate, RegisterRequest, UserApi,
};
