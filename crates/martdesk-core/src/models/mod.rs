//! Data models for the back-office API.
//!
//! This module contains the wire types exchanged with the supermarket API:
//!
//! - `UserProfile`, `Role`: the authenticated staff member
//! - `Product`, `Category`: catalog rows
//! - `StockAdjustment`, `AdjustmentReason`: inventory mutations
//! - `Order`, `Employee`, `Customer`: management listings
//! - Analytics types: `SalesPoint`, `TopProduct`, `CategorySales`
//! - Envelopes: `Envelope`, `Paginated`, and the listing queries

pub mod analytics;
pub mod customer;
pub mod employee;
pub mod envelope;
pub mod inventory;
pub mod order;
pub mod product;
pub mod user;

pub use analytics::{AnalyticsOverview, CategorySales, SalesGrouping, SalesPeriod, SalesPoint, TopProduct};
pub use customer::Customer;
pub use employee::{Employee, EmployeeForm};
pub use envelope::{Envelope, InventoryQuery, ListQuery, Paginated, Pagination};
pub use inventory::{AdjustmentReason, StockAdjustment};
pub use order::{order_status_label, Order, OrderItem};
pub use product::{Category, CategoryRef, Product};
pub use user::{LoginResponse, Role, UserProfile};
