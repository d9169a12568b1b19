//! Coupon Admin - back-office service for shop discount coupons
//!
//! Admins browse, create, edit and inspect coupons through permission-checked
//! HTTP screens. Every change is validated, persisted, announced as a domain
//! event and recorded in the admin audit log.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
