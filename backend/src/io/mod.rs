//! # IO Module
//!
//! Interfaces exposing the domain to the outside world. Currently only the
//! REST API.

pub mod rest;
