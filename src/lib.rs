//! Survey Flow - Branching survey engine
//!
//! This crate walks respondents through decision-tree surveys: it evaluates
//! branch conditions against answers, tracks the visited path with a
//! navigation state machine, and assembles the final submission for the
//! survey API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
