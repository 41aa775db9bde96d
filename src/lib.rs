//! Jenkins Lex Bot - Conversational front door for Jenkins
//!
//! This crate turns intents recognised by a conversational interface
//! (Lex V2 fulfillment events) into Jenkins operations: creating, building,
//! listing and deleting jobs, and reporting job details, build status and
//! console logs.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
