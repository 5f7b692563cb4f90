//! Transit catalogue and route planner server.
//!
//! Keeps a catalogue of bus stops, bus routes and road distances, answers
//! statistics about them, and finds the fastest itinerary between two stops
//! on a time-weighted graph with a fixed boarding wait at every stop.

pub mod catalogue;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod routing;
pub mod service;
pub mod web;
