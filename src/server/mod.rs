//! HTTP boundary: routes, CORS and response rendering

pub mod api;
