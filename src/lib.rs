//! review-forge: turns a few business details into a short, positive review
//! via a hosted language model. Hexagonal layout: domain, ports, use cases, adapters.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
