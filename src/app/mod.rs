//! Application core: pure domain logic, no direct I/O.
//!
//! This module contains the business rules for the SentryCam monitor:
//! the sensor gate, the capture → upload → notify → cleanup pipeline, and
//! the service that drives them from the FSM.  All interaction with the
//! outside world happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without a camera, GPIO or network.

pub mod capture;
pub mod cleanup;
pub mod cycle;
pub mod events;
pub mod gate;
pub mod notify;
pub mod ports;
pub mod service;
pub mod upload;
