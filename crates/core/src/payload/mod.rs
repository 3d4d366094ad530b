//! Inbound payload decoding and validation.
//!
//! The payload is an arbitrary JSON value. Only `ticket` is inspected; the
//! rest is carried through verbatim in its compacted form.

pub mod text;
mod ticket;
mod validate;

pub use ticket::{Ticket, TicketError};
pub use validate::{validate, FieldViolation, PayloadError, ValidatedPayload};
