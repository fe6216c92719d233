pub mod dispatcher;

pub use dispatcher::{DispatchOutcome, InfraredDispatcher, TRANSMIT_TIMEOUT};
