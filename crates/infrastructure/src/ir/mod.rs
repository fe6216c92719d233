pub mod ir_ctl;
pub mod mock_transmitter;

pub use ir_ctl::IrCtlTransmitter;
pub use mock_transmitter::MockTransmitter;
