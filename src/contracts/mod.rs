// Contracts Module - Public read-only ABIs

pub mod erc20;
pub mod i_comptroller;
pub mod i_protocol_data_provider;

// Public exports
pub use erc20::Erc20;
pub use i_comptroller::{CToken, IComptroller};
pub use i_protocol_data_provider::{IProtocolDataProvider, TokenData};
