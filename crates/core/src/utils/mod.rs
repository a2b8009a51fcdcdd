pub mod code_utils;


pub use code_utils::{normalize_instrument_code, value_to_text};
