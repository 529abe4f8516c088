mod args;
mod result;

pub use args::{DecodeArgs, DecodeArgsBuilder, InputEncoding};
pub use result::DecodeResult;
