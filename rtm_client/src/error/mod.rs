pub mod rtm_error;

pub use rtm_error::{RtmError, RtmResult};
