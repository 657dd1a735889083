pub mod flow;
pub mod signer;

pub use flow::{AuthFlow, AuthState, BrowserOpener, FrobPrompt, SystemBrowser};
pub use signer::sign;
