pub mod api;

pub use api::{Permission, RemoteMethod, RtmClient};
