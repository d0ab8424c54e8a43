pub mod jsonrpc;

pub use jsonrpc::{ErrorObject, Request, Response};
