pub mod config;
pub mod infer;

#[cfg(test)]
mod tests;

pub use config::ServerConfig;
pub use infer::InferServer;
