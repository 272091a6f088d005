//! External completion service client

pub mod completion;

pub use completion::CompletionClient;
