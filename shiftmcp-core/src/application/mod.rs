pub mod bootstrap;
pub mod dispatcher;
pub mod prompts;
pub mod tooling;
