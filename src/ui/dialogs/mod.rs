pub mod about;
pub mod prompter;

pub use prompter::FltkPrompter;
