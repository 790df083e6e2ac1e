// Per-client conversation state and turn handling.

pub mod controller;
pub mod conversation;
pub mod handlers;
pub mod store;

pub use controller::{SessionController, TurnOutput};
pub use conversation::{Conversation, ConversationError, Message, Role};
pub use store::SessionStore;
