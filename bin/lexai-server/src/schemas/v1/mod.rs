pub mod ask;
pub mod chats;
pub mod extract;
