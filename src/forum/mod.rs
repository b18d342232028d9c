//! Forum domain module for dsforum.
//!
//! Categories, threads, and replies, each with a typed repository over
//! parameterized SQL.

mod category;
mod reply;
mod thread;

pub use category::{Category, CategoryRepository};
pub use reply::{NewReply, Reply, ReplyRepository, ReplyView};
pub use thread::{NewThread, Thread, ThreadRepository, ThreadSummary, ThreadView};
