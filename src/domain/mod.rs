pub mod common;
pub mod member;

pub use common::Displayable;
pub use member::{MemberField, MemberRecord};
