pub mod link;

pub use link::Entity as LinkEntity;
