pub mod email;
pub mod health;
pub mod identity;
pub mod user;
pub mod user_id;
pub mod user_name;
