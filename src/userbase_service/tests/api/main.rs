mod auth;
mod health;
mod helpers;
mod users;
