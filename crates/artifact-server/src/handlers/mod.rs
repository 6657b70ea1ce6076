pub mod export;
pub mod generate;
pub mod health;
pub mod providers;
pub mod snapshots;
pub mod stream;
