pub mod fixture;
pub mod live;
