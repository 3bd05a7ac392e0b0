pub mod age;
pub mod domain;
pub mod filter;
pub mod link;
pub mod row;
pub mod theme;
