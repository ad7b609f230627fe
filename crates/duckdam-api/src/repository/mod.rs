//! 데이터 저장소 구현.

mod users;

pub use users::*;
