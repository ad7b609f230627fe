//! 덕담 서비스를 위한 도메인 모델.

mod user;

pub use user::*;
