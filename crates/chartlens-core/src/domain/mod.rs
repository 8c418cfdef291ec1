//! 차트 분석을 위한 도메인 모델.

mod indicator;
mod price;
mod series;

pub use indicator::*;
pub use price::*;
pub use series::*;
