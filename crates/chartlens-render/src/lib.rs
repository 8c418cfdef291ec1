//! 차트 스냅샷 렌더링.
//!
//! - `ChartRenderer` - `ChartSpec`을 RGB 래스터 이미지로 그립니다
//! - `SnapshotExporter` - 이미지를 고유한 임시 PNG 파일로 내보냅니다
//! - `Snapshot` - 임시 파일 소유권. drop 시 파일이 삭제됩니다

mod canvas;
pub mod error;
pub mod renderer;
pub mod snapshot;

pub use error::{RenderError, RenderResult};
pub use renderer::{ChartRenderer, RenderOptions};
pub use snapshot::{Snapshot, SnapshotExporter};
