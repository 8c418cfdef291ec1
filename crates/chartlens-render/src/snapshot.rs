//! 임시 PNG 스냅샷.
//!
//! 스냅샷 파일은 생성 시점에 고유한 이름으로 배타적으로 만들어지며,
//! `Snapshot`이 drop될 때 삭제됩니다. 에러나 패닉으로 스코프를 벗어나도 마찬가지입니다.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chartlens_analytics::ChartSpec;
use image::{ImageFormat, RgbImage};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::RenderResult;
use crate::renderer::ChartRenderer;

const SNAPSHOT_PREFIX: &str = "chartlens-";
const SNAPSHOT_SUFFIX: &str = ".png";

/// 디스크에 기록된 임시 차트 이미지.
///
/// 이 값이 살아 있는 동안에만 `path()`가 유효합니다.
#[derive(Debug)]
pub struct Snapshot {
    file: NamedTempFile,
}

impl Snapshot {
    /// 이미지 파일 경로.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// 파일을 즉시 삭제하고 삭제 실패를 보고합니다.
    ///
    /// drop에 의한 삭제는 실패를 무시하므로, 결과가 필요하면 이 메서드를 사용합니다.
    pub fn close(self) -> RenderResult<()> {
        let path = self.path().to_path_buf();
        self.file.close()?;
        debug!(path = %path.display(), "Snapshot removed");
        Ok(())
    }
}

/// 차트를 임시 PNG로 내보내는 Exporter.
#[derive(Debug, Clone, Default)]
pub struct SnapshotExporter {
    renderer: ChartRenderer,
    dir: Option<PathBuf>,
}

impl SnapshotExporter {
    /// 새 Exporter를 생성합니다. 임시 파일은 시스템 임시 디렉토리에 만들어집니다.
    pub fn new(renderer: ChartRenderer) -> Self {
        Self {
            renderer,
            dir: None,
        }
    }

    /// 임시 파일을 만들 디렉토리를 지정합니다.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    /// 차트를 렌더링하여 임시 PNG 파일로 기록합니다.
    ///
    /// 렌더링과 인코딩은 파일을 만들기 전에 끝나므로, 실패하면 파일이 생기지 않습니다.
    /// 파일 기록 중 실패하면 이미 만들어진 파일은 반환 전에 삭제됩니다.
    pub fn export(&self, chart: &ChartSpec) -> RenderResult<Snapshot> {
        let image = self.renderer.render(chart)?;
        let png = encode_png(&image)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(SNAPSHOT_PREFIX).suffix(SNAPSHOT_SUFFIX);
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        file.write_all(&png)?;
        file.flush()?;

        debug!(
            symbol = %chart.symbol,
            path = %file.path().display(),
            bytes = png.len(),
            "Snapshot exported"
        );

        Ok(Snapshot { file })
    }

    /// 스냅샷을 만들어 클로저에 경로를 넘기고, 클로저가 끝나면 파일을 삭제합니다.
    ///
    /// 클로저의 성공 여부와 관계없이 파일은 삭제되며, 클로저의 결과를 그대로 반환합니다.
    pub fn with_snapshot<T, E, F>(&self, chart: &ChartSpec, f: F) -> Result<T, E>
    where
        F: FnOnce(&Path) -> Result<T, E>,
        E: From<crate::error::RenderError>,
    {
        let snapshot = self.export(chart)?;
        let result = f(snapshot.path());

        if let Err(e) = snapshot.close() {
            warn!(error = %e, "Failed to remove snapshot");
        }

        result
    }

    /// 차트를 지정한 경로에 PNG로 저장합니다. 이 파일은 자동으로 삭제되지 않습니다.
    pub fn save(&self, chart: &ChartSpec, path: impl AsRef<Path>) -> RenderResult<()> {
        let image = self.renderer.render(chart)?;
        let png = encode_png(&image)?;
        std::fs::write(path.as_ref(), png)?;
        debug!(path = %path.as_ref().display(), "Chart saved");
        Ok(())
    }
}

fn encode_png(image: &RgbImage) -> RenderResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}
