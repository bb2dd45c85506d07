//! Smart decoder: classifies a selected text span and reverses its encoding.

pub mod detectors;
pub mod types;

pub use detectors::{CASCADE, Detector};
pub use types::{DecodeKind, DecodeResult};

use tracing::trace;

/// 按固定优先级运行检测器，返回第一个命中的结果
///
/// 顺序是 JWT → URL 编码 → Hex → Base64。JWT、URL 编码和 Base64 识别后解码失败会
/// 直接返回 `*-corrupt`；Hex 失败则继续尝试 Base64（两者字母表重叠）。
/// 任何输入都会得到一个结果，不会报错。
pub fn decode(text: &str) -> DecodeResult {
    let cleaned = text.trim();

    for detector in CASCADE.iter() {
        if let Some(result) = (detector.detect)(cleaned) {
            trace!(detector = detector.name, kind = %result.kind, "selection decoded");
            return result;
        }
    }

    DecodeResult::unknown()
}
