use std::cell::Cell;
use std::sync::OnceLock;
use std::time::Instant;

pub const PERF_ENV: &str = "PIPE_QUOTE_PERF";

static PERF_ENABLED: OnceLock<bool> = OnceLock::new();

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static ROW_COUNT: Cell<u64> = Cell::new(0);
}

fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 性能日志开关
///
/// - Debug 默认开启；Release 默认关闭
/// - `PIPE_QUOTE_PERF=1` 强制开启，`PIPE_QUOTE_PERF=0` 强制关闭
pub fn perf_enabled() -> bool {
    *PERF_ENABLED.get_or_init(|| match std::env::var(PERF_ENV) {
        Ok(v) => is_true(&v),
        Err(_) => cfg!(debug_assertions),
    })
}

/// 记录本线程已处理的源数据行数（仅在 PerfGuard 作用域内计数）
pub fn record_rows(rows: usize) {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if !active {
        return;
    }
    ROW_COUNT.with(|c| c.set(c.get().saturating_add(rows as u64)));
}

/// 性能统计 Guard：记录 elapsed_ms + 处理行数
///
/// 使用方式：
/// ```ignore
/// let _perf = pipe_quote::perf::PerfGuard::new("load_catalog");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    rows_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        let rows_start = ROW_COUNT.with(|c| c.get());
        Self {
            op,
            start: Instant::now(),
            rows_start,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let rows_end = ROW_COUNT.with(|c| c.get());
        let rows = rows_end.saturating_sub(self.rows_start);

        if perf_enabled() {
            tracing::info!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                rows,
                "done"
            );
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
