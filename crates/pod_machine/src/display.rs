//! 时间显示格式

/// `MM:SS`，分钟与秒都补零到两位
pub fn format_clock(secs: f64) -> String {
    let (mins, secs) = split_minutes(secs);
    format!("{:02}:{:02}", mins, secs)
}

/// 已播放时间，例如 125 秒 -> `02:05`
pub fn elapsed_display(elapsed: f64) -> String {
    format_clock(elapsed)
}

pub fn duration_display(duration: f64) -> String {
    format_clock(duration)
}

/// 剩余时间 `M:SS`：分钟不补零，秒补零（125/180 -> `0:55`）
pub fn remaining_display(elapsed: f64, duration: f64) -> String {
    let (mins, secs) = split_minutes(duration - elapsed);
    format!("{}:{:02}", mins, secs)
}

/// 进度百分比；时长为 0 时返回 0
pub fn progress_percent(elapsed: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        100.0 * elapsed / duration
    } else {
        0.0
    }
}

// 负数与 NaN 按 0 处理
fn split_minutes(secs: f64) -> (u64, u64) {
    let secs = if secs.is_finite() { secs.max(0.0) } else { 0.0 };
    let mins = (secs / 60.0).floor() as u64;
    let secs = (secs % 60.0).floor() as u64;
    (mins, secs)
}
