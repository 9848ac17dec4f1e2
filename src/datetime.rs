use chrono::{DateTime, Local, Utc};

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// タイムスタンプを表示用の文字列に変換する。
///
/// `None`の場合は空文字列を返す。それ以外は端末のローカルタイムゾーンで
/// `YYYY-MM-DD HH:MM`形式(24時間表記、ゼロ埋め)に変換する。
pub fn format_local(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(timestamp) => timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => String::new(),
    }
}


#[cfg(test)]
pub use mock_datetime::now;
