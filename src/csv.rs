use crate::datetime;
use crate::trip::TripRecord;

/// CSVの固定ヘッダー行。
pub const CSV_HEADER: &str = "Driver,Truck,Customer,Material,Pickup,Delivery,Start Odo,Start,End";

/// 運行記録の一覧をCSV文字列に変換する。
///
/// 一覧は渡された順のまま出力する。行は改行で結合し、末尾に改行は付けない。
/// 同じ一覧に対しては常に同じ文字列を返す。
///
/// 選択式フィールドは閉じた選択肢のため区切り文字を含まない前提で、
/// エスケープは配達先のカンマをセミコロンに置き換えるのみとする。
pub fn encode_trips(trips: &[TripRecord]) -> String {
    let mut lines = Vec::with_capacity(trips.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(trips.iter().map(encode_row));

    lines.join("\n")
}

/// 運行記録1件をCSVの1行に変換する。
fn encode_row(trip: &TripRecord) -> String {
    format!(
        "{},{},{},{},{},{},{},{},{}",
        trip.driver,
        trip.truck,
        trip.customer,
        trip.material,
        trip.pickup,
        trip.delivery.replace(',', ";"),
        trip.odometer,
        datetime::format_local(Some(trip.started_at)),
        datetime::format_local(Some(trip.ended_at)),
    )
}
